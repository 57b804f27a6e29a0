//! 通用常量.

/// 二值体素取值.
pub mod gray {
    /// 二值网格中, 背景的体素值.
    pub const BACKGROUND: u8 = 0;

    /// 二值网格中, 前景的体素值.
    pub const FOREGROUND: u8 = 1;

    /// 体素是否是前景? 任何非零值都被视为前景.
    #[inline]
    pub const fn is_foreground(p: u8) -> bool {
        p != BACKGROUND
    }

    /// 体素是否是背景?
    #[inline]
    pub const fn is_background(p: u8) -> bool {
        matches!(p, BACKGROUND)
    }

    /// `bool` -> 二值体素值.
    #[inline]
    pub const fn from_bool(b: bool) -> u8 {
        if b {
            FOREGROUND
        } else {
            BACKGROUND
        }
    }
}

/// 体素/像素类型.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElemType {
    /// 值为 `BACKGROUND`, 代表背景.
    Background,

    /// 非 `BACKGROUND` 值, 代表前景.
    Foreground,
}

impl ElemType {
    /// 根据二值体素值判断类型.
    #[inline]
    pub const fn of(p: u8) -> Self {
        if gray::is_foreground(p) {
            Self::Foreground
        } else {
            Self::Background
        }
    }

    /// 是否为前景.
    #[inline]
    pub fn is_foreground(&self) -> bool {
        matches!(self, Self::Foreground)
    }

    /// 是否为背景.
    #[inline]
    pub fn is_background(&self) -> bool {
        !self.is_foreground()
    }
}

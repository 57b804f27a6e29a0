//! 二维二值网格的读写抽象.

use super::shape_2d;
use crate::consts::gray::*;
use crate::Idx2d;
use ndarray::{Array2, ArrayViewMut2};

/// 二维二值网格的最小读写接口. 泛洪填充只依赖该接口, 而不关心底层存储.
pub trait BinaryGridView {
    /// 网格形状 (高, 宽).
    fn shape(&self) -> Idx2d;

    /// 读取 `pos` 处的值. 越界时 panic.
    fn get(&self, pos: Idx2d) -> bool;

    /// 写入 `pos` 处的值. 越界时 panic.
    fn set(&mut self, pos: Idx2d, value: bool);

    /// 判断一个索引是否合法 (未越界).
    #[inline]
    fn check(&self, (h, w): Idx2d) -> bool {
        let (h_len, w_len) = self.shape();
        h < h_len && w < w_len
    }
}

impl BinaryGridView for Array2<bool> {
    #[inline]
    fn shape(&self) -> Idx2d {
        shape_2d(self.shape())
    }

    #[inline]
    fn get(&self, pos: Idx2d) -> bool {
        self[pos]
    }

    #[inline]
    fn set(&mut self, pos: Idx2d, value: bool) {
        self[pos] = value;
    }
}

impl BinaryGridView for ArrayViewMut2<'_, bool> {
    #[inline]
    fn shape(&self) -> Idx2d {
        shape_2d(self.shape())
    }

    #[inline]
    fn get(&self, pos: Idx2d) -> bool {
        self[pos]
    }

    #[inline]
    fn set(&mut self, pos: Idx2d, value: bool) {
        self[pos] = value;
    }
}

/// 可变、借用的二维 `u8` 标注切片, 以二值方式读写.
///
/// 任何非零值都被读作 "开". 写入 "开" 时写入 `on` (默认 [`FOREGROUND`]),
/// 写入 "关" 时写入 [`BACKGROUND`]. 因此可以直接在多标签标注图上涂抹某一个标签值.
pub struct BinarySliceMut<'a> {
    /// 底层数据的轻量级视图.
    data: ArrayViewMut2<'a, u8>,
    on: u8,
}

impl<'a> BinarySliceMut<'a> {
    /// 以 `FOREGROUND` 作为 "开" 值创建视图.
    #[inline]
    pub fn new(data: ArrayViewMut2<'a, u8>) -> Self {
        Self::with_value(data, FOREGROUND)
    }

    /// 以 `on` 作为 "开" 值创建视图. `on` 不能为 `BACKGROUND`, 否则 panic.
    #[inline]
    pub fn with_value(data: ArrayViewMut2<'a, u8>, on: u8) -> Self {
        assert_ne!(on, BACKGROUND, "\"开\" 值不能与背景相同");
        Self { data, on }
    }

    /// 统计 "开" 像素个数.
    #[inline]
    pub fn count_on(&self) -> usize {
        self.data.iter().filter(|p| is_foreground(**p)).count()
    }
}

impl BinaryGridView for BinarySliceMut<'_> {
    #[inline]
    fn shape(&self) -> Idx2d {
        shape_2d(self.data.shape())
    }

    #[inline]
    fn get(&self, pos: Idx2d) -> bool {
        is_foreground(self.data[pos])
    }

    #[inline]
    fn set(&mut self, pos: Idx2d, value: bool) {
        self.data[pos] = if value { self.on } else { BACKGROUND };
    }
}

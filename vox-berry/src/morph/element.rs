//! 结构元.

use crate::consts::{gray::*, ElemType};
use crate::error::{VoxError, VoxResult};
use crate::label::Offset3d;
use crate::Idx3d;
use ndarray::{Array2, Array3, Axis};

cfg_if::cfg_if! {
    if #[cfg(feature = "serde")] {
        use serde::{Deserialize, Serialize};
    }
}

/// 形态学操作的结构元. 中心位于各维度的 `floor(len / 2)` 处, 且必须是前景.
///
/// 只能通过会校验中心的构造函数创建, 反序列化同样经过校验.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "Array3<u8>", into = "Array3<u8>")
)]
pub struct StructuringElement {
    data: Array3<u8>,
    center: Idx3d,
    offsets: Vec<Offset3d>,
}

impl StructuringElement {
    /// 由三维二值数组构建结构元. 任何非零值都视为前景.
    ///
    /// # 错误
    ///
    /// 数组为空或中心不是前景时返回 [`VoxError::InvalidStructuringElement`].
    pub fn new(data: Array3<u8>) -> VoxResult<Self> {
        let &[z, h, w] = data.shape() else {
            unreachable!()
        };
        if z == 0 || h == 0 || w == 0 {
            return Err(VoxError::InvalidStructuringElement("element is empty"));
        }
        let center = (z / 2, h / 2, w / 2);
        if ElemType::of(data[center]).is_background() {
            return Err(VoxError::InvalidStructuringElement(
                "center cell is background",
            ));
        }
        let offsets = data
            .indexed_iter()
            .filter(|&(pos, p)| pos != center && is_foreground(*p))
            .map(|((ez, eh, ew), _)| {
                (
                    ez as isize - center.0 as isize,
                    eh as isize - center.1 as isize,
                    ew as isize - center.2 as isize,
                )
            })
            .collect();
        Ok(Self {
            data,
            center,
            offsets,
        })
    }

    /// 由二维二值数组构建 z 长度为 1 的结构元.
    #[inline]
    pub fn from_2d(data: Array2<u8>) -> VoxResult<Self> {
        Self::new(data.insert_axis(Axis(0)))
    }

    /// 3x3 十字.
    pub fn cross_2d() -> Self {
        let mut data = Array2::<u8>::zeros((3, 3));
        data.row_mut(1).fill(FOREGROUND);
        data.column_mut(1).fill(FOREGROUND);
        Self::from_valid(data.insert_axis(Axis(0)))
    }

    /// 边长为 `2 * radius + 1` 的正方形.
    pub fn square_2d(radius: usize) -> Self {
        let side = 2 * radius + 1;
        Self::from_valid(Array3::from_elem((1, side, side), FOREGROUND))
    }

    /// 3x3x3 的 6 邻域 (中心及其六个面邻居).
    pub fn diamond_3d() -> Self {
        let data = Array3::from_shape_fn((3, 3, 3), |(z, h, w)| {
            let d = z.abs_diff(1) + h.abs_diff(1) + w.abs_diff(1);
            from_bool(d <= 1)
        });
        Self::from_valid(data)
    }

    /// 边长为 `2 * radius + 1` 的立方体.
    pub fn cube_3d(radius: usize) -> Self {
        let side = 2 * radius + 1;
        Self::from_valid(Array3::from_elem((side, side, side), FOREGROUND))
    }

    /// 中心必然是前景的内置结构元.
    fn from_valid(data: Array3<u8>) -> Self {
        Self::new(data).unwrap_or_else(|_| unreachable!())
    }

    /// 结构元形状 `(z, h, w)`.
    #[inline]
    pub fn shape(&self) -> Idx3d {
        self.data.dim()
    }

    /// 结构元中心.
    #[inline]
    pub fn center(&self) -> Idx3d {
        self.center
    }

    /// 除中心外所有前景单元相对中心的偏移, 按光栅顺序.
    #[inline]
    pub fn offsets(&self) -> &[Offset3d] {
        &self.offsets
    }

    /// 是否为平面结构元 (z 长度为 1).
    #[inline]
    pub fn is_planar(&self) -> bool {
        self.data.len_of(Axis(0)) == 1
    }
}

impl TryFrom<Array3<u8>> for StructuringElement {
    type Error = VoxError;

    #[inline]
    fn try_from(data: Array3<u8>) -> VoxResult<Self> {
        Self::new(data)
    }
}

impl From<StructuringElement> for Array3<u8> {
    #[inline]
    fn from(element: StructuringElement) -> Self {
        element.data
    }
}

//! 体素网格的基础数据结构: 包围盒, 二维二值网格视图, 以及 "已访问" 标记集合.

mod bounds;
mod grid;
pub mod marker;

pub use bounds::{BoxIter, VoxelBox};
pub use grid::{BinaryGridView, BinarySliceMut};
pub use marker::{BitMarker, ByteMarker, HashMarker, VoxelMarker};

use crate::{Idx2d, Idx3d};

/// 获取二维数组形状 (高, 宽).
#[inline]
pub(crate) fn shape_2d(shape: &[usize]) -> Idx2d {
    let &[h, w] = shape else {
        unreachable!()
    };
    (h, w)
}

/// 获取三维数组形状 (z, 高, 宽).
#[inline]
pub(crate) fn shape_3d(shape: &[usize]) -> Idx3d {
    let &[z, h, w] = shape else {
        unreachable!()
    };
    (z, h, w)
}

/// 对 `pos` 施加有符号偏移 `(dz, dh, dw)`, 结果必须落在 `shape` 内, 否则返回 `None`.
#[inline]
pub(crate) fn offset_3d(
    (z, h, w): Idx3d,
    (dz, dh, dw): (isize, isize, isize),
    (lz, lh, lw): Idx3d,
) -> Option<Idx3d> {
    let z = z.checked_add_signed(dz).filter(|&v| v < lz)?;
    let h = h.checked_add_signed(dh).filter(|&v| v < lh)?;
    let w = w.checked_add_signed(dw).filter(|&v| v < lw)?;
    Some((z, h, w))
}

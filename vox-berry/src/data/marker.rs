//! 泛洪填充使用的 "已访问" 标记集合.
//!
//! 三种实现的语义完全相同, 只是存储方式不同. 生产环境应当使用 [`BitMarker`];
//! 其余两种仅用于 `ablations/marker3` 中的性能对比.

use super::VoxelBox;
use crate::{Idx3d, Idx3dU16};
use std::collections::HashSet;

/// 包围盒范围内的 "已访问" 标记集合. 每次填充调用都新建一个, 调用结束即丢弃.
///
/// 所有坐标都是全局坐标, 且必须位于 `self.bounds()` 之内, 否则行为未定义 (可能 panic).
pub trait VoxelMarker {
    /// 创建覆盖 `bounds` 的空标记集合.
    fn new(bounds: VoxelBox) -> Self
    where
        Self: Sized;

    /// 标记集合覆盖的包围盒.
    fn bounds(&self) -> &VoxelBox;

    /// `pos` 是否已被标记.
    fn is_marked(&self, pos: Idx3d) -> bool;

    /// 将同一行 (相同 `z`, `h`) 上的闭区间 `[pos.2, w_end]` 标记为已访问.
    fn mark(&mut self, pos: Idx3d, w_end: usize);
}

/// 位压缩标记集合, 每个体素占 1 bit, 共 `ceil(len / 8)` 字节.
#[derive(Debug, Clone)]
pub struct BitMarker {
    bounds: VoxelBox,
    bits: Vec<u8>,
}

impl BitMarker {
    /// 底层字节数.
    #[inline]
    pub fn byte_len(&self) -> usize {
        self.bits.len()
    }
}

/// 将 `bits` 中的第 `start..=end` 位置 1.
fn set_bit_range(bits: &mut [u8], start: usize, end: usize) {
    debug_assert!(start <= end);
    let (sb, eb) = (start >> 3, end >> 3);
    let head = 0xffu8 << (start & 7);
    let tail = 0xffu8 >> (7 - (end & 7));
    if sb == eb {
        bits[sb] |= head & tail;
        return;
    }
    bits[sb] |= head;
    bits[sb + 1..eb].fill(0xff);
    bits[eb] |= tail;
}

impl VoxelMarker for BitMarker {
    fn new(bounds: VoxelBox) -> Self {
        Self {
            bounds,
            bits: vec![0; (bounds.len() + 7) / 8],
        }
    }

    #[inline]
    fn bounds(&self) -> &VoxelBox {
        &self.bounds
    }

    #[inline]
    fn is_marked(&self, pos: Idx3d) -> bool {
        let i = self.bounds.local_index(pos);
        self.bits[i >> 3] & (1 << (i & 7)) != 0
    }

    #[inline]
    fn mark(&mut self, pos: Idx3d, w_end: usize) {
        debug_assert!(self.bounds.contains((pos.0, pos.1, w_end)));
        let start = self.bounds.local_index(pos);
        set_bit_range(&mut self.bits, start, start + (w_end - pos.2));
    }
}

/// 每个体素占 1 字节的标记集合.
#[derive(Debug, Clone)]
pub struct ByteMarker {
    bounds: VoxelBox,
    data: Vec<bool>,
}

impl VoxelMarker for ByteMarker {
    fn new(bounds: VoxelBox) -> Self {
        Self {
            bounds,
            data: vec![false; bounds.len()],
        }
    }

    #[inline]
    fn bounds(&self) -> &VoxelBox {
        &self.bounds
    }

    #[inline]
    fn is_marked(&self, pos: Idx3d) -> bool {
        self.data[self.bounds.local_index(pos)]
    }

    #[inline]
    fn mark(&mut self, pos: Idx3d, w_end: usize) {
        let start = self.bounds.local_index(pos);
        self.data[start..=start + (w_end - pos.2)].fill(true);
    }
}

/// 以哈希集合保存已访问局部坐标的标记集合.
///
/// 坐标压缩为 `u16` 存储, 因此包围盒任一维度不能超过 `u16::MAX + 1`, 否则 `new` 时 panic.
/// 内存占用只与已访问体素个数有关, 与包围盒大小无关.
#[derive(Debug, Clone)]
pub struct HashMarker {
    bounds: VoxelBox,
    visited: HashSet<Idx3dU16>,
}

/// &Idx3d -> Idx3dU16
#[inline]
const fn idx3d_to_u16((z, h, w): &Idx3d) -> Idx3dU16 {
    // Usize to uShort
    (*z as u16, *h as u16, *w as u16)
}

impl VoxelMarker for HashMarker {
    fn new(bounds: VoxelBox) -> Self {
        let (z, h, w) = bounds.shape();
        let limit = u16::MAX as usize + 1;
        assert!(z <= limit && h <= limit && w <= limit, "包围盒过大");
        Self {
            bounds,
            visited: HashSet::with_capacity(4096),
        }
    }

    #[inline]
    fn bounds(&self) -> &VoxelBox {
        &self.bounds
    }

    #[inline]
    fn is_marked(&self, pos: Idx3d) -> bool {
        self.visited.contains(&idx3d_to_u16(&self.bounds.local(pos)))
    }

    fn mark(&mut self, pos: Idx3d, w_end: usize) {
        let (z, h, w) = self.bounds.local(pos);
        let w_end = w + (w_end - pos.2);
        self.visited.extend((w..=w_end).map(|w| idx3d_to_u16(&(z, h, w))));
    }
}

#[cfg(test)]
mod tests {
    use super::{set_bit_range, BitMarker, ByteMarker, HashMarker, VoxelMarker};
    use crate::data::VoxelBox;

    #[test]
    fn test_set_bit_range() {
        let mut bits = vec![0u8; 4];
        set_bit_range(&mut bits, 3, 5);
        assert_eq!(bits, [0b0011_1000, 0, 0, 0]);

        set_bit_range(&mut bits, 6, 25);
        assert_eq!(bits, [0b1111_1000, 0xff, 0xff, 0b0000_0011]);

        let mut bits = vec![0u8; 2];
        set_bit_range(&mut bits, 8, 8);
        assert_eq!(bits, [0, 1]);
    }

    fn check_marker<M: VoxelMarker>() {
        let bounds = VoxelBox::new((1, 2, 3), (3, 5, 12)).unwrap();
        let mut m = M::new(bounds);
        assert_eq!(m.bounds(), &bounds);
        assert!(bounds.iter().all(|p| !m.is_marked(p)));

        m.mark((2, 3, 4), 10);
        m.mark((3, 5, 12), 12);
        for p in bounds.iter() {
            let expected = matches!(p, (2, 3, 4..=10) | (3, 5, 12));
            assert_eq!(m.is_marked(p), expected, "{p:?}");
        }
    }

    #[test]
    fn test_markers_agree() {
        check_marker::<BitMarker>();
        check_marker::<ByteMarker>();
        check_marker::<HashMarker>();
    }

    #[test]
    fn test_bit_marker_size() {
        let m = BitMarker::new(VoxelBox::from_shape((3, 3, 3)).unwrap());
        assert_eq!(m.byte_len(), 4);
    }
}

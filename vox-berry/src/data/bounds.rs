//! 轴对齐整数包围盒.

use crate::Idx3d;

cfg_if::cfg_if! {
    if #[cfg(feature = "serde")] {
        use serde::{Deserialize, Serialize};
    }
}

/// 三维轴对齐整数包围盒, 两个角点均 **包含** 在内.
///
/// 坐标按 `(z, h, w)` 组织, 与 [`crate::Idx3d`] 一致.
/// 该结构只在构造时检查 `min <= max`, 之后是只读的. 反序列化同样经过检查.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "RawBox")
)]
pub struct VoxelBox {
    min: Idx3d,
    max: Idx3d,
}

/// 未经检查的包围盒, 仅作为反序列化的中间形式.
#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawBox {
    min: Idx3d,
    max: Idx3d,
}

#[cfg(feature = "serde")]
impl TryFrom<RawBox> for VoxelBox {
    type Error = &'static str;

    #[inline]
    fn try_from(RawBox { min, max }: RawBox) -> Result<Self, Self::Error> {
        Self::new(min, max).ok_or("box corner `min` exceeds `max`")
    }
}

impl VoxelBox {
    /// 以 `min` 和 `max` 两个角点 (闭区间) 构建包围盒.
    ///
    /// 任一维度上 `min > max` 时返回 `None`.
    pub fn new(min: Idx3d, max: Idx3d) -> Option<Self> {
        (min.0 <= max.0 && min.1 <= max.1 && min.2 <= max.2).then_some(Self { min, max })
    }

    /// 构建覆盖形状为 `(z, h, w)` 的整个网格的包围盒. 形状中有 0 时返回 `None`.
    pub fn from_shape((z, h, w): Idx3d) -> Option<Self> {
        if z == 0 || h == 0 || w == 0 {
            return None;
        }
        Some(Self {
            min: (0, 0, 0),
            max: (z - 1, h - 1, w - 1),
        })
    }

    /// 以 `center` 为中心, 各维度向外扩张 `radius` 个体素, 并裁剪到 `limit` 内.
    ///
    /// `center` 不在 `limit` 内时返回 `None`.
    pub fn around(center: Idx3d, radius: Idx3d, limit: &VoxelBox) -> Option<Self> {
        if !limit.contains(center) {
            return None;
        }
        let (c, r) = (center, radius);
        Self::new(
            (
                c.0.saturating_sub(r.0).max(limit.min.0),
                c.1.saturating_sub(r.1).max(limit.min.1),
                c.2.saturating_sub(r.2).max(limit.min.2),
            ),
            (
                c.0.saturating_add(r.0).min(limit.max.0),
                c.1.saturating_add(r.1).min(limit.max.1),
                c.2.saturating_add(r.2).min(limit.max.2),
            ),
        )
    }

    /// 最小角点.
    #[inline]
    pub fn min(&self) -> Idx3d {
        self.min
    }

    /// 最大角点 (包含).
    #[inline]
    pub fn max(&self) -> Idx3d {
        self.max
    }

    /// 包围盒形状 `(z, h, w)`.
    #[inline]
    pub fn shape(&self) -> Idx3d {
        (
            self.max.0 - self.min.0 + 1,
            self.max.1 - self.min.1 + 1,
            self.max.2 - self.min.2 + 1,
        )
    }

    /// 包围盒内的体素个数.
    #[inline]
    pub fn len(&self) -> usize {
        let (z, h, w) = self.shape();
        z * h * w
    }

    /// 包围盒至少包含一个体素, 因此总是返回 `false`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// 判断 `pos` 是否位于包围盒内.
    #[inline]
    pub fn contains(&self, (z, h, w): Idx3d) -> bool {
        (self.min.0..=self.max.0).contains(&z)
            && (self.min.1..=self.max.1).contains(&h)
            && (self.min.2..=self.max.2).contains(&w)
    }

    /// 将全局坐标转换为以 `self.min()` 为原点的局部坐标. 不检查越界.
    #[inline]
    pub fn local(&self, (z, h, w): Idx3d) -> Idx3d {
        debug_assert!(self.contains((z, h, w)));
        (z - self.min.0, h - self.min.1, w - self.min.2)
    }

    /// 将局部坐标转换回全局坐标.
    #[inline]
    pub fn global(&self, (z, h, w): Idx3d) -> Idx3d {
        (z + self.min.0, h + self.min.1, w + self.min.2)
    }

    /// 全局坐标在包围盒内的行优先线性索引. 不检查越界.
    #[inline]
    pub fn local_index(&self, pos: Idx3d) -> usize {
        let (_, h, w) = self.shape();
        let (lz, lh, lw) = self.local(pos);
        lw + w * (lh + h * lz)
    }

    /// 两个包围盒的交集. 不相交时返回 `None`.
    pub fn intersect(&self, other: &VoxelBox) -> Option<Self> {
        Self::new(
            (
                self.min.0.max(other.min.0),
                self.min.1.max(other.min.1),
                self.min.2.max(other.min.2),
            ),
            (
                self.max.0.min(other.max.0),
                self.max.1.min(other.max.1),
                self.max.2.min(other.max.2),
            ),
        )
    }

    /// 以行优先规则 (z 最慢, w 最快), 获取能迭代包围盒内所有索引的迭代器.
    #[inline]
    pub fn iter(&self) -> BoxIter {
        BoxIter::new(*self)
    }
}

/// 包围盒内的行优先索引迭代器.
///
/// 与 `iproduct!` 等组合写法相比, 该迭代器只保存当前位置和包围盒本身,
/// 占用的空间更小.
#[derive(Debug, Clone)]
pub struct BoxIter {
    cur: Option<Idx3d>,
    bounds: VoxelBox,
}

impl BoxIter {
    #[inline]
    fn new(bounds: VoxelBox) -> Self {
        Self {
            cur: Some(bounds.min),
            bounds,
        }
    }
}

impl Iterator for BoxIter {
    type Item = Idx3d;

    fn next(&mut self) -> Option<Self::Item> {
        let ret = self.cur?;
        let (min, max) = (self.bounds.min, self.bounds.max);
        let (mut z, mut h, mut w) = ret;
        if w < max.2 {
            w += 1;
        } else if h < max.1 {
            (h, w) = (h + 1, min.2);
        } else if z < max.0 {
            (z, h, w) = (z + 1, min.1, min.2);
        } else {
            self.cur = None;
            return Some(ret);
        }
        self.cur = Some((z, h, w));
        Some(ret)
    }
}

#[cfg(test)]
mod tests {
    use super::VoxelBox;
    use crate::Idx3d;
    use itertools::iproduct;

    #[test]
    fn test_box_init() {
        assert!(VoxelBox::new((1, 1, 1), (0, 5, 5)).is_none());
        assert!(VoxelBox::from_shape((0, 3, 3)).is_none());

        let b = VoxelBox::new((1, 2, 3), (1, 4, 7)).unwrap();
        assert_eq!(b.shape(), (1, 3, 5));
        assert_eq!(b.len(), 15);
        assert!(b.contains((1, 2, 3)));
        assert!(b.contains((1, 4, 7)));
        assert!(!b.contains((0, 2, 3)));
        assert!(!b.contains((1, 5, 3)));
    }

    #[test]
    fn test_box_local_index() {
        let b = VoxelBox::new((2, 2, 2), (4, 5, 6)).unwrap();
        for (i, pos) in b.iter().enumerate() {
            assert_eq!(b.local_index(pos), i);
            assert_eq!(b.global(b.local(pos)), pos);
        }
    }

    #[test]
    fn test_box_iter() {
        // 这几个基本例子足以证明正确性了.
        for (z, h, w) in iproduct!(1..=3usize, 1..=3usize, 1..=3usize) {
            let b = VoxelBox::from_shape((z, h, w)).unwrap();
            let expected: Vec<Idx3d> = iproduct!(0..z, 0..h, 0..w).collect();
            assert!(Iterator::eq(b.iter(), expected.into_iter()));
        }
    }

    #[test]
    fn test_box_around_and_intersect() {
        let limit = VoxelBox::from_shape((4, 10, 10)).unwrap();
        let b = VoxelBox::around((0, 1, 8), (2, 2, 2), &limit).unwrap();
        assert_eq!(b.min(), (0, 0, 6));
        assert_eq!(b.max(), (2, 3, 9));
        assert!(VoxelBox::around((4, 0, 0), (1, 1, 1), &limit).is_none());

        let other = VoxelBox::new((1, 3, 0), (9, 9, 6)).unwrap();
        let i = b.intersect(&other).unwrap();
        assert_eq!((i.min(), i.max()), ((1, 3, 6), (2, 3, 6)));
        let far = VoxelBox::new((3, 0, 0), (3, 0, 0)).unwrap();
        assert!(b.intersect(&far).is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_box_deserialize_checks_corners() {
        let b = VoxelBox::new((1, 2, 3), (4, 5, 6)).unwrap();
        let bytes = bincode::serialize(&b).unwrap();
        assert_eq!(bincode::deserialize::<VoxelBox>(&bytes).unwrap(), b);

        // 与 `VoxelBox` 字段顺序相同的倒置角点.
        let inverted: (Idx3d, Idx3d) = ((3, 3, 3), (1, 1, 1));
        let bytes = bincode::serialize(&inverted).unwrap();
        assert!(bincode::deserialize::<VoxelBox>(&bytes).is_err());

        let flat: (Idx3d, Idx3d) = ((2, 2, 2), (2, 2, 2));
        let bytes = bincode::serialize(&flat).unwrap();
        let single = bincode::deserialize::<VoxelBox>(&bytes).unwrap();
        assert_eq!(single.len(), 1);
    }
}

//! 基于阈值的模糊区域生长.

use super::{flood_fill_3d_with, FillReport};
use crate::consts::gray::FOREGROUND;
use crate::data::{shape_3d, BitMarker, VoxelBox, VoxelMarker};
use crate::Idx3d;
use ndarray::{s, Array3, ArrayView3};
use num::ToPrimitive;

/// 区域生长的结果: 包围盒大小的局部二值掩膜, 以及掩膜原点在原体数据中的位置.
#[derive(Debug, Clone)]
pub struct GrownRegion {
    bounds: VoxelBox,
    mask: Array3<u8>,
    report: FillReport,
}

impl GrownRegion {
    /// 掩膜 `(0, 0, 0)` 处在原体数据中的坐标.
    #[inline]
    pub fn origin(&self) -> Idx3d {
        self.bounds.min()
    }

    /// 掩膜覆盖的包围盒 (全局坐标).
    #[inline]
    pub fn bounds(&self) -> &VoxelBox {
        &self.bounds
    }

    /// 局部二值掩膜, 形状等于 `self.bounds().shape()`.
    #[inline]
    pub fn mask(&self) -> ArrayView3<u8> {
        self.mask.view()
    }

    /// 消费自身, 取出局部掩膜.
    #[inline]
    pub fn into_mask(self) -> Array3<u8> {
        self.mask
    }

    /// 填充诊断信息.
    #[inline]
    pub fn report(&self) -> &FillReport {
        &self.report
    }

    /// 区域内的体素个数.
    #[inline]
    pub fn volume(&self) -> usize {
        self.report.voxels
    }

    /// 局部坐标 -> 全局坐标.
    #[inline]
    pub fn to_global(&self, local: Idx3d) -> Idx3d {
        self.bounds.global(local)
    }

    /// 区域内所有体素的全局坐标, 按光栅顺序.
    pub fn iter_global(&self) -> impl Iterator<Item = Idx3d> + '_ {
        self.mask
            .indexed_iter()
            .filter(|(_, &p)| p == FOREGROUND)
            .map(|(pos, _)| self.to_global(pos))
    }
}

/// 使用默认的 [`BitMarker`] 进行区域生长. 见 [`grow_region_with`].
#[inline]
pub fn grow_region<T>(
    volume: ArrayView3<T>,
    seed: Idx3d,
    tolerance: f64,
    bounds: &VoxelBox,
) -> Option<GrownRegion>
where
    T: Copy + ToPrimitive,
{
    grow_region_with::<BitMarker, T>(volume, seed, tolerance, bounds)
}

/// 从 `seed` 出发, 在 `bounds` 与体数据的交集内做 6-连通区域生长.
///
/// 目标体素满足 `|v - v_seed| <= tolerance`. 结果写入新分配的局部掩膜,
/// 原体数据不会被修改.
///
/// # 返回值
///
/// `bounds` 与体数据不相交, 或者 `seed` 不在二者交集内时返回 `None`.
pub fn grow_region_with<M, T>(
    volume: ArrayView3<T>,
    seed: Idx3d,
    tolerance: f64,
    bounds: &VoxelBox,
) -> Option<GrownRegion>
where
    M: VoxelMarker,
    T: Copy + ToPrimitive,
{
    let Some(bounds) = VoxelBox::from_shape(shape_3d(volume.shape()))
        .and_then(|whole| whole.intersect(bounds))
        .filter(|b| b.contains(seed))
    else {
        log::warn!("grow_region: seed {seed:?} is outside {bounds:?} or the volume");
        return None;
    };

    let base = volume[seed].to_f64()?;
    let mut mask = Array3::<u8>::zeros(bounds.shape());
    let report = flood_fill_3d_with::<M>(
        seed,
        &bounds,
        |p| {
            volume[p]
                .to_f64()
                .map_or(false, |v| (v - base).abs() <= tolerance)
        },
        |p1, p2| {
            let (z, h, w) = bounds.local(p1);
            mask.slice_mut(s![z, h, w..=w + (p2.2 - p1.2)]).fill(FOREGROUND);
        },
    );
    log::debug!(
        "grow_region from {seed:?} (±{tolerance}) in {:?}: {report:?}",
        bounds.shape()
    );
    Some(GrownRegion {
        bounds,
        mask,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::{grow_region, grow_region_with};
    use crate::consts::gray::*;
    use crate::data::{BitMarker, ByteMarker, HashMarker, VoxelBox};
    use ndarray::{s, Array3};

    /// 背景 1000 中有两块值约为 100 的立方体, 通过一根值为 110 的细杆相连.
    fn phantom() -> Array3<u16> {
        let mut v = Array3::<u16>::from_elem((10, 12, 14), 1000);
        v.slice_mut(s![1..4, 1..4, 1..4]).fill(100);
        v.slice_mut(s![1..4, 1..4, 9..12]).fill(95);
        v.slice_mut(s![2, 2, 4..9]).fill(110);
        v
    }

    #[test]
    fn test_grow_region_tolerance() {
        let v = phantom();
        let whole = VoxelBox::from_shape((10, 12, 14)).unwrap();

        let r = grow_region(v.view(), (1, 1, 1), 10.0, &whole).unwrap();
        assert_eq!(r.volume(), 27 + 5 + 27);
        assert_eq!(r.origin(), (0, 0, 0));
        assert_eq!(r.mask()[(2, 2, 6)], FOREGROUND);
        assert_eq!(r.mask()[(0, 0, 0)], BACKGROUND);

        // 容差不足以跨过细杆.
        let r = grow_region(v.view(), (1, 1, 1), 5.0, &whole).unwrap();
        assert_eq!(r.volume(), 27);
        assert!(r.iter_global().all(|(z, h, w)| (1..4).contains(&z)
            && (1..4).contains(&h)
            && (1..4).contains(&w)));
    }

    #[test]
    fn test_grow_region_local_mask() {
        let v = phantom();
        let bounds = VoxelBox::new((2, 2, 2), (20, 20, 10)).unwrap();
        let r = grow_region(v.view(), (2, 2, 2), 10.0, &bounds).unwrap();
        assert_eq!(r.origin(), (2, 2, 2));
        assert_eq!(r.bounds().max(), (9, 11, 10));
        assert_eq!(r.mask().shape(), &[8, 10, 9]);
        // (2..4)^3 的角块, 细杆 (2, 2, 4..9), 以及右侧方块在盒内的 (2..4, 2..4, 9..=10).
        assert_eq!(r.volume(), 8 + 5 + 8);
        assert_eq!(r.to_global((0, 0, 7)), (2, 2, 9));
        assert_eq!(r.mask()[(0, 0, 7)], FOREGROUND);
        let count = r.mask().iter().filter(|p| is_foreground(**p)).count();
        assert_eq!(count, r.volume());
    }

    #[test]
    fn test_grow_region_seed_outside() {
        let v = phantom();
        let bounds = VoxelBox::new((0, 0, 0), (3, 3, 3)).unwrap();
        assert!(grow_region(v.view(), (5, 5, 5), 10.0, &bounds).is_none());
        let far = VoxelBox::new((20, 0, 0), (30, 3, 3)).unwrap();
        assert!(grow_region(v.view(), (1, 1, 1), 10.0, &far).is_none());
    }

    #[test]
    fn test_grow_region_markers_agree() {
        let v = phantom();
        let whole = VoxelBox::from_shape((10, 12, 14)).unwrap();
        let a = grow_region_with::<BitMarker, _>(v.view(), (5, 5, 5), 0.0, &whole).unwrap();
        let b = grow_region_with::<ByteMarker, _>(v.view(), (5, 5, 5), 0.0, &whole).unwrap();
        let c = grow_region_with::<HashMarker, _>(v.view(), (5, 5, 5), 0.0, &whole).unwrap();
        assert_eq!(a.volume(), 10 * 12 * 14 - 27 - 27 - 5);
        assert_eq!(a.mask(), b.mask());
        assert_eq!(a.mask(), c.mask());
        assert_eq!(a.report(), c.report());
    }
}

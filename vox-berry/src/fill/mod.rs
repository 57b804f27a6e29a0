//! 扫描线泛洪填充.
//!
//! 所有填充共用同一个算法 [`scanline_fill`], 差别只在于 [`ScanTarget`] 的实现:
//!
//! 1. 二维网格填充 ([`flood_fill_2d`]): 目标为 "值不等于填充值" 的像素, 直接写回网格.
//! 2. 三维谓词填充 ([`flood_fill_3d`]): 目标由调用者的谓词决定, 已访问状态保存在
//!    [`VoxelMarker`] 中, 每个极大行段回调一次 `fill_line`, 不修改任何输入.
//! 3. 模糊区域生长 ([`grow_region`]): 谓词为 "与种子的值相差不超过容差".

mod region;
mod scanline;

pub use region::{grow_region, grow_region_with, GrownRegion};
pub use scanline::{scanline_fill, FillReport, ScanTarget};

use crate::data::{BinaryGridView, BitMarker, VoxelBox, VoxelMarker};
use crate::error::{VoxError, VoxResult};
use crate::{Idx2d, Idx3d};

/// 以网格本身作为填充状态的目标. 填充过的像素不再是目标, 因此不需要额外的标记.
struct GridTarget<'g, G: ?Sized> {
    grid: &'g mut G,
    fill: bool,
}

impl<G: BinaryGridView + ?Sized> ScanTarget for GridTarget<'_, G> {
    #[inline]
    fn is_target(&self, (_, h, w): Idx3d) -> bool {
        self.grid.get((h, w)) != self.fill
    }

    #[inline]
    fn is_marked(&self, _: Idx3d) -> bool {
        false
    }

    fn mark(&mut self, (_, h, w): Idx3d, w_end: usize) {
        for w in w..=w_end {
            self.grid.set((h, w), self.fill);
        }
    }
}

/// 二维 4-连通扫描线填充, 原地修改 `grid`, 返回新填充的像素个数.
///
/// `erase == false` 时把与种子相连的 "关" 像素置为 "开"; `erase == true` 时反之.
/// 种子本身已经是填充值时不做任何事, 返回 0.
///
/// # 错误
///
/// 种子不在网格内时返回 [`VoxError::SeedOutOfBounds`], 此时网格没有被修改.
pub fn flood_fill_2d<G>(grid: &mut G, seed: Idx2d, erase: bool) -> VoxResult<usize>
where
    G: BinaryGridView + ?Sized,
{
    let shape @ (h, w) = grid.shape();
    let bounds = grid
        .check(seed)
        .then(|| VoxelBox::from_shape((1, h, w)))
        .flatten()
        .ok_or(VoxError::SeedOutOfBounds { seed, shape })?;
    let mut target = GridTarget { grid, fill: !erase };
    let report = scanline_fill(&mut target, &bounds, (0, seed.0, seed.1));
    log::debug!("flood_fill_2d from {seed:?} (erase = {erase}): {report:?}");
    Ok(report.voxels)
}

/// 由谓词决定目标, 由 [`VoxelMarker`] 记录访问状态的目标.
struct PredicateTarget<M, P, F> {
    marker: M,
    is_target: P,
    fill_line: F,
}

impl<M, P, F> ScanTarget for PredicateTarget<M, P, F>
where
    M: VoxelMarker,
    P: Fn(Idx3d) -> bool,
    F: FnMut(Idx3d, Idx3d),
{
    #[inline]
    fn is_target(&self, pos: Idx3d) -> bool {
        (self.is_target)(pos)
    }

    #[inline]
    fn is_marked(&self, pos: Idx3d) -> bool {
        self.marker.is_marked(pos)
    }

    fn mark(&mut self, pos: Idx3d, w_end: usize) {
        self.marker.mark(pos, w_end);
        (self.fill_line)(pos, (pos.0, pos.1, w_end));
    }
}

/// 三维 6-连通谓词填充, 使用默认的 [`BitMarker`].
///
/// 见 [`flood_fill_3d_with`].
#[inline]
pub fn flood_fill_3d(
    seed: Idx3d,
    bounds: &VoxelBox,
    is_target: impl Fn(Idx3d) -> bool,
    fill_line: impl FnMut(Idx3d, Idx3d),
) -> FillReport {
    flood_fill_3d_with::<BitMarker>(seed, bounds, is_target, fill_line)
}

/// 三维 6-连通谓词填充, 使用 `M` 记录已访问体素.
///
/// 在 `bounds` 内找到所有从 `seed` 出发、只经过满足 `is_target` 的体素即可到达的体素,
/// 并对每个极大行段 `[p1, p2]` (两端均包含, 只有 `w` 不同) 恰好调用一次 `fill_line(p1, p2)`.
/// 输入不会被修改.
///
/// `seed` 不在 `bounds` 内或不满足 `is_target` 时什么也不做, 返回全零的报告.
pub fn flood_fill_3d_with<M: VoxelMarker>(
    seed: Idx3d,
    bounds: &VoxelBox,
    is_target: impl Fn(Idx3d) -> bool,
    fill_line: impl FnMut(Idx3d, Idx3d),
) -> FillReport {
    if !bounds.contains(seed) {
        return FillReport::default();
    }
    let mut target = PredicateTarget {
        marker: M::new(*bounds),
        is_target,
        fill_line,
    };
    let report = scanline_fill(&mut target, bounds, seed);
    log::trace!("flood_fill_3d from {seed:?}: {report:?}");
    report
}

//! 扫描线泛洪填充的通用实现.

use crate::data::VoxelBox;
use crate::Idx3d;

cfg_if::cfg_if! {
    if #[cfg(feature = "serde")] {
        use serde::{Deserialize, Serialize};
    }
}

/// 扫描线填充所需的全部能力.
///
/// 一个体素 "可填充" 当且仅当 `is_target(pos) && !is_marked(pos)`.
/// 填充过程中只会通过 `mark` 修改状态, 且调用 `mark` 之后, 该行上的体素必须不再可填充.
pub trait ScanTarget {
    /// `pos` 是否属于填充目标.
    fn is_target(&self, pos: Idx3d) -> bool;

    /// `pos` 是否已被填充.
    fn is_marked(&self, pos: Idx3d) -> bool;

    /// 将同一行上的闭区间 `[pos.2, w_end]` 标记为已填充.
    fn mark(&mut self, pos: Idx3d, w_end: usize);
}

/// 一次填充调用的诊断信息.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FillReport {
    /// 填充的体素个数.
    pub voxels: usize,

    /// 标记的极大行段个数, 即 `mark` 的调用次数.
    pub lines: usize,

    /// 压栈次数 (含种子).
    pub pushes: usize,

    /// 栈的最大深度.
    pub max_stack: usize,
}

#[inline]
fn fillable<S: ScanTarget + ?Sized>(target: &S, pos: Idx3d) -> bool {
    target.is_target(pos) && !target.is_marked(pos)
}

/// 从 `seed` 开始, 在 `bounds` 内以 6-连通 (`bounds` 的 z 长度为 1 时即为 4-连通)
/// 填充所有可达的目标体素.
///
/// 使用显式栈, 不递归. 每次出栈后先在当前行上向左右扩展出极大行段并整段标记,
/// 然后在 `[w0, w1]` 范围内扫描相邻的行 (`h ± 1`) 和相邻的切片 (`z ± 1`),
/// 每个新发现的子段只压入一个种子.
///
/// `seed` 不在 `bounds` 内, 或者 `seed` 本身不可填充时, 直接返回全零的报告.
pub fn scanline_fill<S: ScanTarget + ?Sized>(
    target: &mut S,
    bounds: &VoxelBox,
    seed: Idx3d,
) -> FillReport {
    let mut report = FillReport::default();
    if !bounds.contains(seed) || !fillable(target, seed) {
        return report;
    }
    let (min, max) = (bounds.min(), bounds.max());

    let mut stack = Vec::with_capacity(64);
    stack.push(seed);
    report.pushes = 1;
    report.max_stack = 1;

    while let Some(p @ (z, h, w)) = stack.pop() {
        // 同一行段可能被多次压栈.
        if !fillable(target, p) {
            continue;
        }

        let mut w0 = w;
        while w0 > min.2 && fillable(target, (z, h, w0 - 1)) {
            w0 -= 1;
        }
        let mut w1 = w;
        while w1 < max.2 && fillable(target, (z, h, w1 + 1)) {
            w1 += 1;
        }
        target.mark((z, h, w0), w1);
        report.voxels += w1 - w0 + 1;
        report.lines += 1;

        let rows = [
            (h > min.1).then(|| (z, h - 1)),
            (h < max.1).then(|| (z, h + 1)),
            (z > min.0).then(|| (z - 1, h)),
            (z < max.0).then(|| (z + 1, h)),
        ];
        for (nz, nh) in rows.into_iter().flatten() {
            let mut in_run = false;
            for x in w0..=w1 {
                if fillable(target, (nz, nh, x)) {
                    if !in_run {
                        stack.push((nz, nh, x));
                        report.pushes += 1;
                        in_run = true;
                    }
                } else {
                    in_run = false;
                }
            }
        }
        report.max_stack = report.max_stack.max(stack.len());
    }
    report
}

#[cfg(test)]
mod tests {
    use super::{scanline_fill, FillReport, ScanTarget};
    use crate::data::VoxelBox;
    use crate::Idx3d;
    use ndarray::Array3;

    /// 直接在 `bool` 体数据上填充的最简目标.
    struct Plain {
        walls: Array3<bool>,
        filled: Array3<bool>,
        calls: usize,
    }

    impl ScanTarget for Plain {
        fn is_target(&self, pos: Idx3d) -> bool {
            !self.walls[pos]
        }

        fn is_marked(&self, pos: Idx3d) -> bool {
            self.filled[pos]
        }

        fn mark(&mut self, (z, h, w): Idx3d, w_end: usize) {
            self.calls += 1;
            for x in w..=w_end {
                assert!(!self.filled[(z, h, x)], "重复标记 {:?}", (z, h, x));
                self.filled[(z, h, x)] = true;
            }
        }
    }

    fn plain(shape: Idx3d) -> Plain {
        Plain {
            walls: Array3::from_elem(shape, false),
            filled: Array3::from_elem(shape, false),
            calls: 0,
        }
    }

    #[test]
    fn test_fill_whole_box() {
        let mut t = plain((3, 4, 5));
        let bounds = VoxelBox::from_shape((3, 4, 5)).unwrap();
        let r = scanline_fill(&mut t, &bounds, (1, 2, 3));
        assert_eq!(r.voxels, 60);
        assert_eq!(r.lines, 12);
        assert_eq!(r.lines, t.calls);
        assert!(t.filled.iter().all(|v| *v));
        assert!(r.max_stack >= 1 && r.pushes >= r.lines);
    }

    #[test]
    fn test_fill_respects_bounds() {
        let mut t = plain((4, 6, 6));
        let bounds = VoxelBox::new((1, 1, 2), (2, 3, 4)).unwrap();
        let r = scanline_fill(&mut t, &bounds, (2, 2, 2));
        assert_eq!(r.voxels, bounds.len());
        for (pos, v) in t.filled.indexed_iter() {
            assert_eq!(*v, bounds.contains(pos));
        }
    }

    #[test]
    fn test_fill_stops_at_walls() {
        // z = 1 处整片是墙, 将上下两层隔开.
        let mut t = plain((3, 3, 3));
        t.walls.index_axis_mut(ndarray::Axis(0), 1).fill(true);
        let bounds = VoxelBox::from_shape((3, 3, 3)).unwrap();
        let r = scanline_fill(&mut t, &bounds, (0, 0, 0));
        assert_eq!(r.voxels, 9);
        assert!(t.filled.index_axis(ndarray::Axis(0), 2).iter().all(|v| !*v));
    }

    #[test]
    fn test_fill_noop_seeds() {
        let mut t = plain((2, 2, 2));
        t.walls[(0, 0, 0)] = true;
        let bounds = VoxelBox::new((0, 0, 0), (1, 1, 0)).unwrap();
        assert_eq!(scanline_fill(&mut t, &bounds, (0, 0, 0)), FillReport::default());
        assert_eq!(scanline_fill(&mut t, &bounds, (0, 0, 1)), FillReport::default());
        assert_eq!(t.calls, 0);
    }
}

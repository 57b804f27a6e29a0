//! 单趟光栅扫描 + 延迟并查集解析的连通域标记实现.

use super::union_find::UnionFind;
use super::{LabelStats, LabelValue, Offset3d};
use crate::data::{offset_3d, shape_3d, VoxelBox};
use crate::error::{VoxError, VoxResult};
use ndarray::{Array3, ArrayView3, IntoDimension, Ix3};
use num::NumCast;

/// 扫描结果: 最终标签图, 最终标签个数, 以及可选的逐标签统计信息.
pub(super) type ScanOutput<L> = (Array3<L>, usize, Option<Vec<LabelStats<Ix3>>>);

/// 对三维网格 `src` 进行连通域标记. 二维情形以 `z` 方向长度为 1 的网格调用.
///
/// `offsets` 必须只包含在光栅顺序 (z 最慢, w 最快) 下 **已经访问过** 的邻居偏移.
/// 值严格大于 `threshold` 的体素为前景; 网格外的体素一律视为背景.
pub(super) fn label_volume<T, L>(
    src: ArrayView3<T>,
    offsets: &[Offset3d],
    threshold: T,
    with_stats: bool,
) -> VoxResult<ScanOutput<L>>
where
    T: Copy + PartialOrd,
    L: LabelValue,
{
    let shape = shape_3d(src.shape());
    let mut labels = Array3::<L>::zeros(shape);
    let mut uf = UnionFind::with_capacity(64);

    let Some(bounds) = VoxelBox::from_shape(shape) else {
        return Ok((labels, 0, with_stats.then(Vec::new)));
    };

    // 第一趟: 分配临时标签并记录等价关系.
    for pos in bounds.iter() {
        if !(src[pos] > threshold) {
            continue;
        }

        // 已访问邻居中最小的临时标签.
        let mut smallest: Option<L> = None;
        for &d in offsets {
            let Some(q) = offset_3d(pos, d, shape) else {
                continue;
            };
            let l = labels[q];
            if l != L::zero() && smallest.map_or(true, |s| l < s) {
                smallest = Some(l);
            }
        }

        labels[pos] = match smallest {
            Some(s) => {
                let s_idx = to_index(s);
                for &d in offsets {
                    if let Some(q) = offset_3d(pos, d, shape) {
                        let l = labels[q];
                        if l != L::zero() && l != s {
                            uf.union(s_idx, to_index(l));
                        }
                    }
                }
                s
            }
            None => new_label(&mut uf)?,
        };
    }
    log::trace!(
        "label scan: {} tentative labels, {} merges",
        uf.len(),
        uf.merges()
    );

    // 第二趟: 解析等价表并重新编号, 同时累计统计信息.
    let (table, count) = uf.resolve();
    let mut stats: Option<Vec<Option<LabelStats<Ix3>>>> = with_stats.then(|| vec![None; count]);
    for (pos, l) in labels.indexed_iter_mut() {
        if *l == L::zero() {
            continue;
        }
        let f = table[to_index(*l)];
        // 最终标签不大于临时标签, 因此必然可以表示.
        *l = <L as NumCast>::from(f).unwrap_or_else(|| unreachable!());
        if let Some(stats) = stats.as_mut() {
            let slot = &mut stats[f - 1];
            match slot {
                Some(s) => s.update(pos.into_dimension()),
                None => *slot = Some(LabelStats::first(pos.into_dimension())),
            }
        }
    }
    let stats = stats.map(|v| v.into_iter().flatten().collect::<Vec<_>>());
    debug_assert!(stats.as_ref().map_or(true, |s| s.len() == count));
    Ok((labels, count, stats))
}

/// 分配一个新的临时标签. 超出 `L` 的表示范围时立刻报错, 不会回绕.
#[inline]
fn new_label<L: LabelValue>(uf: &mut UnionFind) -> VoxResult<L> {
    let next = uf.len() + 1;
    let l = <L as NumCast>::from(next).ok_or(VoxError::LabelCapacityExceeded {
        max: L::max_value().to_u64().unwrap_or(u64::MAX),
    })?;
    let id = uf.make_set();
    debug_assert_eq!(id, next);
    Ok(l)
}

#[inline]
fn to_index<L: LabelValue>(l: L) -> usize {
    l.to_usize().unwrap_or_else(|| unreachable!())
}

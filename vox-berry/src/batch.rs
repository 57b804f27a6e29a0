//! 借助 `rayon`, 对相互独立的切片并行调用单切片算法.
//!
//! 每个切片是一次独立的调用, 各自分配临时状态, 不存在共享的可变数据.
//! 单次调用内部仍然是顺序执行的.

use crate::distance::signed_distance_2d;
use crate::error::VoxResult;
use crate::label::{label_2d, Connectivity2d, LabelMap, LabelValue};
use ndarray::{Array3, ArrayView3, Axis, Ix2};
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};

/// 并行地对每个水平切片 (固定 `z`) 分别做二维连通域标记.
///
/// 返回值第 `z` 项为第 `z` 张切片的结果.
///
/// # 错误
///
/// 任一切片的临时标签数超出 `L` 的表示范围时返回该错误.
pub fn par_label_slices<T, L>(
    volume: ArrayView3<T>,
    connectivity: Connectivity2d,
    threshold: T,
    with_stats: bool,
) -> VoxResult<Vec<LabelMap<L, Ix2>>>
where
    T: Copy + PartialOrd + Send + Sync,
    L: LabelValue,
{
    let maps: Vec<LabelMap<L, Ix2>> = volume
        .axis_iter(Axis(0))
        .into_par_iter()
        .map(|slice| label_2d(slice, connectivity, threshold, with_stats))
        .collect::<VoxResult<_>>()?;
    log::debug!(
        "par_label_slices: {} slices, {} labels in total",
        maps.len(),
        maps.iter().map(LabelMap::count).sum::<usize>()
    );
    Ok(maps)
}

/// 并行地对每个水平切片计算二维有符号距离场, 结果按 `z` 堆叠.
pub fn par_signed_distance_slices(volume: ArrayView3<u8>) -> Array3<f32> {
    let mut out = Array3::<f32>::zeros(volume.raw_dim());
    out.axis_iter_mut(Axis(0))
        .into_par_iter()
        .zip(volume.axis_iter(Axis(0)).into_par_iter())
        .for_each(|(mut o, s)| o.assign(&signed_distance_2d(s)));
    out
}

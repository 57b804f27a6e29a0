//! 连通域标记.
//!
//! 单趟光栅扫描为前景体素分配临时标签, 并用并查集记录标签等价关系; 扫描结束后
//! 第二趟把临时标签解析为从 1 开始连续编号的最终标签, 并 (可选地) 同时累计每个标签的
//! 体素个数与包围盒.
//!
//! # 注意
//!
//! 1. 最终标签按照每个连通域 **第一个** 体素在光栅顺序 (z 最慢, w 最快) 中出现的先后编号.
//! 2. 网格外一律视为背景, 不存在回绕.
//! 3. 临时标签数超出 `L` 的表示范围时立即返回 [`VoxError::LabelCapacityExceeded`].
//!
//! [`VoxError::LabelCapacityExceeded`]: crate::error::VoxError::LabelCapacityExceeded

mod scan;
mod union_find;

use crate::consts::gray::from_bool;
use crate::error::VoxResult;
use ndarray::{Array, Array2, Array3, ArrayView, ArrayView2, ArrayView3, Axis};
use ndarray::{Dimension, IntoDimension, Ix2, Ix3};
use num::{PrimInt, Unsigned};
use std::fmt::Debug;

cfg_if::cfg_if! {
    if #[cfg(feature = "serde")] {
        use serde::{Deserialize, Serialize};
    }
}

/// 三维有符号邻居偏移 `(dz, dh, dw)`.
pub type Offset3d = (isize, isize, isize);

/// 二维 4 邻域中, 光栅顺序下已经访问过的邻居.
const PRIOR_4: [Offset3d; 2] = [(0, -1, 0), (0, 0, -1)];

/// 二维 8 邻域中, 光栅顺序下已经访问过的邻居.
const PRIOR_8: [Offset3d; 4] = [(0, -1, -1), (0, -1, 0), (0, -1, 1), (0, 0, -1)];

/// 三维 6 邻域中, 光栅顺序下已经访问过的邻居.
const PRIOR_6: [Offset3d; 3] = [(-1, 0, 0), (0, -1, 0), (0, 0, -1)];

/// 三维 26 邻域中, 光栅顺序下已经访问过的 13 个邻居.
const PRIOR_26: [Offset3d; 13] = [
    (-1, -1, -1),
    (-1, -1, 0),
    (-1, -1, 1),
    (-1, 0, -1),
    (-1, 0, 0),
    (-1, 0, 1),
    (-1, 1, -1),
    (-1, 1, 0),
    (-1, 1, 1),
    (0, -1, -1),
    (0, -1, 0),
    (0, -1, 1),
    (0, 0, -1),
];

/// 二维连通性.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Connectivity2d {
    /// 上下左右.
    Four,

    /// 上下左右及四个对角.
    Eight,
}

impl Connectivity2d {
    /// 光栅顺序下已访问的邻居偏移, `dz` 恒为 0.
    #[inline]
    pub fn offsets(self) -> &'static [Offset3d] {
        match self {
            Self::Four => &PRIOR_4,
            Self::Eight => &PRIOR_8,
        }
    }
}

/// 三维连通性.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Connectivity3d {
    /// 共面.
    Six,

    /// 共面, 共棱或共顶点.
    TwentySix,
}

impl Connectivity3d {
    /// 光栅顺序下已访问的邻居偏移.
    #[inline]
    pub fn offsets(self) -> &'static [Offset3d] {
        match self {
            Self::Six => &PRIOR_6,
            Self::TwentySix => &PRIOR_26,
        }
    }
}

/// 标签图的元素类型. 位宽决定了能区分的标签个数上限.
pub trait LabelValue: PrimInt + Unsigned + Default + Debug + Send + Sync + 'static {}

impl LabelValue for u8 {}
impl LabelValue for u16 {}
impl LabelValue for u32 {}

/// 单个标签的统计信息: 体素个数和紧包围盒 (闭区间).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LabelStats<D: Dimension> {
    volume: usize,
    min: D,
    max: D,
}

impl<D: Dimension> LabelStats<D> {
    #[inline]
    fn first(pos: D) -> Self {
        Self {
            volume: 1,
            min: pos.clone(),
            max: pos,
        }
    }

    #[inline]
    fn update(&mut self, pos: D) {
        self.volume += 1;
        for i in 0..pos.ndim() {
            self.min[i] = self.min[i].min(pos[i]);
            self.max[i] = self.max[i].max(pos[i]);
        }
    }

    /// 体素个数.
    #[inline]
    pub fn volume(&self) -> usize {
        self.volume
    }

    /// 包围盒的最小角点.
    #[inline]
    pub fn min(&self) -> D::Pattern {
        self.min.clone().into_pattern()
    }

    /// 包围盒的最大角点 (包含).
    #[inline]
    pub fn max(&self) -> D::Pattern {
        self.max.clone().into_pattern()
    }

    /// `pos` 是否位于包围盒内.
    pub fn contains<I: IntoDimension<Dim = D>>(&self, pos: I) -> bool {
        let pos = pos.into_dimension();
        (0..pos.ndim()).all(|i| self.min[i] <= pos[i] && pos[i] <= self.max[i])
    }
}

impl LabelStats<Ix3> {
    /// 丢弃长度为 1 的 z 维度.
    fn squeeze(self) -> LabelStats<Ix2> {
        debug_assert_eq!(self.min[0], self.max[0]);
        LabelStats {
            volume: self.volume,
            min: ndarray::Ix2(self.min[1], self.min[2]),
            max: ndarray::Ix2(self.max[1], self.max[2]),
        }
    }
}

/// 连通域标记结果.
#[derive(Clone, Debug)]
pub struct LabelMap<L, D: Dimension> {
    data: Array<L, D>,
    count: usize,
    stats: Option<Vec<LabelStats<D>>>,
}

impl<L: LabelValue, D: Dimension> LabelMap<L, D> {
    /// 标签图. `0` 为背景, 其余为 `1..=self.count()`.
    #[inline]
    pub fn data(&self) -> ArrayView<L, D> {
        self.data.view()
    }

    /// 消费自身, 取出标签图.
    #[inline]
    pub fn into_raw(self) -> Array<L, D> {
        self.data
    }

    /// 标签个数 (不含背景).
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// 逐标签统计信息, 第 `i` 项对应标签 `i + 1`. 标记时未要求统计则为 `None`.
    #[inline]
    pub fn stats(&self) -> Option<&[LabelStats<D>]> {
        self.stats.as_deref()
    }

    /// 标签 `label` 的统计信息.
    pub fn stats_of(&self, label: usize) -> Option<&LabelStats<D>> {
        self.stats.as_ref()?.get(label.checked_sub(1)?)
    }

    /// 每个标签的体素个数, 第 `i` 项对应标签 `i + 1`.
    ///
    /// 有统计信息时直接读取, 否则重新遍历标签图.
    pub fn volumes(&self) -> Vec<usize> {
        if let Some(stats) = self.stats.as_ref() {
            return stats.iter().map(LabelStats::volume).collect();
        }
        let mut hist = vec![0usize; self.count + 1];
        for l in self.data.iter() {
            hist[l.to_usize().unwrap_or(0)] += 1;
        }
        hist.remove(0);
        hist
    }

    /// 体素个数最多的标签. 个数相同时取编号最小者; 没有任何标签时返回 `None`.
    pub fn largest(&self) -> Option<usize> {
        self.volumes()
            .into_iter()
            .enumerate()
            .rev()
            .max_by_key(|&(_, v)| v)
            .map(|(i, _)| i + 1)
    }

    /// 标签 `label` 的二值掩膜.
    pub fn mask_of(&self, label: usize) -> Array<u8, D> {
        self.data.mapv(|l| from_bool(l.to_usize() == Some(label)))
    }

    /// 只保留最大连通域, 并将其重新编号为 `1`. 其余标签全部置为背景.
    pub fn retain_largest(&mut self) {
        let Some(keep) = self.largest() else {
            return;
        };
        self.data.mapv_inplace(|l| {
            if l.to_usize() == Some(keep) {
                L::one()
            } else {
                L::zero()
            }
        });
        if let Some(stats) = self.stats.as_mut() {
            let s = stats.swap_remove(keep - 1);
            *stats = vec![s];
        }
        log::debug!("retain largest: label {keep} of {}", self.count);
        self.count = 1;
    }
}

/// 二维连通域标记. 值严格大于 `threshold` 的像素为前景.
///
/// 扫描时只查看当前行与上一行.
pub fn label_2d<T, L>(
    src: ArrayView2<T>,
    connectivity: Connectivity2d,
    threshold: T,
    with_stats: bool,
) -> VoxResult<LabelMap<L, Ix2>>
where
    T: Copy + PartialOrd,
    L: LabelValue,
{
    let (labels, count, stats) = scan::label_volume::<T, L>(
        src.insert_axis(Axis(0)),
        connectivity.offsets(),
        threshold,
        with_stats,
    )?;
    let data: Array2<L> = labels.index_axis_move(Axis(0), 0);
    log::debug!("label_2d ({connectivity:?}): {count} labels");
    Ok(LabelMap {
        data,
        count,
        stats: stats.map(|v| v.into_iter().map(LabelStats::squeeze).collect()),
    })
}

/// 三维连通域标记. 值严格大于 `threshold` 的体素为前景.
pub fn label_3d<T, L>(
    src: ArrayView3<T>,
    connectivity: Connectivity3d,
    threshold: T,
    with_stats: bool,
) -> VoxResult<LabelMap<L, Ix3>>
where
    T: Copy + PartialOrd,
    L: LabelValue,
{
    let (data, count, stats): (Array3<L>, _, _) =
        scan::label_volume(src, connectivity.offsets(), threshold, with_stats)?;
    log::debug!("label_3d ({connectivity:?}): {count} labels");
    Ok(LabelMap { data, count, stats })
}

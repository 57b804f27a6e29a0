//! 基于距离场的层间插值.
//!
//! 对相邻两张已标注切片 `k0 < k1` (间隔至少为 2), 分别计算其有符号距离场,
//! 对每张中间切片 `k` 按 `(k1 - k) : (k - k0)` 线性插值两个距离场, 并以 `<= 0` 作为前景.
//!
//! # 注意
//!
//! 1. 只修改严格位于两张已标注切片之间的切片. 间隔为 1, 以及已标注范围之外的切片保持不变.
//! 2. [`InterpolationMode::Single`] 先把两张切片按前景质心平移到切片中心再插值,
//!    插值后再按线性插值得到的质心平移回去. 平移量取最近的整数体素.

use crate::consts::gray::*;
use crate::distance::signed_distance_2d;
use crate::Idx2d;
use itertools::Itertools;
use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis, Zip};

cfg_if::cfg_if! {
    if #[cfg(feature = "serde")] {
        use serde::{Deserialize, Serialize};
    }
}

/// 层间插值模式.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum InterpolationMode {
    /// 切片中只有一个目标. 插值前对齐质心, 可以容忍两张切片之间的平移.
    Single,

    /// 整张切片直接插值, 不做对齐.
    #[default]
    Multi,
}

/// 含有前景的切片下标 (z), 升序.
pub fn labeled_slices(volume: ArrayView3<u8>) -> Vec<usize> {
    volume
        .axis_iter(Axis(0))
        .enumerate()
        .filter(|(_, slice)| slice.iter().any(|p| is_foreground(*p)))
        .map(|(z, _)| z)
        .collect()
}

/// 在已标注切片之间合成缺失的切片, 返回新的 `0/1` 体数据.
pub fn interpolate_slices(volume: ArrayView3<u8>, mode: InterpolationMode) -> Array3<u8> {
    let mut out = volume.mapv(|p| from_bool(is_foreground(p)));
    let labeled = labeled_slices(volume);
    for (k0, k1) in labeled.into_iter().tuple_windows() {
        if k1 - k0 < 2 {
            continue;
        }
        log::debug!("interpolate slices {}..{k1} ({mode:?})", k0 + 1);
        let (s0, s1) = (volume.index_axis(Axis(0), k0), volume.index_axis(Axis(0), k1));
        match mode {
            InterpolationMode::Multi => fill_gap_multi(&mut out, s0, s1, k0, k1),
            InterpolationMode::Single => fill_gap_single(&mut out, s0, s1, k0, k1),
        }
    }
    out
}

/// 按 `(k1 - k) : (k - k0)` 插值两个距离场, 并阈值化.
fn blend(d0: &Array2<f32>, d1: &Array2<f32>, k0: usize, k1: usize, k: usize) -> Array2<u8> {
    let span = (k1 - k0) as f32;
    let (w0, w1) = ((k1 - k) as f32 / span, (k - k0) as f32 / span);
    Zip::from(d0)
        .and(d1)
        .map_collect(|&a, &b| from_bool(a * w0 + b * w1 <= 0.0))
}

fn fill_gap_multi(
    out: &mut Array3<u8>,
    s0: ArrayView2<u8>,
    s1: ArrayView2<u8>,
    k0: usize,
    k1: usize,
) {
    let (d0, d1) = (signed_distance_2d(s0), signed_distance_2d(s1));
    for k in k0 + 1..k1 {
        out.index_axis_mut(Axis(0), k)
            .assign(&blend(&d0, &d1, k0, k1, k));
    }
}

fn fill_gap_single(
    out: &mut Array3<u8>,
    s0: ArrayView2<u8>,
    s1: ArrayView2<u8>,
    k0: usize,
    k1: usize,
) {
    let (h, w) = s0.dim();
    let center = ((h - 1) as f64 / 2.0, (w - 1) as f64 / 2.0);
    // 已标注切片必有前景.
    let (Some(c0), Some(c1)) = (centroid(s0), centroid(s1)) else {
        return;
    };
    let d0 = signed_distance_2d(translate(s0, rounded(center, c0)).view());
    let d1 = signed_distance_2d(translate(s1, rounded(center, c1)).view());

    for k in k0 + 1..k1 {
        let t = (k - k0) as f64 / (k1 - k0) as f64;
        let ck = (c0.0 + (c1.0 - c0.0) * t, c0.1 + (c1.1 - c0.1) * t);
        let centered = blend(&d0, &d1, k0, k1, k);
        out.index_axis_mut(Axis(0), k)
            .assign(&translate(centered.view(), rounded(ck, center)));
    }
}

/// 前景质心 `(h, w)`. 没有前景时返回 `None`.
fn centroid(slice: ArrayView2<u8>) -> Option<(f64, f64)> {
    let (mut n, mut sh, mut sw) = (0usize, 0usize, 0usize);
    for ((h, w), _) in slice.indexed_iter().filter(|(_, p)| is_foreground(**p)) {
        n += 1;
        sh += h;
        sw += w;
    }
    (n > 0).then(|| (sh as f64 / n as f64, sw as f64 / n as f64))
}

/// `to - from`, 四舍五入到整数体素.
#[inline]
fn rounded(to: (f64, f64), from: (f64, f64)) -> (isize, isize) {
    ((to.0 - from.0).round() as isize, (to.1 - from.1).round() as isize)
}

/// 平移: `out[p + shift] = src[p]`. 移出网格的部分丢弃, 空出的部分为背景.
fn translate(src: ArrayView2<u8>, (dh, dw): (isize, isize)) -> Array2<u8> {
    let (h_len, w_len) = src.dim();
    Array2::from_shape_fn((h_len, w_len), |(h, w)| {
        let from: Option<Idx2d> = h
            .checked_add_signed(-dh)
            .zip(w.checked_add_signed(-dw))
            .filter(|&(sh, sw)| sh < h_len && sw < w_len);
        from.map_or(BACKGROUND, |p| from_bool(is_foreground(src[p])))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::s;

    fn disk(shape: Idx2d, (ch, cw): Idx2d, r: usize) -> Array2<u8> {
        Array2::from_shape_fn(shape, |(h, w)| {
            from_bool(h.abs_diff(ch).pow(2) + w.abs_diff(cw).pow(2) <= r * r)
        })
    }

    #[test]
    fn test_labeled_slices() {
        let mut v = Array3::<u8>::zeros((6, 3, 3));
        v[(1, 0, 0)] = 4;
        v[(4, 2, 2)] = FOREGROUND;
        assert_eq!(labeled_slices(v.view()), [1, 4]);
        assert!(labeled_slices(Array3::<u8>::zeros((2, 2, 2)).view()).is_empty());
    }

    #[test]
    fn test_identical_circles() {
        let circle = disk((15, 15), (7, 7), 4);
        for mode in [InterpolationMode::Single, InterpolationMode::Multi] {
            let mut v = Array3::<u8>::zeros((7, 15, 15));
            v.index_axis_mut(Axis(0), 1).assign(&circle);
            v.index_axis_mut(Axis(0), 5).assign(&circle);
            let out = interpolate_slices(v.view(), mode);
            for k in 1..=5 {
                assert_eq!(out.index_axis(Axis(0), k), circle, "{mode:?} slice {k}");
            }
            assert!(out.index_axis(Axis(0), 0).iter().all(|p| is_background(*p)));
            assert!(out.index_axis(Axis(0), 6).iter().all(|p| is_background(*p)));
        }
    }

    #[test]
    fn test_adjacent_and_outer_slices_untouched() {
        let circle = disk((9, 9), (4, 4), 2);
        let mut v = Array3::<u8>::zeros((8, 9, 9));
        for k in [1, 2, 6] {
            v.index_axis_mut(Axis(0), k).assign(&circle);
        }
        let out = interpolate_slices(v.view(), InterpolationMode::Multi);
        assert_eq!(labeled_slices(out.view()), [1, 2, 3, 4, 5, 6]);
        assert_eq!(out.slice(s![0, .., ..]), Array2::<u8>::zeros((9, 9)));
        assert_eq!(out.slice(s![7, .., ..]), Array2::<u8>::zeros((9, 9)));
        assert_eq!(out.slice(s![1..=2, .., ..]), v.slice(s![1..=2, .., ..]));
    }

    #[test]
    fn test_single_mode_follows_translation() {
        let shape = (11, 19);
        let mut v = Array3::<u8>::zeros((5, 11, 19));
        v.index_axis_mut(Axis(0), 0).assign(&disk(shape, (5, 5), 3));
        v.index_axis_mut(Axis(0), 4).assign(&disk(shape, (5, 13), 3));
        let out = interpolate_slices(v.view(), InterpolationMode::Single);
        for (k, cw) in [(1, 7), (2, 9), (3, 11)] {
            assert_eq!(out.index_axis(Axis(0), k), disk(shape, (5, cw), 3), "slice {k}");
        }
    }

    #[test]
    fn test_multi_mode_shrinks_between_shapes() {
        crate::init_test_logger();
        let mut v = Array3::<u8>::zeros((5, 13, 13));
        v.index_axis_mut(Axis(0), 0).assign(&disk((13, 13), (6, 6), 5));
        v.index_axis_mut(Axis(0), 4).assign(&disk((13, 13), (6, 6), 1));
        let out = interpolate_slices(v.view(), InterpolationMode::Multi);
        let area = |k: usize| {
            out.index_axis(Axis(0), k)
                .iter()
                .filter(|p| is_foreground(**p))
                .count()
        };
        assert!(area(0) > area(1));
        assert!(area(1) >= area(2));
        assert!(area(2) >= area(3));
        assert!(area(3) >= area(4));
        assert_eq!(out[(2, 6, 6)], FOREGROUND);
    }

    #[test]
    fn test_translate() {
        let src = ndarray::array![[1u8, 0, 0], [0, 0, 0], [0, 0, 5]];
        assert_eq!(
            translate(src.view(), (1, 1)),
            ndarray::array![[0u8, 0, 0], [0, 1, 0], [0, 0, 0]]
        );
        assert_eq!(
            translate(src.view(), (-2, -2)),
            ndarray::array![[1u8, 0, 0], [0, 0, 0], [0, 0, 0]]
        );
    }
}

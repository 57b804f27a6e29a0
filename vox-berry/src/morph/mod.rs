//! 二值形态学: 腐蚀, 膨胀, 开运算与闭运算.
//!
//! 输入中任何非零值都视为前景, 输出为 `0/1` 二值网格. `k` 次迭代依次执行,
//! 每次迭代以上一次的输出作为输入.
//!
//! # 注意
//!
//! 1. 膨胀不会越过网格边界, 也不会回绕.
//! 2. 腐蚀时, 邻域有任何一部分落在网格外的体素一律不保留. 即网格边界等同于背景.

mod element;

pub use element::StructuringElement;

use crate::consts::gray::*;
use crate::data::{offset_3d, shape_3d};
use crate::error::{VoxError, VoxResult};
use crate::label::Offset3d;
use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis};

type Pass = fn(ArrayView3<u8>, &[Offset3d]) -> Array3<u8>;

fn dilate_once(src: ArrayView3<u8>, offsets: &[Offset3d]) -> Array3<u8> {
    let shape = shape_3d(src.shape());
    let mut out = src.mapv(|p| from_bool(is_foreground(p)));
    for (pos, &p) in src.indexed_iter() {
        if is_background(p) {
            continue;
        }
        for &d in offsets {
            if let Some(q) = offset_3d(pos, d, shape) {
                out[q] = FOREGROUND;
            }
        }
    }
    out
}

fn erode_once(src: ArrayView3<u8>, offsets: &[Offset3d]) -> Array3<u8> {
    let shape = shape_3d(src.shape());
    Array3::from_shape_fn(shape, |pos| {
        let keep = is_foreground(src[pos])
            && offsets.iter().all(|&d| {
                offset_3d(pos, d, shape).map_or(false, |q| is_foreground(src[q]))
            });
        from_bool(keep)
    })
}

fn iterate(
    src: ArrayView3<u8>,
    element: &StructuringElement,
    iterations: usize,
    pass: Pass,
) -> VoxResult<Array3<u8>> {
    if iterations == 0 {
        return Err(VoxError::ZeroIterations);
    }
    let mut cur = pass(src, element.offsets());
    for i in 1..iterations {
        cur = pass(cur.view(), element.offsets());
        log::trace!(
            "morphology iteration {i}: {} foreground voxels",
            cur.iter().filter(|p| is_foreground(**p)).count()
        );
    }
    Ok(cur)
}

/// 三维膨胀, 执行 `iterations` 次.
///
/// # 错误
///
/// `iterations == 0` 时返回 [`VoxError::ZeroIterations`].
pub fn dilate(
    src: ArrayView3<u8>,
    element: &StructuringElement,
    iterations: usize,
) -> VoxResult<Array3<u8>> {
    iterate(src, element, iterations, dilate_once)
}

/// 三维腐蚀, 执行 `iterations` 次.
///
/// # 错误
///
/// `iterations == 0` 时返回 [`VoxError::ZeroIterations`].
pub fn erode(
    src: ArrayView3<u8>,
    element: &StructuringElement,
    iterations: usize,
) -> VoxResult<Array3<u8>> {
    iterate(src, element, iterations, erode_once)
}

/// 开运算: 先腐蚀 `iterations` 次, 再膨胀 `iterations` 次.
pub fn open(
    src: ArrayView3<u8>,
    element: &StructuringElement,
    iterations: usize,
) -> VoxResult<Array3<u8>> {
    let eroded = erode(src, element, iterations)?;
    dilate(eroded.view(), element, iterations)
}

/// 闭运算: 先膨胀 `iterations` 次, 再腐蚀 `iterations` 次.
pub fn close(
    src: ArrayView3<u8>,
    element: &StructuringElement,
    iterations: usize,
) -> VoxResult<Array3<u8>> {
    let dilated = dilate(src, element, iterations)?;
    erode(dilated.view(), element, iterations)
}

fn planar_2d(
    src: ArrayView2<u8>,
    element: &StructuringElement,
    iterations: usize,
    pass: Pass,
) -> VoxResult<Array2<u8>> {
    if !element.is_planar() {
        return Err(VoxError::InvalidStructuringElement(
            "2d morphology needs a planar element",
        ));
    }
    let out = iterate(src.insert_axis(Axis(0)), element, iterations, pass)?;
    Ok(out.index_axis_move(Axis(0), 0))
}

/// 二维膨胀. `element` 必须是平面结构元.
pub fn dilate_2d(
    src: ArrayView2<u8>,
    element: &StructuringElement,
    iterations: usize,
) -> VoxResult<Array2<u8>> {
    planar_2d(src, element, iterations, dilate_once)
}

/// 二维腐蚀. `element` 必须是平面结构元.
pub fn erode_2d(
    src: ArrayView2<u8>,
    element: &StructuringElement,
    iterations: usize,
) -> VoxResult<Array2<u8>> {
    planar_2d(src, element, iterations, erode_once)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, s, Zip};

    fn subset<D: ndarray::Dimension>(a: &ndarray::Array<u8, D>, b: &ndarray::Array<u8, D>) -> bool {
        Zip::from(a)
            .and(b)
            .all(|&x, &y| is_background(x) || is_foreground(y))
    }

    #[test]
    fn test_erode_isolated_voxel() {
        let mut grid = Array2::<u8>::zeros((5, 5));
        grid[(2, 2)] = FOREGROUND;
        let cross = StructuringElement::cross_2d();
        let out = erode_2d(grid.view(), &cross, 1).unwrap();
        assert!(out.iter().all(|p| is_background(*p)));
    }

    #[test]
    fn test_dilate_cross_iterations() {
        let mut grid = Array2::<u8>::zeros((7, 7));
        grid[(3, 3)] = 9;
        let cross = StructuringElement::cross_2d();
        let once = dilate_2d(grid.view(), &cross, 1).unwrap();
        assert_eq!(once.iter().filter(|p| is_foreground(**p)).count(), 5);
        assert_eq!(once[(3, 3)], FOREGROUND);

        // 两次十字膨胀得到半径为 2 的菱形, 而不是 5x5 的十字.
        let twice = dilate_2d(grid.view(), &cross, 2).unwrap();
        assert_eq!(twice.iter().filter(|p| is_foreground(**p)).count(), 13);
        assert_eq!(twice[(2, 2)], FOREGROUND);
        assert_eq!(twice[(1, 2)], BACKGROUND);
    }

    #[test]
    fn test_dilate_clips_at_edge() {
        let mut grid = Array2::<u8>::zeros((3, 3));
        grid[(0, 0)] = FOREGROUND;
        let out = dilate_2d(grid.view(), &StructuringElement::square_2d(1), 1).unwrap();
        assert_eq!(out, array![[1u8, 1, 0], [1, 1, 0], [0, 0, 0]]);
    }

    #[test]
    fn test_erode_edge_is_background() {
        let grid = Array2::<u8>::ones((5, 5));
        let out = erode_2d(grid.view(), &StructuringElement::cross_2d(), 1).unwrap();
        let mut expected = Array2::<u8>::zeros((5, 5));
        expected.slice_mut(s![1..4, 1..4]).fill(FOREGROUND);
        assert_eq!(out, expected);

        let out = erode_2d(grid.view(), &StructuringElement::cross_2d(), 2).unwrap();
        assert_eq!(out.iter().filter(|p| is_foreground(**p)).count(), 1);
    }

    #[test]
    fn test_empty_stays_empty() {
        let empty = Array3::<u8>::zeros((4, 5, 6));
        let e = StructuringElement::cube_3d(1);
        assert_eq!(erode(empty.view(), &e, 2).unwrap(), empty);
        assert_eq!(dilate(empty.view(), &e, 2).unwrap(), empty);
    }

    #[test]
    fn test_morphology_monotonic() {
        crate::init_test_logger();
        let mut rng = oorandom::Rand32::new(42);
        let elements = [
            StructuringElement::cross_2d(),
            StructuringElement::square_2d(1),
            StructuringElement::diamond_3d(),
            StructuringElement::cube_3d(1),
            StructuringElement::new(Array3::from_shape_fn((3, 2, 3), |pos| {
                from_bool(pos == (1, 1, 1) || pos.0 == 2)
            }))
            .unwrap(),
        ];
        for _ in 0..8 {
            let x = Array3::from_shape_fn((5, 6, 7), |_| from_bool(rng.rand_range(0..3) != 0));
            for e in &elements {
                let eroded = erode(x.view(), e, 1).unwrap();
                let dilated = dilate(x.view(), e, 1).unwrap();
                assert!(subset(&eroded, &x));
                assert!(subset(&x, &dilated));

                let opened = open(x.view(), e, 1).unwrap();
                assert!(subset(&opened, &x));
            }
        }
    }

    #[test]
    fn test_open_and_close() {
        let mut grid = Array3::<u8>::zeros((1, 7, 7));
        grid.slice_mut(s![.., 1..6, 1..6]).fill(FOREGROUND);
        grid[(0, 3, 3)] = BACKGROUND;
        grid[(0, 6, 0)] = FOREGROUND;
        let e = StructuringElement::square_2d(1);

        let closed = close(grid.view(), &e, 1).unwrap();
        assert_eq!(closed[(0, 3, 3)], FOREGROUND);

        let opened = open(grid.view(), &e, 1).unwrap();
        assert_eq!(opened[(0, 6, 0)], BACKGROUND);
    }

    #[test]
    fn test_morphology_errors() {
        let grid = Array2::<u8>::ones((3, 3));
        let cross = StructuringElement::cross_2d();
        assert_eq!(
            erode_2d(grid.view(), &cross, 0),
            Err(VoxError::ZeroIterations)
        );
        assert!(matches!(
            dilate_2d(grid.view(), &StructuringElement::diamond_3d(), 1),
            Err(VoxError::InvalidStructuringElement(_))
        ));
    }
}

//! 合成体模. 代替真实 CT 数据, 保证实验可以在任何机器上复现.

use ndarray::Array3;
use vox_berry::data::VoxelBox;
use vox_berry::Idx3d;

/// 体模中目标的灰度值.
pub const TARGET_HU: u16 = 1060;

/// 体模背景的灰度值.
pub const BACKGROUND_HU: u16 = 960;

/// 一次区域生长任务.
#[derive(Debug, Clone)]
pub struct Case {
    /// 用例名.
    pub name: &'static str,

    /// 体数据.
    pub volume: Array3<u16>,

    /// 种子点.
    pub seed: Idx3d,

    /// 容差.
    pub tolerance: f64,

    /// 生长范围.
    pub bounds: VoxelBox,
}

/// 边长为 `size` 的立方体中心有一个半径为 `size * 3 / 8` 的实心球.
pub fn ball(size: usize) -> Array3<u16> {
    let c = (size / 2) as isize;
    let r = (size * 3 / 8) as isize;
    Array3::from_shape_fn((size, size, size), |(z, h, w)| {
        let d = |a: usize| (a as isize - c).pow(2);
        if d(z) + d(h) + d(w) <= r * r {
            TARGET_HU
        } else {
            BACKGROUND_HU
        }
    })
}

/// 在 [`ball`] 上叠加均匀噪声 `[-amp, amp]`. `seed` 相同时结果相同.
pub fn noisy_ball(size: usize, amp: u16, seed: u64) -> Array3<u16> {
    let mut rng = oorandom::Rand32::new(seed);
    let span = 2 * amp as u32 + 1;
    ball(size).mapv(|v| v - amp + rng.rand_range(0..span) as u16)
}

/// 实验用例: 干净的球, 带噪声的球, 以及只在局部范围内生长的带噪声的球.
pub fn cases(size: usize) -> Vec<Case> {
    let size = size.max(8);
    let c = size / 2;
    let Some(whole) = VoxelBox::from_shape((size, size, size)) else {
        unreachable!()
    };
    let r = size / 4;
    let local = VoxelBox::around((c, c, c), (r, r, r), &whole).unwrap_or(whole);
    vec![
        Case {
            name: "ball",
            volume: ball(size),
            seed: (c, c, c),
            tolerance: 0.0,
            bounds: whole,
        },
        Case {
            name: "noisy ball",
            volume: noisy_ball(size, 30, 0x7ea),
            seed: (c, c, c),
            tolerance: 40.0,
            bounds: whole,
        },
        Case {
            name: "noisy ball, local",
            volume: noisy_ball(size, 30, 0xbe44),
            seed: (c, c, c),
            tolerance: 40.0,
            bounds: local,
        },
    ]
}

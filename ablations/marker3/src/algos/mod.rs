//! 三种 "已访问" 标记集合上的区域生长.

mod profile;

use std::mem;
use utils::phantom::Case;
use vox_berry::data::{BitMarker, ByteMarker, HashMarker, VoxelMarker};
use vox_berry::fill::grow_region_with;

pub use profile::Profile;

/// 标记集合的近似内存占用 (字节).
trait MarkerFootprint: VoxelMarker {
    fn footprint(case: &Case, voxels: usize) -> usize;
}

impl MarkerFootprint for BitMarker {
    fn footprint(case: &Case, _: usize) -> usize {
        BitMarker::new(case.bounds).byte_len()
    }
}

impl MarkerFootprint for ByteMarker {
    fn footprint(case: &Case, _: usize) -> usize {
        case.bounds.len() * mem::size_of::<bool>()
    }
}

impl MarkerFootprint for HashMarker {
    fn footprint(_: &Case, voxels: usize) -> usize {
        // 不计哈希表的控制字节与装载因子.
        voxels * mem::size_of::<(u16, u16, u16)>()
    }
}

/// 在每个用例上以 `M` 为标记集合重复生长 `rounds` 次.
fn run<M: MarkerFootprint>(name: &str, cases: &[Case], rounds: usize) -> Profile {
    let mut profile = Profile::new();
    for case in cases {
        log::info!("{name}: case `{}`...", case.name);
        for _ in 0..rounds {
            profile.target_start();
            let region = grow_region_with::<M, u16>(
                case.volume.view(),
                case.seed,
                case.tolerance,
                &case.bounds,
            );
            let Some(region) = region.filter(|r| r.volume() > 0) else {
                profile.count_trivial();
                continue;
            };
            let report = region.report();
            profile.target_elapsed(report.voxels, report.max_stack);
            profile.count_marker_bytes(M::footprint(case, report.voxels));
        }
    }
    profile.finish()
}

pub fn bit(cases: &[Case], rounds: usize) -> Profile {
    run::<BitMarker>("Bit", cases, rounds)
}

pub fn byte(cases: &[Case], rounds: usize) -> Profile {
    run::<ByteMarker>("Byte", cases, rounds)
}

pub fn hash(cases: &[Case], rounds: usize) -> Profile {
    run::<HashMarker>("Hash", cases, rounds)
}

//! 程序运行函数.

use crate::result::AblationResult;
use std::thread;
use utils::{config, phantom};

/// 实际运行.
pub fn run() -> AblationResult {
    let (size, rounds) = (config::phantom_size(), config::rounds());
    log::info!("Building phantoms ({size}^3)...");
    let cases = phantom::cases(size);
    let cases = cases.as_slice();

    println!(
        "Running ablation studies ({} cases x {rounds} rounds, {} cpus)...",
        cases.len(),
        utils::cpus()
    );
    // 每个线程各自独立地调用区域生长, 不共享任何可变状态.
    thread::scope(|s| {
        use super::algos::*;

        let handles = [bit, byte, hash].map(|t| s.spawn(move || t(cases, rounds)));

        AblationResult::from_iter(
            ["bit", "byte", "hash"].into_iter().zip(
                handles
                    .into_iter()
                    .map(|th| th.join().expect("Thread joining error")),
            ),
        )
    })
}

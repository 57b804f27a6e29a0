//! 从环境变量读取实验配置.

use log::LevelFilter;
use std::env;
use std::str::FromStr;

/// 体模边长的默认值.
pub const DEFAULT_SIZE: usize = 96;

/// 每个用例重复次数的默认值.
pub const DEFAULT_ROUNDS: usize = 5;

/// 读取环境变量 `key` 并解析. 未设置或无法解析时返回 `default`.
fn var_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(v) => v.trim().parse().unwrap_or_else(|_| {
            eprintln!("Cannot parse `${key}` = {v:?}, fallback to default");
            default
        }),
        Err(_) => default,
    }
}

/// 体模边长.
///
/// 1. 若环境变量 `$VOX_ABLATION_SIZE` 是合法的正整数, 则返回其值;
/// 2. 否则, 返回 [`DEFAULT_SIZE`].
pub fn phantom_size() -> usize {
    match var_or("VOX_ABLATION_SIZE", DEFAULT_SIZE) {
        0 => DEFAULT_SIZE,
        n => n,
    }
}

/// 每个用例的重复次数.
///
/// 1. 若环境变量 `$VOX_ABLATION_ROUNDS` 是合法的正整数, 则返回其值;
/// 2. 否则, 返回 [`DEFAULT_ROUNDS`].
pub fn rounds() -> usize {
    match var_or("VOX_ABLATION_ROUNDS", DEFAULT_ROUNDS) {
        0 => DEFAULT_ROUNDS,
        n => n,
    }
}

/// 日志等级, 取自 `$VOX_LOG`, 默认为 `info`.
pub fn log_level() -> LevelFilter {
    var_or("VOX_LOG", LevelFilter::Info)
}

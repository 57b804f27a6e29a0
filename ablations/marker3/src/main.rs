//! 比较三种 "已访问" 标记集合在区域生长中的时间与空间开销.

mod algos;
mod result;
mod runner;

use simple_logger::SimpleLogger;

fn main() {
    SimpleLogger::new()
        .with_level(utils::config::log_level())
        .init()
        .expect("Logger initialization error");

    let result = runner::run();
    result.analyze().expect("Writing to stdout error");
    assert!(result.is_consistent(), "Markers disagree on grown regions");
}

#![warn(missing_docs)] // <= 合适时移除它.
// #![warn(clippy::missing_docs_in_private_items)]  // <= too strict.

//! 核心库. 为影像标注工具提供体素二值图 / 标签图的基础处理算法.
//!
//! 该 crate 目前仅提供 `safe` 接口. 所有算法都是单线程、确定性的纯函数:
//! 输出缓冲区由算法自行分配, 临时状态 (并查集, 访问标记, 栈) 不会跨调用保留.
//! 需要并行时, 由调用者对相互独立的网格 / 标签 / 切片对并行调用.
//!
//! # 注意
//!
//! 1. 所有网格都是行优先的 `ndarray` 数组. 三维索引为 `(z, h, w)`, 二维索引为 `(h, w)`.
//! 2. 在非期望情况下 (例如已校验过的形状上的索引运算出错), 程序会直接 panic,
//!   而不会导致内存错误. As what Rust promises. 可预期的配置错误通过 [`error::VoxError`] 返回.
//!
//! # 开发计划
//!
//! ### 连通域标记 ✅
//!
//! 二维 4/8 邻域, 三维 6/26 邻域. 单趟光栅扫描 + 并查集, 可选逐标签统计信息.
//!
//! 实现位于 `vox-berry/src/label`.
//!
//! ### 扫描线泛洪填充 ✅
//!
//! 1. 二维网格填充 / 擦除. ✅
//! 2. 三维谓词填充, 以及基于阈值的模糊区域生长. ✅
//! 3. 三种 "已访问" 标记实现的性能对比. ✅
//!
//! 实现位于 `vox-berry/src/fill` 和 `vox-berry/src/data/marker.rs`.
//! 性能对比位于 `ablations/marker3`.
//!
//! ### 二值形态学 ✅
//!
//! 任意结构元的腐蚀与膨胀, 以及开 / 闭运算.
//!
//! 实现位于 `vox-berry/src/morph`.
//!
//! ### 有符号欧氏距离变换 ✅
//!
//! 两趟一维下包络变换, 结果精确.
//!
//! 实现位于 `vox-berry/src/distance`.
//!
//! ### 层间插值 ✅
//!
//! 单目标 (质心对齐) 与多目标两种模式.
//!
//! 实现位于 `vox-berry/src/interp`.
//!
//! ### 多切片并行 ✅
//!
//! 打开 `rayon` feature 后, 可以对相互独立的切片并行做标记 / 距离变换.
//!
//! 实现位于 `vox-berry/src/batch.rs`.
//!
//! ### 三维距离变换 ⌛️
//!
//! 目前只有二维版本, 层间插值只需要二维.

/// 二维索引, 同时也可一定程度上用作非负整数向量.
pub type Idx2d = (usize, usize);

/// 三维索引, 同时也可一定程度上用作非负整数向量.
pub type Idx3d = (usize, usize, usize);

/// 压缩存储优化时会用到. 该结构不对外公开.
type Idx3dU16 = (u16, u16, u16);

pub mod consts;

/// 体素网格基础数据结构.
pub mod data;

pub mod distance;
pub mod error;
pub mod fill;
pub mod interp;
pub mod label;
pub mod morph;
pub mod prelude;

pub use error::{VoxError, VoxResult};

/// 测试时输出全部日志. 所有测试共用同一个全局 logger, 重复初始化的错误直接忽略.
#[cfg(test)]
pub(crate) fn init_test_logger() {
    let _ = simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Trace)
        .init();
}

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        pub mod batch;
    }
}

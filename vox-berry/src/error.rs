//! 运行时错误.

use crate::Idx2d;
use thiserror::Error;

/// 体素处理的运行时错误.
///
/// 除 [`VoxError::LabelCapacityExceeded`] 外, 所有错误都在写入任何输出之前检出,
/// 因此调用者不会拿到被部分修改的数据.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VoxError {
    /// 临时标签数量超出输出标签类型的表示范围. 参数为该类型能表示的最大标签.
    #[error("label capacity exceeded: at most {max} tentative labels are representable")]
    LabelCapacityExceeded {
        /// 输出标签类型的最大值.
        max: u64,
    },

    /// 二维泛洪填充的种子点不在网格内.
    #[error("seed {seed:?} is out of a grid shaped {shape:?}")]
    SeedOutOfBounds {
        /// 种子点 (高, 宽).
        seed: Idx2d,
        /// 网格形状 (高, 宽).
        shape: Idx2d,
    },

    /// 结构元非法 (例如中心不是前景).
    #[error("invalid structuring element: {0}")]
    InvalidStructuringElement(&'static str),

    /// 形态学迭代次数为 0.
    #[error("morphology needs at least one iteration")]
    ZeroIterations,
}

/// 体素处理运行时错误.
pub type VoxResult<T> = Result<T, VoxError>;

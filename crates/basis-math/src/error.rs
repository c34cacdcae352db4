//! 数学层错误类型定义

use thiserror::Error;

/// 数学层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    /// 矩阵分解失败（例如 SVD 未产生 U / Vᵀ 因子）
    #[error("Matrix decomposition failed: {0}")]
    Decomposition(&'static str),
}

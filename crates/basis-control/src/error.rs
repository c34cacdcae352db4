//! 控制层错误类型定义

use basis_math::MathError;
use thiserror::Error;

/// 控制层结果类型
pub type Result<T> = std::result::Result<T, ControlError>;

/// 控制层错误类型
///
/// 接线阶段（构造）发现的错误对该控制器是致命的；运行周期内出现的错误沿递归
/// 调用链原样向上传播，外部驱动应当重建控制器实例。
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControlError {
    /// 两个量的维度不一致
    #[error("{context}: {left} and {right} dimension mismatch: {left_dim} is not equal to {right_dim}")]
    DimensionMismatch {
        context: String,
        left: &'static str,
        left_dim: usize,
        right: &'static str,
        right_dim: usize,
    },

    /// 掩码索引越界
    #[error("Index out of range: index {index} >= dimension {dim}")]
    IndexOutOfRange { index: usize, dim: usize },

    /// 无效参数（如空参考点列表、权重数量不匹配）
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// 数学层错误
    #[error("Math error: {0}")]
    Math(#[from] MathError),
}

impl ControlError {
    /// 构造维度不一致错误
    pub fn dimension_mismatch(
        context: impl Into<String>,
        left: &'static str,
        left_dim: usize,
        right: &'static str,
        right_dim: usize,
    ) -> Self {
        ControlError::DimensionMismatch {
            context: context.into(),
            left,
            left_dim,
            right,
            right_dim,
        }
    }
}

/// 检查两个维度是否一致
pub(crate) fn ensure_dim(
    context: &str,
    left: &'static str,
    left_dim: usize,
    right: &'static str,
    right_dim: usize,
) -> Result<()> {
    if left_dim != right_dim {
        return Err(ControlError::dimension_mismatch(context, left, left_dim, right, right_dim));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_error_display() {
        let err = ControlError::dimension_mismatch("reach", "Reference", 3, "Potential", 4);
        assert_eq!(
            format!("{}", err),
            "reach: Reference and Potential dimension mismatch: 3 is not equal to 4"
        );

        let err = ControlError::IndexOutOfRange { index: 7, dim: 6 };
        assert!(format!("{}", err).contains("index 7 >= dimension 6"));

        let err = ControlError::InvalidArgument("empty reference list".to_string());
        assert!(format!("{}", err).contains("empty reference list"));
    }

    #[test]
    fn test_from_math_error() {
        let err: ControlError = MathError::Decomposition("svd").into();
        match err {
            ControlError::Math(MathError::Decomposition(what)) => assert_eq!(what, "svd"),
            _ => panic!("Expected Math variant"),
        }
    }

    #[test]
    fn test_ensure_dim() {
        assert!(ensure_dim("ctx", "a", 3, "b", 3).is_ok());
        assert!(matches!(
            ensure_dim("ctx", "a", 3, "b", 2),
            Err(ControlError::DimensionMismatch {
                left_dim: 3,
                right_dim: 2,
                ..
            })
        ));
    }
}

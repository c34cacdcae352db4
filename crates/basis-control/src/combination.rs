//! 合并策略
//!
//! 把多个下级控制器的资源空间步长合并成一个步长。所有输入与输出维度相同。

use crate::error::{ControlError, Result, ensure_dim};
use basis_math::{Float, FloatVector};

/// 合并策略
///
/// # 示例
///
/// ```rust
/// use basis_control::combination::CombinationStrategy;
/// use basis_math::FloatVector;
///
/// let steps = vec![
///     FloatVector::from_vec(vec![1.0, 0.0]),
///     FloatVector::from_vec(vec![0.0, 2.0]),
/// ];
/// let mut out = FloatVector::zeros(2);
///
/// CombinationStrategy::Adding.exec(&mut out, &steps).unwrap();
/// assert_eq!(out, FloatVector::from_vec(vec![1.0, 2.0]));
///
/// CombinationStrategy::MaxNorm.exec(&mut out, &steps).unwrap();
/// assert_eq!(out, FloatVector::from_vec(vec![0.0, 2.0]));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CombinationStrategy {
    /// `out = Σ steps_i`
    #[default]
    Adding,
    /// `out = Σ w_i steps_i`
    WeightedAdding(Vec<Float>),
    /// `out` 为模长最大的步长（模长相同取第一个）
    MaxNorm,
}

impl CombinationStrategy {
    /// 合并步长，结果写入 `out`
    ///
    /// `steps` 为空时 `out` 置零。
    ///
    /// # 错误
    ///
    /// - 任一步长维度与 `out` 不同：`DimensionMismatch`
    /// - `WeightedAdding` 的权重数量与步长数量不同：`InvalidArgument`
    pub fn exec(&self, out: &mut FloatVector, steps: &[FloatVector]) -> Result<()> {
        for step in steps {
            ensure_dim(
                "CombinationStrategy",
                "Step",
                step.len(),
                "Output",
                out.len(),
            )?;
        }

        out.fill(0.0);
        match self {
            CombinationStrategy::Adding => {
                for step in steps {
                    *out += step;
                }
            }
            CombinationStrategy::WeightedAdding(weights) => {
                if weights.len() != steps.len() {
                    return Err(ControlError::InvalidArgument(format!(
                        "WeightedAdding: {} weights for {} steps",
                        weights.len(),
                        steps.len()
                    )));
                }
                for (step, &weight) in steps.iter().zip(weights) {
                    out.axpy(weight, step, 1.0);
                }
            }
            CombinationStrategy::MaxNorm => {
                let mut max_norm = Float::NEG_INFINITY;
                for step in steps {
                    let norm = step.norm();
                    if norm > max_norm {
                        max_norm = norm;
                        out.copy_from(step);
                    }
                }
            }
        }
        Ok(())
    }
}

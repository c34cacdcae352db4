//! 执行器变换模块
//!
//! 执行器变换（EffectorTransform）给出任务雅可比矩阵的（广义）逆，
//! 把任务空间的梯度步映射为资源空间的步长。
//!
//! - `GenericEffectorTransform` - SVD 伪逆
//! - `DampedGenericEffectorTransform` - 阻尼伪逆，奇异位形附近增益有界
//! - `DampedWeightedGenericEffectorTransform` - 资源加权的阻尼伪逆
//!
//! 两个阻尼变体都支持可选的资源步长上限（按比例缩放）。

use crate::error::{ControlError, Result, ensure_dim};
use basis_math::{
    DEFAULT_DAMPING, Float, FloatMatrix, FloatVector, clamp_norm, damped_pseudo_inverse,
    pseudo_inverse,
};

/// 执行器变换通用接口
pub trait EffectorTransform: Send {
    /// 根据资源值和任务雅可比矩阵重新计算逆雅可比矩阵
    fn update(&mut self, resource_value: &FloatVector, task_jacobian: &FloatMatrix) -> Result<()>;

    /// 逆任务雅可比矩阵（`resource_dim x task_dim`）
    fn inverse_task_jacobian(&self) -> &FloatMatrix;

    /// 把任务空间步长映射到资源空间
    fn exec(&self, task_step: &FloatVector) -> FloatVector {
        self.inverse_task_jacobian() * task_step
    }

    /// 资源空间维度
    fn resource_dim(&self) -> usize;

    /// 任务空间维度
    fn task_dim(&self) -> usize;
}

impl EffectorTransform for Box<dyn EffectorTransform> {
    fn update(&mut self, resource_value: &FloatVector, task_jacobian: &FloatMatrix) -> Result<()> {
        self.as_mut().update(resource_value, task_jacobian)
    }

    fn inverse_task_jacobian(&self) -> &FloatMatrix {
        self.as_ref().inverse_task_jacobian()
    }

    fn exec(&self, task_step: &FloatVector) -> FloatVector {
        self.as_ref().exec(task_step)
    }

    fn resource_dim(&self) -> usize {
        self.as_ref().resource_dim()
    }

    fn task_dim(&self) -> usize {
        self.as_ref().task_dim()
    }
}

fn check_jacobian(
    context: &str,
    task_jacobian: &FloatMatrix,
    task_dim: usize,
    resource_dim: usize,
) -> Result<()> {
    ensure_dim(
        context,
        "Jacobian rows",
        task_jacobian.nrows(),
        "Effector task",
        task_dim,
    )?;
    ensure_dim(
        context,
        "Jacobian columns",
        task_jacobian.ncols(),
        "Effector resource",
        resource_dim,
    )
}

/// 伪逆执行器变换
#[derive(Debug, Clone)]
pub struct GenericEffectorTransform {
    inverse: FloatMatrix,
}

impl GenericEffectorTransform {
    pub fn new(task_dim: usize, resource_dim: usize) -> Self {
        GenericEffectorTransform {
            inverse: FloatMatrix::zeros(resource_dim, task_dim),
        }
    }
}

impl EffectorTransform for GenericEffectorTransform {
    fn update(&mut self, _resource_value: &FloatVector, task_jacobian: &FloatMatrix) -> Result<()> {
        check_jacobian(
            "GenericEffectorTransform",
            task_jacobian,
            self.task_dim(),
            self.resource_dim(),
        )?;
        self.inverse = pseudo_inverse(task_jacobian)?;
        Ok(())
    }

    fn inverse_task_jacobian(&self) -> &FloatMatrix {
        &self.inverse
    }

    fn resource_dim(&self) -> usize {
        self.inverse.nrows()
    }

    fn task_dim(&self) -> usize {
        self.inverse.ncols()
    }
}

/// 阻尼伪逆执行器变换
///
/// # 示例
///
/// ```rust
/// use basis_control::effector::{DampedGenericEffectorTransform, EffectorTransform};
/// use basis_math::{FloatMatrix, FloatVector};
///
/// let mut effector = DampedGenericEffectorTransform::new(2, 2).with_max_step_norm(0.1);
/// effector
///     .update(&FloatVector::zeros(2), &FloatMatrix::identity(2, 2))
///     .unwrap();
///
/// let step = effector.exec(&FloatVector::from_vec(vec![3.0, 4.0]));
/// assert!((step.norm() - 0.1).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct DampedGenericEffectorTransform {
    inverse: FloatMatrix,
    damping: Float,
    max_step_norm: Option<Float>,
}

impl DampedGenericEffectorTransform {
    /// 使用默认阻尼系数（`DEFAULT_DAMPING`）创建
    pub fn new(task_dim: usize, resource_dim: usize) -> Self {
        DampedGenericEffectorTransform {
            inverse: FloatMatrix::zeros(resource_dim, task_dim),
            damping: DEFAULT_DAMPING,
            max_step_norm: None,
        }
    }

    /// 设置阻尼系数
    pub fn with_damping(mut self, damping: Float) -> Self {
        self.damping = damping;
        self
    }

    /// 设置资源步长上限
    pub fn with_max_step_norm(mut self, max_step_norm: Float) -> Self {
        self.max_step_norm = Some(max_step_norm);
        self
    }

    pub fn damping(&self) -> Float {
        self.damping
    }
}

impl EffectorTransform for DampedGenericEffectorTransform {
    fn update(&mut self, _resource_value: &FloatVector, task_jacobian: &FloatMatrix) -> Result<()> {
        check_jacobian(
            "DampedGenericEffectorTransform",
            task_jacobian,
            self.task_dim(),
            self.resource_dim(),
        )?;
        self.inverse = damped_pseudo_inverse(task_jacobian, self.damping)?;
        Ok(())
    }

    fn inverse_task_jacobian(&self) -> &FloatMatrix {
        &self.inverse
    }

    fn exec(&self, task_step: &FloatVector) -> FloatVector {
        let mut step = &self.inverse * task_step;
        if let Some(max) = self.max_step_norm {
            clamp_norm(&mut step, max);
        }
        step
    }

    fn resource_dim(&self) -> usize {
        self.inverse.nrows()
    }

    fn task_dim(&self) -> usize {
        self.inverse.ncols()
    }
}

/// 资源加权阻尼伪逆执行器变换
///
/// ```text
/// J# = W⁻¹ Jᵀ (J W⁻¹ Jᵀ + λ² I)⁻¹,  W = diag(weights)
/// ```
///
/// 权重越大的资源分量移动越少。实现上令 `S = diag(1/√w)`，则 `J# = S · damped_pinv(J S)`。
#[derive(Debug, Clone)]
pub struct DampedWeightedGenericEffectorTransform {
    inverse: FloatMatrix,
    damping: Float,
    scaling: FloatVector,
    max_step_norm: Option<Float>,
}

impl DampedWeightedGenericEffectorTransform {
    /// 创建加权执行器变换，资源维度取自权重数量
    ///
    /// # 错误
    ///
    /// 任一权重不是有限正数时返回 `InvalidArgument`
    pub fn new(task_dim: usize, weights: &[Float]) -> Result<Self> {
        if let Some(w) = weights.iter().find(|w| !(w.is_finite() && **w > 0.0)) {
            return Err(ControlError::InvalidArgument(format!(
                "resource weights must be positive, got: {}",
                w
            )));
        }

        let scaling =
            FloatVector::from_iterator(weights.len(), weights.iter().map(|w| 1.0 / w.sqrt()));
        Ok(DampedWeightedGenericEffectorTransform {
            inverse: FloatMatrix::zeros(weights.len(), task_dim),
            damping: DEFAULT_DAMPING,
            scaling,
            max_step_norm: None,
        })
    }

    pub fn with_damping(mut self, damping: Float) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_max_step_norm(mut self, max_step_norm: Float) -> Self {
        self.max_step_norm = Some(max_step_norm);
        self
    }
}

impl EffectorTransform for DampedWeightedGenericEffectorTransform {
    fn update(&mut self, _resource_value: &FloatVector, task_jacobian: &FloatMatrix) -> Result<()> {
        check_jacobian(
            "DampedWeightedGenericEffectorTransform",
            task_jacobian,
            self.task_dim(),
            self.resource_dim(),
        )?;

        let mut scaled = task_jacobian.clone();
        for (mut column, s) in scaled.column_iter_mut().zip(self.scaling.iter()) {
            column *= *s;
        }
        let mut inverse = damped_pseudo_inverse(&scaled, self.damping)?;
        for (mut row, s) in inverse.row_iter_mut().zip(self.scaling.iter()) {
            row *= *s;
        }
        self.inverse = inverse;
        Ok(())
    }

    fn inverse_task_jacobian(&self) -> &FloatMatrix {
        &self.inverse
    }

    fn exec(&self, task_step: &FloatVector) -> FloatVector {
        let mut step = &self.inverse * task_step;
        if let Some(max) = self.max_step_norm {
            clamp_norm(&mut step, max);
        }
        step
    }

    fn resource_dim(&self) -> usize {
        self.inverse.nrows()
    }

    fn task_dim(&self) -> usize {
        self.inverse.ncols()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn jacobian() -> FloatMatrix {
        FloatMatrix::from_row_slice(2, 3, &[1.0, 0.0, 1.0, 0.0, 2.0, 1.0])
    }

    #[test]
    fn test_generic_is_right_inverse() {
        let mut effector = GenericEffectorTransform::new(2, 3);
        let j = jacobian();
        effector.update(&FloatVector::zeros(3), &j).unwrap();

        let product = &j * effector.inverse_task_jacobian();
        assert_relative_eq!(product, FloatMatrix::identity(2, 2), epsilon = 1e-10);
    }

    #[test]
    fn test_jacobian_shape_checked() {
        let mut effector = DampedGenericEffectorTransform::new(2, 3);
        let result = effector.update(&FloatVector::zeros(3), &FloatMatrix::zeros(3, 3));
        assert!(matches!(result, Err(ControlError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_unit_weights_match_damped() {
        let j = jacobian();
        let mut damped = DampedGenericEffectorTransform::new(2, 3).with_damping(0.01);
        let mut weighted = DampedWeightedGenericEffectorTransform::new(2, &[1.0, 1.0, 1.0])
            .unwrap()
            .with_damping(0.01);

        damped.update(&FloatVector::zeros(3), &j).unwrap();
        weighted.update(&FloatVector::zeros(3), &j).unwrap();

        assert_relative_eq!(
            damped.inverse_task_jacobian().clone(),
            weighted.inverse_task_jacobian().clone(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_heavy_weight_moves_less() {
        // 任务只关心 x0 + x1，第二个分量权重很大
        let j = FloatMatrix::from_row_slice(1, 2, &[1.0, 1.0]);
        let mut effector = DampedWeightedGenericEffectorTransform::new(1, &[1.0, 100.0])
            .unwrap()
            .with_damping(0.0);
        effector.update(&FloatVector::zeros(2), &j).unwrap();

        let step = effector.exec(&FloatVector::from_element(1, 1.0));
        assert!(step[0].abs() > 50.0 * step[1].abs());
        // 仍然完成任务步长
        assert_relative_eq!(step[0] + step[1], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_invalid_weights() {
        assert!(DampedWeightedGenericEffectorTransform::new(1, &[1.0, 0.0]).is_err());
        assert!(DampedWeightedGenericEffectorTransform::new(1, &[-1.0]).is_err());
    }
}

//! 平方势

use super::{DistanceTracker, Potential, select_nearest};
use crate::error::Result;
use basis_math::{Float, FloatVector, clamp_norm};

/// 平方势：`step = 2 (r - x)`，欧氏距离
///
/// # 示例
///
/// ```rust
/// use basis_control::potential::{Potential, SquarePotential};
/// use basis_math::FloatVector;
///
/// let mut potential = SquarePotential::new(2);
/// let step = potential
///     .gradient(&[FloatVector::from_vec(vec![1.0, 0.0])], &FloatVector::zeros(2))
///     .unwrap();
/// assert_eq!(step, FloatVector::from_vec(vec![2.0, 0.0]));
/// assert!(!potential.converged());
/// ```
#[derive(Debug, Clone)]
pub struct SquarePotential {
    dim: usize,
    max_gradient_step_norm: Option<Float>,
    tracker: DistanceTracker,
}

impl SquarePotential {
    pub fn new(dim: usize) -> Self {
        SquarePotential {
            dim,
            max_gradient_step_norm: None,
            tracker: DistanceTracker::new(),
        }
    }

    /// 设置步长上限（按比例缩放）
    pub fn with_max_gradient_step_norm(mut self, max_norm: Float) -> Self {
        self.max_gradient_step_norm = Some(max_norm);
        self
    }

    /// 设置收敛距离阈值
    pub fn with_distance_threshold(mut self, threshold: Float) -> Self {
        self.tracker.set_threshold(threshold);
        self
    }

    pub fn distance_threshold(&self) -> Float {
        self.tracker.threshold()
    }
}

impl Potential for SquarePotential {
    fn dim(&self) -> usize {
        self.dim
    }

    fn distance(&self, a: &FloatVector, b: &FloatVector) -> Float {
        (a - b).norm()
    }

    fn gradient(&mut self, references: &[FloatVector], input: &FloatVector) -> Result<FloatVector> {
        let (index, distance) = select_nearest(&*self, references, input)?;
        self.tracker.record(distance);

        let mut step = (&references[index] - input) * 2.0;
        if let Some(max) = self.max_gradient_step_norm {
            clamp_norm(&mut step, max);
        }
        Ok(step)
    }

    fn converged(&self) -> bool {
        self.tracker.converged()
    }

    fn last_distance(&self) -> Option<Float> {
        self.tracker.last()
    }
}

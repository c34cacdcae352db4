//! 按轴系数的欧氏势

use super::{DistanceTracker, Potential, select_nearest};
use crate::error::{ControlError, Result};
use basis_math::{Float, FloatVector};

/// 按轴系数的欧氏势：`step_i = 2 c_i (r_i - x_i)`
///
/// 系数为 0 的轴不被驱动；距离仍然是完整的欧氏距离。
#[derive(Debug, Clone)]
pub struct AxisPotential {
    coefficients: FloatVector,
    tracker: DistanceTracker,
}

impl AxisPotential {
    /// 所有轴使用同一系数
    pub fn new(dim: usize, coefficient: Float) -> Self {
        AxisPotential {
            coefficients: FloatVector::from_element(dim, coefficient),
            tracker: DistanceTracker::new(),
        }
    }

    /// 每个轴单独指定系数，维度取自系数数量
    ///
    /// # 错误
    ///
    /// 系数列表为空时返回 `InvalidArgument`
    pub fn with_coefficients(coefficients: Vec<Float>) -> Result<Self> {
        if coefficients.is_empty() {
            return Err(ControlError::InvalidArgument(
                "AxisPotential needs at least one coefficient".to_string(),
            ));
        }
        Ok(AxisPotential {
            coefficients: FloatVector::from_vec(coefficients),
            tracker: DistanceTracker::new(),
        })
    }

    pub fn with_distance_threshold(mut self, threshold: Float) -> Self {
        self.tracker.set_threshold(threshold);
        self
    }

    pub fn coefficients(&self) -> &FloatVector {
        &self.coefficients
    }
}

impl Potential for AxisPotential {
    fn dim(&self) -> usize {
        self.coefficients.len()
    }

    fn distance(&self, a: &FloatVector, b: &FloatVector) -> Float {
        (a - b).norm()
    }

    fn gradient(&mut self, references: &[FloatVector], input: &FloatVector) -> Result<FloatVector> {
        let (index, distance) = select_nearest(&*self, references, input)?;
        self.tracker.record(distance);

        let diff = &references[index] - input;
        Ok(diff.component_mul(&self.coefficients) * 2.0)
    }

    fn converged(&self) -> bool {
        self.tracker.converged()
    }

    fn last_distance(&self) -> Option<Float> {
        self.tracker.last()
    }
}

//! 直线势
//!
//! 让任务空间点（通常是末端位置）落到一条直线上：直线经过参考点，方向固定。

use super::{DistanceTracker, Potential, select_nearest};
use crate::error::{ControlError, Result};
use basis_math::{Float, FloatVector};
use nalgebra::Vector3;

/// 直线势（3 维）
#[derive(Debug, Clone)]
pub struct LinePotential {
    direction: Vector3<Float>,
    tracker: DistanceTracker,
}

impl Default for LinePotential {
    /// 方向 `(0, 1, 0)`
    fn default() -> Self {
        LinePotential {
            direction: Vector3::y(),
            tracker: DistanceTracker::new(),
        }
    }
}

impl LinePotential {
    /// 以给定方向创建（方向会被归一化）
    ///
    /// # 错误
    ///
    /// 方向不是 3 维，或模长为零时返回 `InvalidArgument`
    pub fn new(direction: &FloatVector) -> Result<Self> {
        let mut potential = LinePotential::default();
        potential.set_direction(direction)?;
        Ok(potential)
    }

    /// 修改直线方向
    pub fn set_direction(&mut self, direction: &FloatVector) -> Result<()> {
        if direction.len() != 3 {
            return Err(ControlError::InvalidArgument(format!(
                "line direction must have 3 elements, got: {}",
                direction.len()
            )));
        }
        let direction = Vector3::new(direction[0], direction[1], direction[2]);
        self.direction = direction.try_normalize(Float::EPSILON).ok_or_else(|| {
            ControlError::InvalidArgument("line direction must be non-zero".to_string())
        })?;
        Ok(())
    }

    pub fn with_distance_threshold(mut self, threshold: Float) -> Self {
        self.tracker.set_threshold(threshold);
        self
    }

    /// 单位方向向量
    pub fn direction(&self) -> FloatVector {
        FloatVector::from_column_slice(self.direction.as_slice())
    }
}

fn to_vector3(v: &FloatVector) -> Vector3<Float> {
    Vector3::new(v[0], v[1], v[2])
}

impl Potential for LinePotential {
    fn dim(&self) -> usize {
        3
    }

    /// `a` 到经过 `b`、方向为 `direction` 的直线的垂直距离
    fn distance(&self, a: &FloatVector, b: &FloatVector) -> Float {
        let x0 = to_vector3(a);
        let x1 = to_vector3(b);
        let x2 = x1 + self.direction;
        (x0 - x1).cross(&(x0 - x2)).norm() / (x2 - x1).norm()
    }

    fn gradient(&mut self, references: &[FloatVector], input: &FloatVector) -> Result<FloatVector> {
        let (index, distance) = select_nearest(&*self, references, input)?;
        self.tracker.record(distance);

        let x = to_vector3(input);
        let r = to_vector3(&references[index]);
        let projection = r + self.direction * self.direction.dot(&(x - r));
        let step = (projection - x) * 2.0;
        Ok(FloatVector::from_column_slice(step.as_slice()))
    }

    fn converged(&self) -> bool {
        self.tracker.converged()
    }

    fn last_distance(&self) -> Option<Float> {
        self.tracker.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_perpendicular_distance() {
        let potential = LinePotential::default();
        // 直线为 y 轴，点 (3, 7, 4) 到它的距离为 5
        let d = potential.distance(
            &FloatVector::from_vec(vec![3.0, 7.0, 4.0]),
            &FloatVector::zeros(3),
        );
        assert_relative_eq!(d, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_step_is_perpendicular_to_line() {
        let direction = FloatVector::from_vec(vec![1.0, 1.0, 0.0]);
        let mut potential = LinePotential::new(&direction).unwrap();
        let input = FloatVector::from_vec(vec![2.0, 0.0, 1.0]);

        let step = potential
            .gradient(&[FloatVector::zeros(3)], &input)
            .unwrap();

        assert_relative_eq!(step.dot(&potential.direction()), 0.0, epsilon = 1e-12);
        // 走完半步（步长是 2 倍）正好落在直线上
        let landed = &input + &step * 0.5;
        assert_relative_eq!(
            potential.distance(&landed, &FloatVector::zeros(3)),
            0.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_zero_direction_rejected() {
        assert!(matches!(
            LinePotential::new(&FloatVector::zeros(3)),
            Err(ControlError::InvalidArgument(_))
        ));
        assert!(LinePotential::new(&FloatVector::zeros(2)).is_err());
    }
}

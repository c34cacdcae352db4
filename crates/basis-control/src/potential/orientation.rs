//! 姿态势
//!
//! 两种姿态表示：
//!
//! - [`QuaternionPotential`]: 任务向量为 `(w, x, y, z)` 四元数
//! - [`AxisAnglePotential`]: 任务向量为轴角 3 维向量
//!
//! 两者的步长都来自球面插值，而不是欧氏梯度。

use super::{DistanceTracker, Potential, select_nearest};
use crate::error::{ControlError, Result};
use basis_math::{
    Float, FloatVector, Quaternion, clamp_norm, from_axis_angle3, qslerp, quaternion_from_vector,
    quaternion_to_vector, to_axis_angle3,
};
use nalgebra::UnitQuaternion;

/// 相对旋转角，位于 `[0, π]`
fn relative_angle(q1: &Quaternion, q2: &Quaternion) -> Float {
    let q3 = q1.conjugate() * q2;
    2.0 * q3.imag().norm().atan2(q3.w.abs())
}

/// 四元数姿态势
///
/// `step = normalize(slerp(n(x), n(r), c)) - n(x)`，其中 `n` 为归一化。
#[derive(Debug, Clone)]
pub struct QuaternionPotential {
    coefficient: Float,
    tracker: DistanceTracker,
}

impl QuaternionPotential {
    /// # 参数
    ///
    /// - `coefficient`: 每步的插值比例（`0..=1`）
    pub fn new(coefficient: Float) -> Self {
        QuaternionPotential {
            coefficient,
            tracker: DistanceTracker::new(),
        }
    }

    pub fn with_distance_threshold(mut self, threshold: Float) -> Self {
        self.tracker.set_threshold(threshold);
        self
    }

    pub fn coefficient(&self) -> Float {
        self.coefficient
    }
}

fn try_normalize(q: Quaternion) -> Option<Quaternion> {
    let norm = q.norm();
    (norm > Float::EPSILON).then(|| q * (1.0 / norm))
}

fn normalized(v: &FloatVector) -> Result<Quaternion> {
    try_normalize(quaternion_from_vector(v))
        .ok_or_else(|| ControlError::InvalidArgument("zero-length quaternion".to_string()))
}

impl Potential for QuaternionPotential {
    fn dim(&self) -> usize {
        4
    }

    fn distance(&self, a: &FloatVector, b: &FloatVector) -> Float {
        match (normalized(a), normalized(b)) {
            (Ok(qa), Ok(qb)) => relative_angle(&qa, &qb),
            _ => Float::INFINITY,
        }
    }

    fn gradient(&mut self, references: &[FloatVector], input: &FloatVector) -> Result<FloatVector> {
        let (index, distance) = select_nearest(&*self, references, input)?;
        self.tracker.record(distance);

        let from = normalized(input)?;
        let to = normalized(&references[index])?;
        let target = try_normalize(qslerp(&from, &to, self.coefficient)).unwrap_or(to);
        Ok(quaternion_to_vector(&(target - from)))
    }

    fn converged(&self) -> bool {
        self.tracker.converged()
    }

    fn last_distance(&self) -> Option<Float> {
        self.tracker.last()
    }
}

/// 轴角姿态势
///
/// 步长为 `slerp(q_in, q_ref, c) · conj(q_in)` 的轴角表示，再按比例缩放到
/// 不超过 `max_gradient_step_norm`。
///
/// # 示例
///
/// ```rust
/// use basis_control::potential::{AxisAnglePotential, Potential};
/// use basis_math::FloatVector;
/// use std::f64::consts::FRAC_PI_2;
///
/// let mut potential = AxisAnglePotential::new(0.5, 0.1);
/// let reference = FloatVector::from_vec(vec![0.0, 0.0, FRAC_PI_2]);
///
/// let step = potential.gradient(&[reference], &FloatVector::zeros(3)).unwrap();
/// assert!((step.norm() - 0.1).abs() < 1e-12);
/// assert!((potential.last_distance().unwrap() - FRAC_PI_2).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct AxisAnglePotential {
    coefficient: Float,
    max_gradient_step_norm: Float,
    tracker: DistanceTracker,
}

impl AxisAnglePotential {
    /// # 参数
    ///
    /// - `coefficient`: 每步的插值比例（`0..=1`）
    /// - `max_gradient_step_norm`: 步长（旋转角）上限
    pub fn new(coefficient: Float, max_gradient_step_norm: Float) -> Self {
        AxisAnglePotential {
            coefficient,
            max_gradient_step_norm,
            tracker: DistanceTracker::new(),
        }
    }

    pub fn with_distance_threshold(mut self, threshold: Float) -> Self {
        self.tracker.set_threshold(threshold);
        self
    }

    pub fn max_gradient_step_norm(&self) -> Float {
        self.max_gradient_step_norm
    }
}

impl Potential for AxisAnglePotential {
    fn dim(&self) -> usize {
        3
    }

    fn distance(&self, a: &FloatVector, b: &FloatVector) -> Float {
        let q1 = from_axis_angle3(a);
        let q2 = from_axis_angle3(b);
        relative_angle(q1.quaternion(), q2.quaternion())
    }

    fn gradient(&mut self, references: &[FloatVector], input: &FloatVector) -> Result<FloatVector> {
        let (index, distance) = select_nearest(&*self, references, input)?;
        self.tracker.record(distance);

        let q_in = from_axis_angle3(input);
        let q_ref = from_axis_angle3(&references[index]);
        let interpolated = UnitQuaternion::new_normalize(qslerp(
            q_in.quaternion(),
            q_ref.quaternion(),
            self.coefficient,
        ));
        let relative = interpolated * q_in.inverse();

        let mut step = to_axis_angle3(&relative);
        clamp_norm(&mut step, self.max_gradient_step_norm);
        Ok(step)
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
    use std::f64::consts::{FRAC_PI_2, PI};

    fn axis_angle(x: Float, y: Float, z: Float) -> FloatVector {
        FloatVector::from_vec(vec![x, y, z])
    }

    #[test]
    fn test_axis_angle_distance_symmetric() {
        let potential = AxisAnglePotential::new(0.1, 1.0);
        let a = axis_angle(0.3, -0.2, 1.1);
        let b = axis_angle(-1.0, 0.5, 0.2);

        assert_relative_eq!(
            potential.distance(&a, &b),
            potential.distance(&b, &a),
            epsilon = 1e-12
        );
        assert_relative_eq!(potential.distance(&a, &a), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_axis_angle_distance_folded() {
        let potential = AxisAnglePotential::new(0.1, 1.0);
        // 绕 z 轴 +3π/4 与 -3π/4 的相对旋转为 π/2（而不是 3π/2）
        let a = axis_angle(0.0, 0.0, 0.75 * PI);
        let b = axis_angle(0.0, 0.0, -0.75 * PI);
        assert_relative_eq!(potential.distance(&a, &b), FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_axis_angle_step_rotates_toward_reference() {
        let mut potential = AxisAnglePotential::new(0.5, 10.0);
        let step = potential
            .gradient(&[axis_angle(0.0, 0.0, 1.0)], &FloatVector::zeros(3))
            .unwrap();
        // 未被限幅：半程插值
        assert_relative_eq!(step, axis_angle(0.0, 0.0, 0.5), epsilon = 1e-12);
    }

    #[test]
    fn test_axis_angle_converged() {
        let mut potential = AxisAnglePotential::new(0.5, 1.0).with_distance_threshold(0.01);
        let v = axis_angle(0.2, 0.1, 0.0);
        let step = potential.gradient(&[v.clone()], &v).unwrap();
        assert!(potential.converged());
        assert_relative_eq!(step.norm(), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_quaternion_step_is_slerp_difference() {
        let mut potential = QuaternionPotential::new(0.5);
        let identity = FloatVector::from_vec(vec![1.0, 0.0, 0.0, 0.0]);
        // 绕 x 轴旋转 π/2，且故意不归一化
        let half = FRAC_PI_2 / 2.0;
        let reference = FloatVector::from_vec(vec![2.0 * half.cos(), 2.0 * half.sin(), 0.0, 0.0]);

        let step = potential.gradient(&[reference], &identity).unwrap();
        let expected = FloatVector::from_vec(vec![
            (FRAC_PI_2 / 4.0).cos() - 1.0,
            (FRAC_PI_2 / 4.0).sin(),
            0.0,
            0.0,
        ]);
        assert_relative_eq!(step, expected, epsilon = 1e-12);
        assert_relative_eq!(
            potential.last_distance().unwrap(),
            FRAC_PI_2,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_quaternion_zero_input_rejected() {
        let mut potential = QuaternionPotential::new(0.5);
        let result = potential.gradient(
            &[FloatVector::from_vec(vec![1.0, 0.0, 0.0, 0.0])],
            &FloatVector::zeros(4),
        );
        assert!(matches!(result, Err(ControlError::InvalidArgument(_))));
    }
}

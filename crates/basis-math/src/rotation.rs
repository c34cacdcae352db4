//! 旋转表示转换
//!
//! 任务空间里的姿态有两种向量表示：
//!
//! - **四元数 4 维向量**：顺序为 `(w, x, y, z)`
//! - **轴角 3 维向量**：方向为旋转轴，模长为旋转角（弧度）
//!
//! 本模块负责它们与 `nalgebra` 四元数类型之间的转换。

use crate::{Float, FloatVector};
use nalgebra::{UnitQuaternion, Vector3};
use std::f64::consts::PI;

/// 四元数类型（不要求单位长度）
pub type Quaternion = nalgebra::Quaternion<Float>;

/// 把角度归一化到 `(-π, π]`
///
/// 区间端点 `±π` 都映射到 `π`。
///
/// # 示例
///
/// ```rust
/// use basis_math::normalize_angle;
/// use std::f64::consts::PI;
///
/// assert!((normalize_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-12);
/// assert!((normalize_angle(0.5) - 0.5).abs() < 1e-12);
/// assert_eq!(normalize_angle(-PI), PI);
/// ```
pub fn normalize_angle(angle: Float) -> Float {
    PI - (PI - angle).rem_euclid(2.0 * PI)
}

/// 从 `(w, x, y, z)` 4 维向量构造四元数
///
/// 调用者保证 `v.len() == 4`（在控制器接线时由维度检查保证）。
pub fn quaternion_from_vector(v: &FloatVector) -> Quaternion {
    debug_assert_eq!(v.len(), 4, "quaternion vector must have 4 elements");
    Quaternion::new(v[0], v[1], v[2], v[3])
}

/// 把四元数写成 `(w, x, y, z)` 4 维向量
pub fn quaternion_to_vector(q: &Quaternion) -> FloatVector {
    FloatVector::from_vec(vec![q.w, q.i, q.j, q.k])
}

/// 轴角 3 维向量 → 单位四元数
pub fn from_axis_angle3(v: &FloatVector) -> UnitQuaternion<Float> {
    debug_assert_eq!(v.len(), 3, "axis-angle vector must have 3 elements");
    UnitQuaternion::from_scaled_axis(Vector3::new(v[0], v[1], v[2]))
}

/// 单位四元数 → 轴角 3 维向量（旋转角位于 `[0, π]`）
pub fn to_axis_angle3(q: &UnitQuaternion<Float>) -> FloatVector {
    let scaled = q.scaled_axis();
    FloatVector::from_column_slice(scaled.as_slice())
}

/// 轴角 3 维向量 → `(angle, ax, ay, az)` 4 维向量
///
/// 零旋转没有确定的轴，此时返回 `(0, 1, 0, 0)`。
pub fn unpack_axis_angle3(v: &FloatVector) -> FloatVector {
    let angle = v.norm();
    if angle == 0.0 {
        return FloatVector::from_vec(vec![0.0, 1.0, 0.0, 0.0]);
    }
    FloatVector::from_vec(vec![angle, v[0] / angle, v[1] / angle, v[2] / angle])
}

/// `(angle, ax, ay, az)` 4 维向量 → 轴角 3 维向量
///
/// 轴不要求单位长度，会先归一化。
pub fn pack_axis_angle3(v: &FloatVector) -> FloatVector {
    let axis = Vector3::new(v[1], v[2], v[3]);
    let norm = axis.norm();
    if norm == 0.0 {
        return FloatVector::zeros(3);
    }
    let scaled = axis * (v[0] / norm);
    FloatVector::from_column_slice(scaled.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_normalize_angle_range() {
        for raw in [-10.0, -PI, -1.0, 0.0, 1.0, PI, 7.5, 100.0] {
            let n = normalize_angle(raw);
            assert!(n > -PI && n <= PI, "{} -> {}", raw, n);
            // 只相差 2π 的整数倍
            let k = (raw - n) / (2.0 * PI);
            assert_relative_eq!(k, k.round(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_normalize_angle_pi_boundary() {
        assert_eq!(normalize_angle(PI), PI);
        assert_eq!(normalize_angle(-PI), PI);
    }

    #[test]
    fn test_quaternion_vector_order() {
        let v = FloatVector::from_vec(vec![0.5, 0.1, 0.2, 0.3]);
        let q = quaternion_from_vector(&v);
        assert_eq!(q.w, 0.5);
        assert_eq!(q.i, 0.1);
        assert_eq!(quaternion_to_vector(&q), v);
    }

    #[test]
    fn test_axis_angle_quaternion_round_trip() {
        let v = FloatVector::from_vec(vec![0.0, 0.0, FRAC_PI_2]);
        let q = from_axis_angle3(&v);
        assert_relative_eq!(q.angle(), FRAC_PI_2, epsilon = 1e-12);
        assert_relative_eq!(to_axis_angle3(&q), v, epsilon = 1e-12);
    }

    #[test]
    fn test_unpack_pack_axis_angle() {
        let v = FloatVector::from_vec(vec![0.3, -0.4, 0.0]);
        let unpacked = unpack_axis_angle3(&v);
        assert_relative_eq!(unpacked[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(unpacked[1], 0.6, epsilon = 1e-12);
        assert_relative_eq!(pack_axis_angle3(&unpacked), v, epsilon = 1e-12);
    }

    #[test]
    fn test_unpack_zero_rotation() {
        let unpacked = unpack_axis_angle3(&FloatVector::zeros(3));
        assert_eq!(unpacked[0], 0.0);
        assert!(unpacked.iter().all(|v| v.is_finite()));
    }
}

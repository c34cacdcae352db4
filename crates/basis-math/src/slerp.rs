//! 球面线性插值（SLERP）
//!
//! # 算法
//!
//! ```text
//! θ = acos(a · b)
//! slerp(a, b, t) = sin((1-t)θ)/sin θ · a + sin(tθ)/sin θ · b
//! ```
//!
//! 当 θ 小于 [`SLERP_THRESHOLD`] 时退化为线性插值，避免除以接近零的 `sin θ`。
//! 输入向量应为单位向量。

use crate::rotation::Quaternion;
use crate::{Float, FloatVector};

/// 小于该夹角（弧度）时使用线性插值
pub const SLERP_THRESHOLD: Float = 0.001;

/// n 维球面线性插值
///
/// # 参数
///
/// - `start`: 起点（单位向量）
/// - `end`: 终点（单位向量，维度与 `start` 相同）
/// - `step`: 插值系数，`0.0` 返回 `start`，`1.0` 返回 `end`
///
/// 对于反向向量（θ ≈ π）大圆路径不唯一，此时同样退化为线性插值。
pub fn slerp(start: &FloatVector, end: &FloatVector, step: Float) -> FloatVector {
    let angle = start.dot(end).clamp(-1.0, 1.0).acos();
    let sin_angle = angle.sin();

    if angle < SLERP_THRESHOLD || sin_angle.abs() < SLERP_THRESHOLD {
        return start + (end - start) * step;
    }

    start * (((1.0 - step) * angle).sin() / sin_angle) + end * ((step * angle).sin() / sin_angle)
}

/// 四元数球面线性插值（最短路径）
///
/// `q` 与 `-q` 表示同一旋转，若两者点积为负则翻转目标，保证沿最短弧插值。
/// 结果不做归一化，调用者按需 `normalize()`。
pub fn qslerp(from: &Quaternion, to: &Quaternion, step: Float) -> Quaternion {
    let mut cos_angle = from.dot(to);
    let mut target = *to;
    if cos_angle < 0.0 {
        cos_angle = -cos_angle;
        target = -target;
    }

    let angle = cos_angle.min(1.0).acos();
    if angle < SLERP_THRESHOLD {
        return *from + (target - *from) * step;
    }

    let sin_angle = angle.sin();
    *from * (((1.0 - step) * angle).sin() / sin_angle) + target * ((step * angle).sin() / sin_angle)
}

//! 势函数模块
//!
//! 势函数（Potential）定义任务空间里的"距离"，并给出朝最近参考点前进的一步。
//!
//! - `SquarePotential` - 欧氏距离，步长 `2 (r - x)`
//! - `AxisPotential` - 每个轴独立系数的欧氏势
//! - `LinePotential` - 到直线的垂直距离（3 维）
//! - `QuaternionPotential` - 单位四元数姿态，球面插值步长
//! - `AxisAnglePotential` - 轴角姿态，相对旋转插值步长
//! - `CompositePotential` - 多个势函数按任务向量分块拼接
//!
//! # 收敛
//!
//! 每次 `gradient()` 记录所选参考点的距离，`converged()` 即
//! `distance < distance_threshold`（默认 [`DEFAULT_DISTANCE_THRESHOLD`]）。

pub mod axis;
pub mod composite;
pub mod line;
pub mod orientation;
pub mod square;

use crate::error::{ControlError, Result, ensure_dim};
use basis_math::{Float, FloatVector};

pub use axis::AxisPotential;
pub use composite::CompositePotential;
pub use line::LinePotential;
pub use orientation::{AxisAnglePotential, QuaternionPotential};
pub use square::SquarePotential;

/// 默认收敛距离阈值
pub const DEFAULT_DISTANCE_THRESHOLD: Float = 1e-3;

/// 势函数通用接口
pub trait Potential: Send {
    /// 任务空间维度
    fn dim(&self) -> usize;

    /// 两个任务空间点之间的距离（非负）
    fn distance(&self, a: &FloatVector, b: &FloatVector) -> Float;

    /// 计算朝最近参考点的步长，并刷新收敛状态
    ///
    /// # 错误
    ///
    /// - `references` 为空：`InvalidArgument`
    /// - 参考点或输入维度不等于 `dim()`：`DimensionMismatch`
    fn gradient(&mut self, references: &[FloatVector], input: &FloatVector) -> Result<FloatVector>;

    /// 最近一次 `gradient()` 之后是否已收敛
    fn converged(&self) -> bool;

    /// 最近一次 `gradient()` 所选参考点的距离（尚未调用时为 `None`）
    fn last_distance(&self) -> Option<Float>;
}

impl Potential for Box<dyn Potential> {
    fn dim(&self) -> usize {
        self.as_ref().dim()
    }

    fn distance(&self, a: &FloatVector, b: &FloatVector) -> Float {
        self.as_ref().distance(a, b)
    }

    fn gradient(&mut self, references: &[FloatVector], input: &FloatVector) -> Result<FloatVector> {
        self.as_mut().gradient(references, input)
    }

    fn converged(&self) -> bool {
        self.as_ref().converged()
    }

    fn last_distance(&self) -> Option<Float> {
        self.as_ref().last_distance()
    }
}

/// 选出距离 `input` 最近的参考点
///
/// 严格小于比较，距离相同时取索引最小者。
///
/// # 返回
///
/// `(索引, 距离)`
pub fn select_nearest<P: Potential + ?Sized>(
    potential: &P,
    references: &[FloatVector],
    input: &FloatVector,
) -> Result<(usize, Float)> {
    if references.is_empty() {
        return Err(ControlError::InvalidArgument(
            "potential gradient requires at least one reference".to_string(),
        ));
    }
    ensure_dim(
        "Potential",
        "Input",
        input.len(),
        "Potential",
        potential.dim(),
    )?;

    let mut nearest = (0, Float::INFINITY);
    for (i, reference) in references.iter().enumerate() {
        ensure_dim(
            "Potential",
            "Reference",
            reference.len(),
            "Potential",
            potential.dim(),
        )?;
        let d = potential.distance(input, reference);
        if d < nearest.1 {
            nearest = (i, d);
        }
    }
    Ok(nearest)
}

/// 距离记录与收敛判断
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct DistanceTracker {
    threshold: Float,
    last: Option<Float>,
}

impl DistanceTracker {
    pub(crate) fn new() -> Self {
        DistanceTracker {
            threshold: DEFAULT_DISTANCE_THRESHOLD,
            last: None,
        }
    }

    pub(crate) fn set_threshold(&mut self, threshold: Float) {
        self.threshold = threshold;
    }

    pub(crate) fn threshold(&self) -> Float {
        self.threshold
    }

    pub(crate) fn record(&mut self, distance: Float) {
        self.last = Some(distance);
    }

    pub(crate) fn last(&self) -> Option<Float> {
        self.last
    }

    pub(crate) fn converged(&self) -> bool {
        self.last.is_some_and(|d| d < self.threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_nearest_first_on_ties() {
        let potential = SquarePotential::new(1);
        let refs = vec![
            FloatVector::from_element(1, 2.0),
            FloatVector::from_element(1, -1.0),
            FloatVector::from_element(1, 1.0),
        ];

        let (index, distance) =
            select_nearest(&potential, &refs, &FloatVector::from_element(1, 0.0)).unwrap();
        assert_eq!(index, 1);
        assert_eq!(distance, 1.0);
    }

    #[test]
    fn test_select_nearest_empty() {
        let potential = SquarePotential::new(2);
        assert!(matches!(
            select_nearest(&potential, &[], &FloatVector::zeros(2)),
            Err(ControlError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_select_nearest_dimension_checks() {
        let potential = SquarePotential::new(2);
        let refs = vec![FloatVector::zeros(3)];
        assert!(matches!(
            select_nearest(&potential, &refs, &FloatVector::zeros(2)),
            Err(ControlError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            select_nearest(&potential, &[FloatVector::zeros(2)], &FloatVector::zeros(1)),
            Err(ControlError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_tracker_not_converged_before_first_record() {
        let mut tracker = DistanceTracker::new();
        assert!(!tracker.converged());

        tracker.record(1e-4);
        assert!(tracker.converged());
        tracker.record(DEFAULT_DISTANCE_THRESHOLD);
        assert!(!tracker.converged());
    }
}

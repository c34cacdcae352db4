//! 传感器变换模块
//!
//! 传感器变换（SensorTransform）把资源值映射到任务空间，并给出局部线性化
//! （任务雅可比矩阵，`task_dim x resource_dim`）。
//!
//! - `IdentitySensorTransform` / `LinearSensorTransform` - 线性映射
//! - `DifferenceSensorTransform` - 第一个子变换减去其余子变换
//! - `WeightedSumSensorTransform` - 子变换的加权和
//! - `ApplySensorTransform` - 逐元素运算（取反、数乘）
//! - `BlockWiseSensorTransform` - 分块求和 / 分块求差
//!
//! 所有组合变换都对结果和雅可比矩阵做同样的运算，保证雅可比矩阵始终是结果的
//! 有效线性化。

pub mod difference;
pub mod functional;
pub mod linear;
pub mod weighted_sum;

use crate::error::{ControlError, Result, ensure_dim};
use basis_math::{FloatMatrix, FloatVector};

pub use difference::DifferenceSensorTransform;
pub use functional::{
    ApplySensorTransform, BlockOperation, BlockWiseSensorTransform, ElementwiseOperation,
};
pub use linear::{IdentitySensorTransform, LinearSensorTransform};
pub use weighted_sum::WeightedSumSensorTransform;

/// 传感器变换通用接口
///
/// 外部实现（例如运动学链的正运动学）只需实现这五个方法。
pub trait SensorTransform: Send {
    /// 根据资源值重新计算结果与雅可比矩阵
    fn update(&mut self, resource_value: &FloatVector) -> Result<()>;

    /// 任务空间结果（`task_dim`）
    fn result(&self) -> &FloatVector;

    /// 任务雅可比矩阵（`task_dim x resource_dim`）
    fn task_jacobian(&self) -> &FloatMatrix;

    /// 资源空间维度
    fn resource_dim(&self) -> usize;

    /// 任务空间维度
    fn task_dim(&self) -> usize;
}

impl SensorTransform for Box<dyn SensorTransform> {
    fn update(&mut self, resource_value: &FloatVector) -> Result<()> {
        self.as_mut().update(resource_value)
    }

    fn result(&self) -> &FloatVector {
        self.as_ref().result()
    }

    fn task_jacobian(&self) -> &FloatMatrix {
        self.as_ref().task_jacobian()
    }

    fn resource_dim(&self) -> usize {
        self.as_ref().resource_dim()
    }

    fn task_dim(&self) -> usize {
        self.as_ref().task_dim()
    }
}

/// 检查组合变换的子变换：数量下限以及资源 / 任务维度一致
pub(crate) fn check_children(
    context: &str,
    transforms: &[Box<dyn SensorTransform>],
    min_count: usize,
) -> Result<(usize, usize)> {
    if transforms.len() < min_count {
        return Err(ControlError::InvalidArgument(format!(
            "{} needs at least {} transforms, got: {}",
            context,
            min_count,
            transforms.len()
        )));
    }

    let resource_dim = transforms[0].resource_dim();
    let task_dim = transforms[0].task_dim();
    for transform in &transforms[1..] {
        ensure_dim(
            context,
            "Transform resource",
            transform.resource_dim(),
            "First transform resource",
            resource_dim,
        )?;
        ensure_dim(
            context,
            "Transform task",
            transform.task_dim(),
            "First transform task",
            task_dim,
        )?;
    }
    Ok((resource_dim, task_dim))
}

/// 检查传入的资源值维度
pub(crate) fn check_input(
    context: &str,
    resource_value: &FloatVector,
    resource_dim: usize,
) -> Result<()> {
    ensure_dim(
        context,
        "Resource value",
        resource_value.len(),
        "Transform resource",
        resource_dim,
    )
}

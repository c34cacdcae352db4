//! 收敛判据
//!
//! 每个判据读取控制器最近一个周期的某个量，与固定阈值比较。
//! 控制器注册多个判据时，任一判据满足即视为收敛。

use crate::controller::SubordinateController;
use basis_math::Float;

/// 收敛判据
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConvergenceCriterion {
    /// 任务空间梯度步长的模小于阈值
    TaskSpaceDistanceThreshold(Float),
    /// 资源空间步长的模小于阈值
    ResourceStepNormThreshold(Float),
    /// 势函数报告的距离小于阈值（尚未计算过距离时不收敛）
    PotentialDistanceThreshold(Float),
    /// 势函数自身的收敛标志
    PotentialConverged,
}

impl ConvergenceCriterion {
    /// 判断控制器是否收敛
    pub fn check_convergence(&self, controller: &SubordinateController) -> bool {
        match *self {
            ConvergenceCriterion::TaskSpaceDistanceThreshold(threshold) => {
                controller.gradient_step().norm() < threshold
            }
            ConvergenceCriterion::ResourceStepNormThreshold(threshold) => {
                controller.resource_step().norm() < threshold
            }
            ConvergenceCriterion::PotentialDistanceThreshold(threshold) => controller
                .potential()
                .last_distance()
                .is_some_and(|d| d < threshold),
            ConvergenceCriterion::PotentialConverged => controller.potential().converged(),
        }
    }
}

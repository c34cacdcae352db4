//! 下级控制器
//!
//! 控制树的一个节点：一个任务（参考点 + 势函数 + 传感器/执行器变换），
//! 以及在其零空间内执行的若干下级控制器。
//!
//! # 单周期流程（`update()`）
//!
//! 1. 刷新参考点
//! 2. 刷新资源
//! 3. 传感器变换：资源值 → 当前任务位置
//! 4. 执行器变换：任务雅可比 → 逆任务雅可比
//! 5. 有参考点时：势函数梯度步 → 资源步；否则资源步置零，梯度步保留上一周期的值
//! 6. 递归更新下级控制器，收集其结果
//! 7. 合并下级结果
//! 8. 零空间投影：`combined -= J# (J combined)`
//! 9. `result = coefficient * resource_step + combined`

use crate::combination::CombinationStrategy;
use crate::convergence::ConvergenceCriterion;
use crate::effector::EffectorTransform;
use crate::error::{ControlError, Result, ensure_dim};
use crate::potential::Potential;
use crate::reference::Reference;
use crate::resource::Resource;
use crate::sensor::SensorTransform;
use basis_math::{Float, FloatVector};
use tracing::{debug, trace};

/// 下级控制器
///
/// 通过 [`ControllerBuilder`](super::ControllerBuilder) 构造。
pub struct SubordinateController {
    pub(super) name: String,
    pub(super) coefficient: Float,
    pub(super) reference: Box<dyn Reference>,
    pub(super) potential: Box<dyn Potential>,
    pub(super) sensor_transform: Box<dyn SensorTransform>,
    pub(super) effector_transform: Box<dyn EffectorTransform>,
    pub(super) combination_strategy: CombinationStrategy,
    pub(super) convergence_criteria: Vec<ConvergenceCriterion>,
    pub(super) subordinates: Vec<SubordinateController>,

    // 每周期重新计算的中间量
    pub(super) current_task_position: FloatVector,
    pub(super) gradient_step: FloatVector,
    pub(super) resource_step: FloatVector,
    pub(super) child_results: Vec<FloatVector>,
    pub(super) combined: FloatVector,
    pub(super) result: FloatVector,
    pub(super) has_reference: bool,
    pub(super) converged: bool,
}

impl SubordinateController {
    /// 检查接线时的维度一致性
    ///
    /// - `reference.dim() == potential.dim() == sensor.task_dim() == effector.task_dim()`
    /// - `sensor.resource_dim() == effector.resource_dim()`
    /// - 每个下级控制器的资源维度与本节点相同
    /// - `WeightedAdding` 的权重数量等于下级控制器数量
    pub fn check_dimensions(&self) -> Result<()> {
        let context = self.name.as_str();
        ensure_dim(
            context,
            "Reference",
            self.reference.dim(),
            "Potential",
            self.potential.dim(),
        )?;
        ensure_dim(
            context,
            "Potential",
            self.potential.dim(),
            "SensorTransform task",
            self.sensor_transform.task_dim(),
        )?;
        ensure_dim(
            context,
            "SensorTransform task",
            self.sensor_transform.task_dim(),
            "EffectorTransform task",
            self.effector_transform.task_dim(),
        )?;
        ensure_dim(
            context,
            "SensorTransform resource",
            self.sensor_transform.resource_dim(),
            "EffectorTransform resource",
            self.effector_transform.resource_dim(),
        )?;

        for child in &self.subordinates {
            ensure_dim(
                context,
                "Subordinate resource",
                child.resource_dim(),
                "SensorTransform resource",
                self.resource_dim(),
            )?;
        }

        if let CombinationStrategy::WeightedAdding(weights) = &self.combination_strategy {
            if weights.len() != self.subordinates.len() {
                return Err(ControlError::InvalidArgument(format!(
                    "{}: {} combination weights for {} subordinate controllers",
                    context,
                    weights.len(),
                    self.subordinates.len()
                )));
            }
        }

        Ok(())
    }

    /// 执行一个周期的计算
    ///
    /// `resource` 是控制树根持有的共享资源，沿递归向下传递。
    pub fn update(&mut self, resource: &mut dyn Resource) -> Result<()> {
        // 1. 参考点
        self.reference.update()?;

        // 2. 资源
        resource.update()?;
        let resource_value = resource.get();

        // 3. 传感器变换
        self.sensor_transform.update(&resource_value)?;
        self.current_task_position
            .copy_from(self.sensor_transform.result());

        // 4. 执行器变换
        self.effector_transform
            .update(&resource_value, self.sensor_transform.task_jacobian())?;

        // 5. 本节点任务的步长
        let references = self.reference.get();
        self.has_reference = !references.is_empty();
        if self.has_reference {
            self.gradient_step = self
                .potential
                .gradient(references, &self.current_task_position)?;
            self.resource_step = self.effector_transform.exec(&self.gradient_step);
        } else {
            self.resource_step.fill(0.0);
        }
        trace!(
            "{}: {} references, gradient step norm {:.6}, resource step norm {:.6}",
            self.name,
            references.len(),
            self.gradient_step.norm(),
            self.resource_step.norm()
        );

        // 6. 下级控制器
        self.child_results.clear();
        for child in self.subordinates.iter_mut() {
            child.update(resource)?;
            self.child_results.push(child.result.clone());
        }

        // 7. 合并
        self.combination_strategy
            .exec(&mut self.combined, &self.child_results)?;

        // 8. 零空间投影
        let task_change = self.sensor_transform.task_jacobian() * &self.combined;
        self.combined -= self.effector_transform.inverse_task_jacobian() * task_change;

        // 9. 结果
        self.result = &self.resource_step * self.coefficient + &self.combined;
        Ok(())
    }

    /// 任一收敛判据满足即收敛（没有判据时永不收敛）
    pub fn check_convergence(&self) -> bool {
        self.convergence_criteria
            .iter()
            .any(|criterion| criterion.check_convergence(self))
    }

    /// 没有参考点的周期不评估收敛，保持上一次的状态
    pub(super) fn refresh_convergence(&mut self) -> bool {
        if !self.has_reference {
            return self.converged;
        }
        let converged = self.check_convergence();
        if converged && !self.converged {
            debug!("{}: converged", self.name);
        }
        self.converged = converged;
        converged
    }

    /// 最近一次 `action()` 之后的收敛状态
    ///
    /// 尚未见过参考点时为 `false`
    pub fn finished(&self) -> bool {
        self.converged
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn coefficient(&self) -> Float {
        self.coefficient
    }

    /// 本周期输出的资源空间步长
    pub fn result(&self) -> &FloatVector {
        &self.result
    }

    /// 本周期的任务空间梯度步长
    pub fn gradient_step(&self) -> &FloatVector {
        &self.gradient_step
    }

    /// 本节点任务自身的资源空间步长（未乘系数）
    pub fn resource_step(&self) -> &FloatVector {
        &self.resource_step
    }

    pub fn current_task_position(&self) -> &FloatVector {
        &self.current_task_position
    }

    /// 投影后的下级合并步长
    pub fn combined_results(&self) -> &FloatVector {
        &self.combined
    }

    /// 各下级控制器本周期的结果（投影前）
    pub fn child_results(&self) -> &[FloatVector] {
        &self.child_results
    }

    pub fn resource_dim(&self) -> usize {
        self.sensor_transform.resource_dim()
    }

    pub fn task_dim(&self) -> usize {
        self.sensor_transform.task_dim()
    }

    pub fn reference(&self) -> &dyn Reference {
        self.reference.as_ref()
    }

    /// 可变参考点
    pub fn reference_mut(&mut self) -> &mut dyn Reference {
        self.reference.as_mut()
    }

    pub fn potential(&self) -> &dyn Potential {
        self.potential.as_ref()
    }

    pub fn sensor_transform(&self) -> &dyn SensorTransform {
        self.sensor_transform.as_ref()
    }

    pub fn effector_transform(&self) -> &dyn EffectorTransform {
        self.effector_transform.as_ref()
    }

    pub fn combination_strategy(&self) -> &CombinationStrategy {
        &self.combination_strategy
    }

    pub fn convergence_criteria(&self) -> &[ConvergenceCriterion] {
        &self.convergence_criteria
    }

    pub fn subordinates(&self) -> &[SubordinateController] {
        &self.subordinates
    }

    pub fn subordinates_mut(&mut self) -> &mut [SubordinateController] {
        &mut self.subordinates
    }
}

impl std::fmt::Debug for SubordinateController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubordinateController")
            .field("name", &self.name)
            .field("coefficient", &self.coefficient)
            .field("resource_dim", &self.resource_dim())
            .field("task_dim", &self.task_dim())
            .field("subordinates", &self.subordinates)
            .field("converged", &self.converged)
            .finish()
    }
}

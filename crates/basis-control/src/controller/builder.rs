//! 控制器构造器
//!
//! 提供链式 API 接线控制器。必需的协作对象（参考点、势函数、传感器变换、
//! 执行器变换）在 `new()` 中给出，其余都有默认值。

use super::{PrimitiveController, SubordinateController};
use crate::combination::CombinationStrategy;
use crate::convergence::ConvergenceCriterion;
use crate::effector::EffectorTransform;
use crate::error::Result;
use crate::potential::Potential;
use crate::reference::Reference;
use crate::resource::Resource;
use crate::sensor::SensorTransform;
use basis_math::{Float, FloatVector};
use tracing::debug;

/// 默认控制器名称
pub const DEFAULT_NAME: &str = "controller";

/// 默认优先级系数
pub const DEFAULT_COEFFICIENT: Float = 1.0;

/// 控制器构造器
///
/// # 示例
///
/// ```rust
/// use basis_control::prelude::*;
/// use basis_math::{FloatMatrix, FloatVector};
///
/// // 次级任务：保持第三个关节在 0.5
/// let posture = ControllerBuilder::new(
///     DummyReference::with_reference(FloatVector::from_element(1, 0.5)),
///     SquarePotential::new(1),
///     LinearSensorTransform::new(FloatMatrix::from_row_slice(1, 3, &[0.0, 0.0, 1.0])),
///     GenericEffectorTransform::new(1, 3),
/// )
/// .name("posture")
/// .build_subordinate()
/// .unwrap();
///
/// let controller = ControllerBuilder::new(
///     DummyReference::with_reference(FloatVector::from_vec(vec![1.0, 0.0, 0.0])),
///     SquarePotential::new(3),
///     IdentitySensorTransform::new(3),
///     DampedGenericEffectorTransform::new(3, 3),
/// )
/// .name("reach")
/// .coefficient(0.1)
/// .subordinate(posture)
/// .convergence_criterion(ConvergenceCriterion::ResourceStepNormThreshold(1e-4))
/// .build_primitive(DummyResource::new(3))
/// .unwrap();
///
/// assert_eq!(controller.root().subordinates().len(), 1);
/// ```
pub struct ControllerBuilder {
    name: String,
    coefficient: Float,
    reference: Box<dyn Reference>,
    potential: Box<dyn Potential>,
    sensor_transform: Box<dyn SensorTransform>,
    effector_transform: Box<dyn EffectorTransform>,
    combination_strategy: CombinationStrategy,
    convergence_criteria: Vec<ConvergenceCriterion>,
    subordinates: Vec<SubordinateController>,
}

impl ControllerBuilder {
    /// 创建构造器
    pub fn new(
        reference: impl Reference + 'static,
        potential: impl Potential + 'static,
        sensor_transform: impl SensorTransform + 'static,
        effector_transform: impl EffectorTransform + 'static,
    ) -> Self {
        Self::from_boxed(
            Box::new(reference),
            Box::new(potential),
            Box::new(sensor_transform),
            Box::new(effector_transform),
        )
    }

    /// 由已装箱的协作对象创建构造器
    pub fn from_boxed(
        reference: Box<dyn Reference>,
        potential: Box<dyn Potential>,
        sensor_transform: Box<dyn SensorTransform>,
        effector_transform: Box<dyn EffectorTransform>,
    ) -> Self {
        ControllerBuilder {
            name: DEFAULT_NAME.to_string(),
            coefficient: DEFAULT_COEFFICIENT,
            reference,
            potential,
            sensor_transform,
            effector_transform,
            combination_strategy: CombinationStrategy::default(),
            convergence_criteria: Vec::new(),
            subordinates: Vec::new(),
        }
    }

    /// 设置名称（用于日志和错误信息）
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// 设置优先级系数
    pub fn coefficient(mut self, coefficient: Float) -> Self {
        self.coefficient = coefficient;
        self
    }

    /// 设置下级结果的合并策略（默认 `Adding`）
    pub fn combination_strategy(mut self, strategy: CombinationStrategy) -> Self {
        self.combination_strategy = strategy;
        self
    }

    /// 追加一个收敛判据
    pub fn convergence_criterion(mut self, criterion: ConvergenceCriterion) -> Self {
        self.convergence_criteria.push(criterion);
        self
    }

    /// 追加多个收敛判据
    pub fn convergence_criteria(
        mut self,
        criteria: impl IntoIterator<Item = ConvergenceCriterion>,
    ) -> Self {
        self.convergence_criteria.extend(criteria);
        self
    }

    /// 追加一个下级控制器（按追加顺序求值与合并）
    pub fn subordinate(mut self, controller: SubordinateController) -> Self {
        self.subordinates.push(controller);
        self
    }

    /// 追加多个下级控制器
    pub fn subordinates(
        mut self,
        controllers: impl IntoIterator<Item = SubordinateController>,
    ) -> Self {
        self.subordinates.extend(controllers);
        self
    }

    /// 构造下级控制器
    ///
    /// # 错误
    ///
    /// 维度不一致时返回 `DimensionMismatch`；合并权重数量不对时返回 `InvalidArgument`
    pub fn build_subordinate(self) -> Result<SubordinateController> {
        let resource_dim = self.sensor_transform.resource_dim();
        let task_dim = self.sensor_transform.task_dim();

        let controller = SubordinateController {
            name: self.name,
            coefficient: self.coefficient,
            reference: self.reference,
            potential: self.potential,
            sensor_transform: self.sensor_transform,
            effector_transform: self.effector_transform,
            combination_strategy: self.combination_strategy,
            convergence_criteria: self.convergence_criteria,
            subordinates: self.subordinates,
            current_task_position: FloatVector::zeros(task_dim),
            gradient_step: FloatVector::zeros(task_dim),
            resource_step: FloatVector::zeros(resource_dim),
            child_results: Vec::new(),
            combined: FloatVector::zeros(resource_dim),
            result: FloatVector::zeros(resource_dim),
            has_reference: false,
            converged: false,
        };
        controller.check_dimensions()?;

        debug!(
            "{}: wired (task dim {}, resource dim {}, {} subordinates, {} criteria)",
            controller.name(),
            task_dim,
            resource_dim,
            controller.subordinates().len(),
            controller.convergence_criteria().len()
        );
        Ok(controller)
    }

    /// 构造根控制器
    ///
    /// # 错误
    ///
    /// 除 [`build_subordinate`](Self::build_subordinate) 的检查外，
    /// 资源维度与传感器变换资源维度不同时返回 `DimensionMismatch`
    pub fn build_primitive(self, resource: impl Resource + 'static) -> Result<PrimitiveController> {
        let root = self.build_subordinate()?;
        PrimitiveController::new(root, Box::new(resource))
    }
}

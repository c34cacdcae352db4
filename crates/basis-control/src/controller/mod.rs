//! 控制器模块
//!
//! # 结构
//!
//! ```text
//! PrimitiveController            (根，持有资源)
//!   └─ SubordinateController      (根任务)
//!        ├─ SubordinateController (次级任务，在根任务零空间内执行)
//!        │    └─ ...
//!        └─ SubordinateController
//! ```
//!
//! 每个节点把下级控制器的合并步长投影到自身任务的零空间，
//! 因此低优先级任务不会在一阶意义上干扰高优先级任务。
//!
//! # 设计理念
//!
//! - **外部驱动**: 控制器不自带线程或调度，外部循环每周期调用一次 `step()`
//! - **接线即校验**: 维度一致性在构造时一次性检查，运行周期内不再重复
//! - **资源向下传递**: 共享资源由根持有，以 `&mut dyn Resource` 形式沿递归传给下级
//!
//! # 示例
//!
//! ```rust
//! use basis_control::prelude::*;
//! use basis_math::FloatVector;
//!
//! let reference = DummyReference::with_reference(FloatVector::from_vec(vec![1.0, 0.0, 0.0]));
//! let mut controller = ControllerBuilder::new(
//!     reference,
//!     SquarePotential::new(3),
//!     IdentitySensorTransform::new(3),
//!     GenericEffectorTransform::new(3, 3),
//! )
//! .coefficient(0.1)
//! .convergence_criterion(ConvergenceCriterion::TaskSpaceDistanceThreshold(1e-3))
//! .build_primitive(DummyResource::new(3))
//! .unwrap();
//!
//! loop {
//!     controller.step().unwrap();
//!     if controller.finished() {
//!         break;
//!     }
//! }
//! assert!((controller.resource().get()[0] - 1.0).abs() < 1e-3);
//! ```

pub mod builder;
pub mod primitive;
pub mod sequence;
pub mod subordinate;

use crate::error::Result;

pub use builder::ControllerBuilder;
pub use primitive::PrimitiveController;
pub use sequence::ControllerSequence;
pub use subordinate::SubordinateController;

/// 控制器通用接口
///
/// 外部运行循环只需要这两个操作：
///
/// ```rust,ignore
/// loop {
///     controller.step()?;
///     if controller.finished() {
///         break;
///     }
///     // 外部负责限速（例如按控制周期 sleep）
/// }
/// ```
///
/// # 错误处理
///
/// `step()` 返回错误后，该控制器实例不应继续使用，外部应当重建它。
pub trait Controller: Send {
    /// 执行一个完整周期（update + action）
    fn step(&mut self) -> Result<()>;

    /// 是否已收敛
    ///
    /// 至少执行过一次 `step()` 之后才有意义。
    fn finished(&self) -> bool;

    /// 控制器名称（用于日志）
    fn name(&self) -> &str;
}

impl Controller for Box<dyn Controller> {
    fn step(&mut self) -> Result<()> {
        self.as_mut().step()
    }

    fn finished(&self) -> bool {
        self.as_ref().finished()
    }

    fn name(&self) -> &str {
        self.as_ref().name()
    }
}

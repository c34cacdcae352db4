//! # basis-control - 分层任务空间控制器
//!
//! 在一个可控资源（例如关节角）上同时执行多个任务空间目标：
//! 高优先级任务直接执行，低优先级任务只在高优先级任务留下的零空间内执行。
//!
//! **依赖原则**: 只依赖 `basis-math`，不包含任何调度或 IO。
//!
//! ## 模块
//!
//! - `resource` - 资源（被控制的状态向量）
//! - `reference` - 参考点（任务空间目标）
//! - `sensor` - 传感器变换（资源 → 任务空间，含雅可比矩阵）
//! - `effector` - 执行器变换（任务空间步长 → 资源步长）
//! - `potential` - 势函数（距离与步长）
//! - `combination` - 下级控制器结果的合并策略
//! - `convergence` - 收敛判据
//! - `controller` - 控制器树
//!
//! ## 开放与封闭的扩展点
//!
//! 资源、参考点、传感器变换、执行器变换、势函数是 trait，外部可以实现
//! （例如基于运动学链的正运动学）。合并策略与收敛判据是枚举。

pub mod combination;
pub mod controller;
pub mod convergence;
pub mod effector;
pub mod error;
pub mod potential;
pub mod reference;
pub mod resource;
pub mod sensor;

pub mod prelude;

pub use combination::CombinationStrategy;
pub use controller::{
    Controller, ControllerBuilder, ControllerSequence, PrimitiveController, SubordinateController,
};
pub use convergence::ConvergenceCriterion;
pub use effector::EffectorTransform;
pub use error::{ControlError, Result};
pub use potential::Potential;
pub use reference::Reference;
pub use resource::Resource;
pub use sensor::SensorTransform;

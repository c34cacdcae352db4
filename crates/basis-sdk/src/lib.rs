//! Basis SDK - 分层任务空间控制
//!
//! 在一个可控资源（关节角、末端位姿……）上同时执行多个带优先级的任务空间目标。
//! 低优先级任务只在高优先级任务的零空间内运动，不会干扰高优先级任务。
//!
//! # 架构设计
//!
//! 本 SDK 采用分层架构，从底层到高层：
//!
//! - **数学层** (`math`): 阻尼伪逆、旋转表示转换、SLERP
//! - **控制层** (`control`): 资源、参考点、变换、势函数、控制器树
//! - **SDK 层**: 日志初始化 (`logging`)、TOML 调参配置 (`config`)
//!
//! # 快速开始
//!
//! ```rust
//! use basis_sdk::prelude::*;
//!
//! let config = ControlConfig::from_toml_str(
//!     r#"
//!     [controller]
//!     coefficient = 0.5
//!
//!     [convergence]
//!     task_space_threshold = 1e-3
//!     "#,
//! )
//! .unwrap();
//!
//! let builder = ControllerBuilder::new(
//!     DummyReference::with_reference(FloatVector::from_vec(vec![1.0, 0.0, 0.0])),
//!     config.square_potential(3),
//!     IdentitySensorTransform::new(3),
//!     config.damped_effector(3, 3),
//! );
//! let mut controller = config
//!     .configure(builder)
//!     .build_primitive(DummyResource::new(3))
//!     .unwrap();
//!
//! loop {
//!     controller.step().unwrap();
//!     if controller.finished() {
//!         break;
//!     }
//! }
//! assert!((controller.resource().get()[0] - 1.0).abs() < 1e-2);
//! ```

// 子 crate 以模块路径暴露
pub use basis_control as control;
pub use basis_math as math;

pub mod config;
pub mod logging;

// Prelude 模块
pub mod prelude;

// --- 用户以此为界 ---
// 以下是通过 Facade Pattern 提供的公共 API

pub use basis_control::{
    CombinationStrategy, ControlError, Controller, ControllerBuilder, ControllerSequence,
    ConvergenceCriterion, EffectorTransform, Potential, PrimitiveController, Reference, Resource,
    SensorTransform, SubordinateController,
};
pub use basis_math::{Float, FloatMatrix, FloatVector, MathError};
pub use config::{ConfigError, ControlConfig};
pub use logging::{init_logger, try_init_logger};

//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use basis_sdk::prelude::*;
//! ```

// 控制层（控制器、协作对象、错误）
pub use basis_control::prelude::*;

// 数学层
pub use basis_math::{Float, FloatMatrix, FloatVector, Quaternion};

// SDK 层
pub use crate::config::{ConfigError, ControlConfig};
pub use crate::logging::init_logger;

//! # basis-math - 任务空间控制的数学工具
//!
//! **依赖原则**: 只依赖 `nalgebra`，不依赖控制层。
//!
//! ## 包含模块
//!
//! - `linalg` - 伪逆与阻尼伪逆（Jacobian 求逆）
//! - `slerp` - n 维球面线性插值与四元数插值
//! - `rotation` - 四元数 / 轴角转换、角度归一化
//!
//! 所有向量与矩阵都是运行时定长的稠密 `f64` 类型（`DVector` / `DMatrix`），
//! 维度在对象构造时确定。

pub mod error;
pub mod linalg;
pub mod rotation;
pub mod slerp;

use nalgebra::{DMatrix, DVector};

/// 浮点标量类型
pub type Float = f64;

/// 运行时定长列向量
pub type FloatVector = DVector<Float>;

/// 运行时定长矩阵
pub type FloatMatrix = DMatrix<Float>;

// 重新导出常用类型
pub use error::MathError;
pub use linalg::{DEFAULT_DAMPING, clamp_norm, damped_pseudo_inverse, pseudo_inverse};
pub use rotation::{
    Quaternion, from_axis_angle3, normalize_angle, pack_axis_angle3, quaternion_from_vector,
    quaternion_to_vector, to_axis_angle3, unpack_axis_angle3,
};
pub use slerp::{SLERP_THRESHOLD, qslerp, slerp};

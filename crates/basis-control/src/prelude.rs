//! Prelude - 常用类型的便捷导入
//!
//! ```rust
//! use basis_control::prelude::*;
//! ```

// 控制器
pub use crate::controller::{
    Controller, ControllerBuilder, ControllerSequence, PrimitiveController, SubordinateController,
};
pub use crate::combination::CombinationStrategy;
pub use crate::convergence::ConvergenceCriterion;

// 协作对象（trait 与内置实现）
pub use crate::effector::{
    DampedGenericEffectorTransform, DampedWeightedGenericEffectorTransform, EffectorTransform,
    GenericEffectorTransform,
};
pub use crate::potential::{
    AxisAnglePotential, AxisPotential, CompositePotential, LinePotential, Potential,
    QuaternionPotential, SquarePotential,
};
pub use crate::reference::{DummyReference, Reference, ReferenceHandle, SharedReference};
pub use crate::resource::{
    DummyResource, MaskingResource, PrimitiveControllerResource, Resource, SharedResource,
};
pub use crate::sensor::{
    ApplySensorTransform, BlockOperation, BlockWiseSensorTransform, DifferenceSensorTransform,
    ElementwiseOperation, IdentitySensorTransform, LinearSensorTransform, SensorTransform,
    WeightedSumSensorTransform,
};

// 错误类型
pub use crate::error::ControlError;

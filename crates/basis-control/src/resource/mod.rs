//! 资源模块
//!
//! 资源（Resource）是控制器直接驱动的状态向量（例如关节角），带有速度估计。
//!
//! - `DummyResource` - 内存向量，用于组合与测试
//! - `SharedResource` - 互斥锁包装的共享句柄（跨线程 / 多视图共享）
//! - `MaskingResource` - 在共享资源上暴露一个索引子集
//! - `PrimitiveControllerResource` - 以嵌套控制器作为资源
//!
//! # 线程安全
//!
//! `Resource` 要求 `Send`，控制树可以整体移动到驱动线程。
//! 需要被其他线程同时访问的资源必须通过 [`SharedResource`] 共享，
//! 它保证每次 `get` / `add` / `update` / `set` 调用都是原子的。

pub mod controller;
pub mod dummy;
pub mod masking;
pub mod shared;

use crate::error::Result;
use basis_math::{Float, FloatVector};

pub use controller::PrimitiveControllerResource;
pub use dummy::DummyResource;
pub use masking::MaskingResource;
pub use shared::SharedResource;

/// `add()` 的默认时间步长
pub const DEFAULT_TIMESTEP: Float = 1.0;

/// 资源通用接口
///
/// # 生命周期
///
/// - **接线**: 构造后 `dim()` 固定不变
/// - **运行**: 每个控制周期先 `update()` 拉取外部状态，再由控制器 `add()` 施加增量
pub trait Resource: Send {
    /// 拉取当前外部状态
    fn update(&mut self) -> Result<()>;

    /// 当前值快照
    fn get(&self) -> FloatVector;

    /// 当前速度估计快照
    fn velocity(&self) -> FloatVector;

    /// 施加增量 `step`，`timestep` 用于更新速度估计
    fn add(&mut self, step: &FloatVector, timestep: Float) -> Result<()>;

    /// 直接设置当前值
    fn set(&mut self, value: &FloatVector) -> Result<()>;

    /// 资源维度
    fn dim(&self) -> usize;
}

impl Resource for Box<dyn Resource> {
    fn update(&mut self) -> Result<()> {
        self.as_mut().update()
    }

    fn get(&self) -> FloatVector {
        self.as_ref().get()
    }

    fn velocity(&self) -> FloatVector {
        self.as_ref().velocity()
    }

    fn add(&mut self, step: &FloatVector, timestep: Float) -> Result<()> {
        self.as_mut().add(step, timestep)
    }

    fn set(&mut self, value: &FloatVector) -> Result<()> {
        self.as_mut().set(value)
    }

    fn dim(&self) -> usize {
        self.as_ref().dim()
    }
}

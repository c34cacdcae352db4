//! 根控制器

use super::{Controller, SubordinateController};
use crate::error::{Result, ensure_dim};
use crate::resource::{DEFAULT_TIMESTEP, Resource};
use basis_math::Float;
use tracing::{trace, warn};

/// 根控制器
///
/// 持有控制树的根节点和共享资源。每周期：
///
/// - `update()`: 刷新资源，再执行根节点的计算流程
/// - `action()`: 把根节点结果加到资源上，然后评估收敛
pub struct PrimitiveController {
    root: SubordinateController,
    resource: Box<dyn Resource>,
    timestep: Float,
    cycles: u64,
}

impl PrimitiveController {
    /// 由已接线的根节点和资源构造
    ///
    /// # 错误
    ///
    /// 资源维度与根节点资源维度不同时返回 `DimensionMismatch`
    pub(super) fn new(root: SubordinateController, resource: Box<dyn Resource>) -> Result<Self> {
        ensure_dim(
            root.name(),
            "SensorTransform resource",
            root.resource_dim(),
            "Resource",
            resource.dim(),
        )?;

        Ok(PrimitiveController {
            root,
            resource,
            timestep: DEFAULT_TIMESTEP,
            cycles: 0,
        })
    }

    /// 设置 `resource.add()` 使用的时间步长
    pub fn set_timestep(&mut self, timestep: Float) {
        self.timestep = timestep;
    }

    /// 计算阶段
    pub fn update(&mut self) -> Result<()> {
        self.resource.update()?;
        self.root.update(self.resource.as_mut())
    }

    /// 执行阶段：施加结果并评估收敛
    pub fn action(&mut self) -> Result<()> {
        self.resource.add(self.root.result(), self.timestep)?;
        self.cycles += 1;

        let converged = self.root.refresh_convergence();
        trace!(
            "{}: cycle {} applied, converged = {}",
            self.root.name(),
            self.cycles,
            converged
        );
        Ok(())
    }

    /// 已执行的周期数
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn root(&self) -> &SubordinateController {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut SubordinateController {
        &mut self.root
    }

    pub fn resource(&self) -> &dyn Resource {
        self.resource.as_ref()
    }

    pub fn resource_mut(&mut self) -> &mut dyn Resource {
        self.resource.as_mut()
    }
}

impl Controller for PrimitiveController {
    fn step(&mut self) -> Result<()> {
        self.update()?;
        self.action()
    }

    fn finished(&self) -> bool {
        if self.cycles == 0 {
            warn!(
                "{}: finished() read before the first cycle",
                self.root.name()
            );
        }
        self.root.finished()
    }

    fn name(&self) -> &str {
        self.root.name()
    }
}

impl std::fmt::Debug for PrimitiveController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrimitiveController")
            .field("root", &self.root)
            .field("resource_dim", &self.resource.dim())
            .field("cycles", &self.cycles)
            .finish()
    }
}

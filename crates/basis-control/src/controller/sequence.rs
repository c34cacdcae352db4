//! 控制器序列
//!
//! 依次执行多个控制器：当前控制器收敛后切换到下一个，最后一个收敛时整个序列完成。

use super::Controller;
use crate::error::{ControlError, Result};
use tracing::{debug, info};

/// 控制器序列
pub struct ControllerSequence {
    name: String,
    controllers: Vec<Box<dyn Controller>>,
    current: usize,
    finished: bool,
}

impl ControllerSequence {
    /// # 错误
    ///
    /// 控制器列表为空时返回 `InvalidArgument`
    pub fn new(controllers: Vec<Box<dyn Controller>>) -> Result<Self> {
        if controllers.is_empty() {
            return Err(ControlError::InvalidArgument(
                "ControllerSequence needs at least one controller".to_string(),
            ));
        }
        Ok(ControllerSequence {
            name: "sequence".to_string(),
            controllers,
            current: 0,
            finished: false,
        })
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// 当前执行的控制器索引
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &dyn Controller {
        self.controllers[self.current].as_ref()
    }

    /// 序列中的控制器数量（至少为 1）
    pub fn controller_count(&self) -> usize {
        self.controllers.len()
    }
}

impl Controller for ControllerSequence {
    fn step(&mut self) -> Result<()> {
        if self.finished {
            return Ok(());
        }

        let count = self.controllers.len();
        let controller = &mut self.controllers[self.current];
        controller.step()?;
        if !controller.finished() {
            return Ok(());
        }

        if self.current + 1 < count {
            debug!(
                "{}: '{}' finished, switching to controller {}",
                self.name,
                controller.name(),
                self.current + 1
            );
            self.current += 1;
        } else {
            info!("{}: all {} controllers finished", self.name, count);
            self.finished = true;
        }
        Ok(())
    }

    fn finished(&self) -> bool {
        self.finished
    }

    fn name(&self) -> &str {
        &self.name
    }
}

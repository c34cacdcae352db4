//! 掩码资源
//!
//! 从一个更大的共享资源里挑出部分索引，作为一个维度更小的独立资源使用。
//! 典型场景：双臂机器人的某个子控制器只驱动其中一条臂的关节。
//!
//! # 写回语义
//!
//! - `add`: 增量散布到底层资源的对应索引，其余索引增量为零
//! - `set`: 只覆盖对应索引，其余索引保持不变（读-改-写在同一个临界区内完成）

use super::{Resource, SharedResource};
use crate::error::{ControlError, Result, ensure_dim};
use basis_math::{Float, FloatVector};
use tracing::debug;

/// 掩码资源
#[derive(Debug, Clone)]
pub struct MaskingResource {
    inner: SharedResource,
    indices: Vec<usize>,
    value: FloatVector,
    velocity: FloatVector,
}

impl MaskingResource {
    /// 创建掩码资源
    ///
    /// # 错误
    ///
    /// - 任一索引 `>= inner.dim()` 时返回 `IndexOutOfRange`
    /// - 索引重复时返回 `InvalidArgument`（重复索引无法定义一致的写回）
    pub fn new(inner: SharedResource, indices: Vec<usize>) -> Result<Self> {
        let inner_dim = inner.dim();
        for (i, &index) in indices.iter().enumerate() {
            if index >= inner_dim {
                return Err(ControlError::IndexOutOfRange {
                    index,
                    dim: inner_dim,
                });
            }
            if indices[..i].contains(&index) {
                return Err(ControlError::InvalidArgument(format!(
                    "duplicate masking index: {}",
                    index
                )));
            }
        }

        let (value, velocity) = inner.with(|res| {
            (
                gather(&res.get(), &indices),
                gather(&res.velocity(), &indices),
            )
        });

        debug!(
            "MaskingResource: {} of {} indices selected",
            indices.len(),
            inner_dim
        );

        Ok(MaskingResource {
            inner,
            indices,
            value,
            velocity,
        })
    }

    /// 被选中的索引
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// 底层共享资源
    pub fn inner(&self) -> &SharedResource {
        &self.inner
    }

    fn scatter(&self, values: &FloatVector, base: FloatVector) -> FloatVector {
        let mut full = base;
        for (i, &index) in self.indices.iter().enumerate() {
            full[index] = values[i];
        }
        full
    }
}

fn gather(source: &FloatVector, indices: &[usize]) -> FloatVector {
    FloatVector::from_iterator(indices.len(), indices.iter().map(|&i| source[i]))
}

impl Resource for MaskingResource {
    fn update(&mut self) -> Result<()> {
        let (value, velocity) = self.inner.with(|res| -> Result<_> {
            res.update()?;
            Ok((
                gather(&res.get(), &self.indices),
                gather(&res.velocity(), &self.indices),
            ))
        })?;
        self.value = value;
        self.velocity = velocity;
        Ok(())
    }

    fn get(&self) -> FloatVector {
        self.value.clone()
    }

    fn velocity(&self) -> FloatVector {
        self.velocity.clone()
    }

    fn add(&mut self, step: &FloatVector, timestep: Float) -> Result<()> {
        ensure_dim(
            "MaskingResource",
            "Step",
            step.len(),
            "Resource",
            self.dim(),
        )?;

        let scattered = self.scatter(step, FloatVector::zeros(self.inner.dim()));
        self.inner.add(&scattered, timestep)?;

        self.velocity = step / timestep;
        self.value += step;
        Ok(())
    }

    fn set(&mut self, value: &FloatVector) -> Result<()> {
        ensure_dim(
            "MaskingResource",
            "Value",
            value.len(),
            "Resource",
            self.dim(),
        )?;

        self.inner.with(|res| {
            let full = self.scatter(value, res.get());
            res.set(&full)
        })?;

        self.value.copy_from(value);
        Ok(())
    }

    fn dim(&self) -> usize {
        self.indices.len()
    }
}

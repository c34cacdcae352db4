//! 内存资源

use super::Resource;
use crate::error::{ControlError, Result, ensure_dim};
use basis_math::{Float, FloatVector};

/// 纯内存资源
///
/// `add` 是普通向量加法，`update` 什么都不做。作为组合与测试的参考实现。
#[derive(Debug, Clone, PartialEq)]
pub struct DummyResource {
    value: FloatVector,
    velocity: FloatVector,
}

impl DummyResource {
    /// 创建 `dim` 维的零向量资源
    pub fn new(dim: usize) -> Self {
        Self::from_vector(FloatVector::zeros(dim))
    }

    /// 以给定初值创建资源
    pub fn from_vector(value: FloatVector) -> Self {
        let velocity = FloatVector::zeros(value.len());
        DummyResource { value, velocity }
    }
}

impl Resource for DummyResource {
    fn update(&mut self) -> Result<()> {
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
            "DummyResource",
            "Step",
            step.len(),
            "Resource",
            self.value.len(),
        )?;
        if timestep <= 0.0 {
            return Err(ControlError::InvalidArgument(format!(
                "timestep must be positive, got: {}",
                timestep
            )));
        }

        self.velocity = step / timestep;
        self.value += step;
        Ok(())
    }

    fn set(&mut self, value: &FloatVector) -> Result<()> {
        ensure_dim(
            "DummyResource",
            "Value",
            value.len(),
            "Resource",
            self.value.len(),
        )?;
        self.value.copy_from(value);
        Ok(())
    }

    fn dim(&self) -> usize {
        self.value.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::DEFAULT_TIMESTEP;

    #[test]
    fn test_add_accumulates_and_tracks_velocity() {
        let mut res = DummyResource::new(3);
        let step = FloatVector::from_vec(vec![0.1, -0.2, 0.3]);

        res.add(&step, 0.5).unwrap();
        res.add(&step, 0.5).unwrap();

        assert_eq!(res.get(), FloatVector::from_vec(vec![0.2, -0.4, 0.6]));
        assert_eq!(res.velocity(), FloatVector::from_vec(vec![0.2, -0.4, 0.6]));
    }

    #[test]
    fn test_update_is_noop() {
        let mut res = DummyResource::from_vector(FloatVector::from_vec(vec![1.0, 2.0]));
        res.update().unwrap();
        assert_eq!(res.get(), FloatVector::from_vec(vec![1.0, 2.0]));
        assert_eq!(res.dim(), 2);
    }

    #[test]
    fn test_dimension_checks() {
        let mut res = DummyResource::new(2);
        let wrong = FloatVector::zeros(3);

        assert!(matches!(
            res.add(&wrong, DEFAULT_TIMESTEP),
            Err(ControlError::DimensionMismatch { .. })
        ));
        assert!(matches!(res.set(&wrong), Err(ControlError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_non_positive_timestep_rejected() {
        let mut res = DummyResource::new(1);
        let step = FloatVector::from_element(1, 1.0);
        assert!(matches!(res.add(&step, 0.0), Err(ControlError::InvalidArgument(_))));
        // 失败的调用不修改状态
        assert_eq!(res.get()[0], 0.0);
    }
}

//! 加权和传感器变换

use super::{SensorTransform, check_children, check_input};
use crate::error::{ControlError, Result};
use basis_math::{Float, FloatMatrix, FloatVector};

/// 加权和变换：`result = Σ w_i r_i`，`jacobian = Σ w_i J_i`
pub struct WeightedSumSensorTransform {
    transforms: Vec<Box<dyn SensorTransform>>,
    weights: Vec<Float>,
    result: FloatVector,
    jacobian: FloatMatrix,
}

impl WeightedSumSensorTransform {
    /// 创建加权和变换
    ///
    /// # 错误
    ///
    /// - 子变换少于 2 个，或权重数量与子变换数量不同：`InvalidArgument`
    /// - 子变换的资源或任务维度不一致：`DimensionMismatch`
    ///
    /// # 示例
    ///
    /// ```rust
    /// use basis_control::sensor::{
    ///     IdentitySensorTransform, SensorTransform, WeightedSumSensorTransform,
    /// };
    /// use basis_math::FloatVector;
    ///
    /// let transforms: Vec<Box<dyn SensorTransform>> = vec![
    ///     Box::new(IdentitySensorTransform::new(2)),
    ///     Box::new(IdentitySensorTransform::new(2)),
    /// ];
    /// let mut sensor = WeightedSumSensorTransform::new(transforms, vec![0.25, 0.75]).unwrap();
    ///
    /// sensor.update(&FloatVector::from_vec(vec![2.0, 4.0])).unwrap();
    /// assert_eq!(sensor.result(), &FloatVector::from_vec(vec![2.0, 4.0]));
    /// ```
    pub fn new(transforms: Vec<Box<dyn SensorTransform>>, weights: Vec<Float>) -> Result<Self> {
        let (resource_dim, task_dim) =
            check_children("WeightedSumSensorTransform", &transforms, 2)?;
        if weights.len() != transforms.len() {
            return Err(ControlError::InvalidArgument(format!(
                "WeightedSumSensorTransform: {} weights for {} transforms",
                weights.len(),
                transforms.len()
            )));
        }

        Ok(WeightedSumSensorTransform {
            transforms,
            weights,
            result: FloatVector::zeros(task_dim),
            jacobian: FloatMatrix::zeros(task_dim, resource_dim),
        })
    }

    pub fn weights(&self) -> &[Float] {
        &self.weights
    }
}

impl SensorTransform for WeightedSumSensorTransform {
    fn update(&mut self, resource_value: &FloatVector) -> Result<()> {
        check_input(
            "WeightedSumSensorTransform",
            resource_value,
            self.resource_dim(),
        )?;

        self.result.fill(0.0);
        self.jacobian.fill(0.0);
        for (transform, &weight) in self.transforms.iter_mut().zip(&self.weights) {
            transform.update(resource_value)?;
            self.result.axpy(weight, transform.result(), 1.0);
            self.jacobian += transform.task_jacobian() * weight;
        }
        Ok(())
    }

    fn result(&self) -> &FloatVector {
        &self.result
    }

    fn task_jacobian(&self) -> &FloatMatrix {
        &self.jacobian
    }

    fn resource_dim(&self) -> usize {
        self.jacobian.ncols()
    }

    fn task_dim(&self) -> usize {
        self.jacobian.nrows()
    }
}

impl std::fmt::Debug for WeightedSumSensorTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeightedSumSensorTransform")
            .field("weights", &self.weights)
            .field("result", &self.result)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::{IdentitySensorTransform, LinearSensorTransform};
    use approx::assert_relative_eq;

    fn linear() -> Box<dyn SensorTransform> {
        Box::new(LinearSensorTransform::new(FloatMatrix::from_row_slice(
            2,
            3,
            &[1.0, 2.0, 0.0, 0.0, -1.0, 3.0],
        )))
    }

    /// 两个相同子变换、权重各 0.5：结果和雅可比矩阵等于单个子变换
    #[test]
    fn test_equal_halves_reproduce_child() {
        let mut sensor =
            WeightedSumSensorTransform::new(vec![linear(), linear()], vec![0.5, 0.5]).unwrap();
        let mut child = linear();

        let x = FloatVector::from_vec(vec![0.3, -1.2, 2.0]);
        sensor.update(&x).unwrap();
        child.update(&x).unwrap();

        assert_relative_eq!(
            sensor.result().clone(),
            child.result().clone(),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            sensor.task_jacobian().clone(),
            child.task_jacobian().clone(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_weight_count_mismatch() {
        let result = WeightedSumSensorTransform::new(vec![linear(), linear()], vec![1.0]);
        assert!(matches!(result, Err(ControlError::InvalidArgument(_))));
    }

    #[test]
    fn test_repeated_updates_do_not_accumulate() {
        let transforms: Vec<Box<dyn SensorTransform>> = vec![
            Box::new(IdentitySensorTransform::new(1)),
            Box::new(IdentitySensorTransform::new(1)),
        ];
        let mut sensor = WeightedSumSensorTransform::new(transforms, vec![1.0, 2.0]).unwrap();

        let x = FloatVector::from_element(1, 1.0);
        sensor.update(&x).unwrap();
        sensor.update(&x).unwrap();
        assert_eq!(sensor.result()[0], 3.0);
        assert_eq!(sensor.task_jacobian()[(0, 0)], 3.0);
    }
}

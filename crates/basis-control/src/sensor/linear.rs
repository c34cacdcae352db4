//! 线性传感器变换

use super::{SensorTransform, check_input};
use crate::error::Result;
use basis_math::{FloatMatrix, FloatVector};

/// 恒等变换：任务空间即资源空间
#[derive(Debug, Clone)]
pub struct IdentitySensorTransform {
    result: FloatVector,
    jacobian: FloatMatrix,
}

impl IdentitySensorTransform {
    pub fn new(dim: usize) -> Self {
        IdentitySensorTransform {
            result: FloatVector::zeros(dim),
            jacobian: FloatMatrix::identity(dim, dim),
        }
    }
}

impl SensorTransform for IdentitySensorTransform {
    fn update(&mut self, resource_value: &FloatVector) -> Result<()> {
        check_input("IdentitySensorTransform", resource_value, self.result.len())?;
        self.result.copy_from(resource_value);
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

/// 固定矩阵变换：`result = M x`，`jacobian = M`
///
/// # 示例
///
/// ```rust
/// use basis_control::sensor::{LinearSensorTransform, SensorTransform};
/// use basis_math::{FloatMatrix, FloatVector};
///
/// // 只观察 3 维资源的前两个分量之和
/// let m = FloatMatrix::from_row_slice(1, 3, &[1.0, 1.0, 0.0]);
/// let mut sensor = LinearSensorTransform::new(m);
/// sensor.update(&FloatVector::from_vec(vec![1.0, 2.0, 5.0])).unwrap();
/// assert_eq!(sensor.result()[0], 3.0);
/// ```
#[derive(Debug, Clone)]
pub struct LinearSensorTransform {
    result: FloatVector,
    jacobian: FloatMatrix,
}

impl LinearSensorTransform {
    pub fn new(matrix: FloatMatrix) -> Self {
        LinearSensorTransform {
            result: FloatVector::zeros(matrix.nrows()),
            jacobian: matrix,
        }
    }
}

impl SensorTransform for LinearSensorTransform {
    fn update(&mut self, resource_value: &FloatVector) -> Result<()> {
        check_input(
            "LinearSensorTransform",
            resource_value,
            self.jacobian.ncols(),
        )?;
        self.result = &self.jacobian * resource_value;
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

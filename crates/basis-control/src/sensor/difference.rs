//! 差分传感器变换

use super::{SensorTransform, check_children, check_input};
use crate::error::Result;
use basis_math::{FloatMatrix, FloatVector};

/// 差分变换：`result = r_0 - Σ r_i`，雅可比矩阵同样相减
///
/// 常用于"末端 A 相对末端 B"的相对位置任务。
pub struct DifferenceSensorTransform {
    transforms: Vec<Box<dyn SensorTransform>>,
    result: FloatVector,
    jacobian: FloatMatrix,
}

impl DifferenceSensorTransform {
    /// 创建差分变换
    ///
    /// # 错误
    ///
    /// - 子变换少于 2 个：`InvalidArgument`
    /// - 子变换的资源或任务维度不一致：`DimensionMismatch`
    pub fn new(transforms: Vec<Box<dyn SensorTransform>>) -> Result<Self> {
        let (resource_dim, task_dim) =
            check_children("DifferenceSensorTransform", &transforms, 2)?;
        Ok(DifferenceSensorTransform {
            transforms,
            result: FloatVector::zeros(task_dim),
            jacobian: FloatMatrix::zeros(task_dim, resource_dim),
        })
    }

    /// 子变换
    pub fn transforms(&self) -> &[Box<dyn SensorTransform>] {
        &self.transforms
    }
}

impl SensorTransform for DifferenceSensorTransform {
    fn update(&mut self, resource_value: &FloatVector) -> Result<()> {
        check_input(
            "DifferenceSensorTransform",
            resource_value,
            self.resource_dim(),
        )?;

        for transform in self.transforms.iter_mut() {
            transform.update(resource_value)?;
        }

        let (first, rest) = self.transforms.split_at(1);
        self.result.copy_from(first[0].result());
        self.jacobian.copy_from(first[0].task_jacobian());
        for transform in rest {
            self.result -= transform.result();
            self.jacobian -= transform.task_jacobian();
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

impl std::fmt::Debug for DifferenceSensorTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DifferenceSensorTransform")
            .field("transforms", &self.transforms.len())
            .field("result", &self.result)
            .finish()
    }
}

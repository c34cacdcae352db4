//! 算术组合传感器变换
//!
//! 对单个操作数变换的结果施加运算，雅可比矩阵同步施加相同的（线性）运算。

use super::{SensorTransform, check_input};
use crate::error::{ControlError, Result};
use basis_math::{Float, FloatMatrix, FloatVector};

/// 逐元素运算
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ElementwiseOperation {
    /// 取反
    Negate,
    /// 乘以常数
    Multiply(Float),
}

impl ElementwiseOperation {
    fn factor(self) -> Float {
        match self {
            ElementwiseOperation::Negate => -1.0,
            ElementwiseOperation::Multiply(factor) => factor,
        }
    }
}

/// 逐元素运算变换
///
/// # 示例
///
/// ```rust
/// use basis_control::sensor::{
///     ApplySensorTransform, ElementwiseOperation, IdentitySensorTransform, SensorTransform,
/// };
/// use basis_math::FloatVector;
///
/// let mut sensor = ApplySensorTransform::new(
///     Box::new(IdentitySensorTransform::new(2)),
///     ElementwiseOperation::Negate,
/// );
/// sensor.update(&FloatVector::from_vec(vec![1.0, -2.0])).unwrap();
/// assert_eq!(sensor.result(), &FloatVector::from_vec(vec![-1.0, 2.0]));
/// ```
pub struct ApplySensorTransform {
    operand: Box<dyn SensorTransform>,
    operation: ElementwiseOperation,
    result: FloatVector,
    jacobian: FloatMatrix,
}

impl ApplySensorTransform {
    pub fn new(operand: Box<dyn SensorTransform>, operation: ElementwiseOperation) -> Self {
        let result = FloatVector::zeros(operand.task_dim());
        let jacobian = FloatMatrix::zeros(operand.task_dim(), operand.resource_dim());
        ApplySensorTransform {
            operand,
            operation,
            result,
            jacobian,
        }
    }

    pub fn operation(&self) -> ElementwiseOperation {
        self.operation
    }
}

impl SensorTransform for ApplySensorTransform {
    fn update(&mut self, resource_value: &FloatVector) -> Result<()> {
        self.operand.update(resource_value)?;

        let factor = self.operation.factor();
        self.result = self.operand.result() * factor;
        self.jacobian = self.operand.task_jacobian() * factor;
        Ok(())
    }

    fn result(&self) -> &FloatVector {
        &self.result
    }

    fn task_jacobian(&self) -> &FloatMatrix {
        &self.jacobian
    }

    fn resource_dim(&self) -> usize {
        self.operand.resource_dim()
    }

    fn task_dim(&self) -> usize {
        self.operand.task_dim()
    }
}

impl std::fmt::Debug for ApplySensorTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplySensorTransform")
            .field("operation", &self.operation)
            .field("result", &self.result)
            .finish()
    }
}

/// 分块运算
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockOperation {
    /// 所有块相加
    Sum,
    /// 第一块减去其余各块
    Difference,
}

/// 分块运算变换
///
/// 操作数的任务向量被切成长度为 `block_size` 的若干块，结果维度为 `block_size`。
/// 雅可比矩阵按相同的行块做同样的运算。
pub struct BlockWiseSensorTransform {
    operand: Box<dyn SensorTransform>,
    operation: BlockOperation,
    block_size: usize,
    result: FloatVector,
    jacobian: FloatMatrix,
}

impl BlockWiseSensorTransform {
    /// 创建分块运算变换
    ///
    /// # 错误
    ///
    /// `block_size` 为 0 或不能整除操作数任务维度时返回 `InvalidArgument`
    pub fn new(
        operand: Box<dyn SensorTransform>,
        operation: BlockOperation,
        block_size: usize,
    ) -> Result<Self> {
        let task_dim = operand.task_dim();
        if block_size == 0 || task_dim % block_size != 0 {
            return Err(ControlError::InvalidArgument(format!(
                "BlockWiseSensorTransform: block size {} does not divide task dimension {}",
                block_size, task_dim
            )));
        }

        let resource_dim = operand.resource_dim();
        Ok(BlockWiseSensorTransform {
            operand,
            operation,
            block_size,
            result: FloatVector::zeros(block_size),
            jacobian: FloatMatrix::zeros(block_size, resource_dim),
        })
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    pub fn operation(&self) -> BlockOperation {
        self.operation
    }
}

impl SensorTransform for BlockWiseSensorTransform {
    fn update(&mut self, resource_value: &FloatVector) -> Result<()> {
        check_input(
            "BlockWiseSensorTransform",
            resource_value,
            self.resource_dim(),
        )?;
        self.operand.update(resource_value)?;

        let n = self.block_size;
        let result = self.operand.result();
        let jacobian = self.operand.task_jacobian();

        self.result.copy_from(&result.rows(0, n));
        self.jacobian.copy_from(&jacobian.rows(0, n));

        let sign = match self.operation {
            BlockOperation::Sum => 1.0,
            BlockOperation::Difference => -1.0,
        };
        for start in (n..result.len()).step_by(n) {
            self.result.axpy(sign, &result.rows(start, n), 1.0);
            self.jacobian += jacobian.rows(start, n) * sign;
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
        self.operand.resource_dim()
    }

    fn task_dim(&self) -> usize {
        self.block_size
    }
}

impl std::fmt::Debug for BlockWiseSensorTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockWiseSensorTransform")
            .field("operation", &self.operation)
            .field("block_size", &self.block_size)
            .field("result", &self.result)
            .finish()
    }
}

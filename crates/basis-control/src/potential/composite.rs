//! 组合势
//!
//! 任务向量是各子势任务向量的拼接，例如"位置 3 维 + 轴角 3 维"。

use super::{DistanceTracker, Potential, select_nearest};
use crate::error::{ControlError, Result};
use basis_math::{Float, FloatVector};

/// 组合势
///
/// - 距离：各子势距离的欧氏组合 `sqrt(Σ d_i²)`
/// - 步长：先按组合距离选出最近参考点，再由每个子势在自己的分块上计算
/// - 收敛：所有子势都收敛
pub struct CompositePotential {
    potentials: Vec<Box<dyn Potential>>,
    offsets: Vec<usize>,
    dim: usize,
    tracker: DistanceTracker,
}

impl CompositePotential {
    /// # 错误
    ///
    /// 子势列表为空时返回 `InvalidArgument`
    pub fn new(potentials: Vec<Box<dyn Potential>>) -> Result<Self> {
        if potentials.is_empty() {
            return Err(ControlError::InvalidArgument(
                "CompositePotential needs at least one potential".to_string(),
            ));
        }

        let mut offsets = Vec::with_capacity(potentials.len());
        let mut dim = 0;
        for potential in &potentials {
            offsets.push(dim);
            dim += potential.dim();
        }

        Ok(CompositePotential {
            potentials,
            offsets,
            dim,
            tracker: DistanceTracker::new(),
        })
    }

    pub fn potentials(&self) -> &[Box<dyn Potential>] {
        &self.potentials
    }
}

fn block(v: &FloatVector, offset: usize, len: usize) -> FloatVector {
    v.rows(offset, len).into_owned()
}

impl Potential for CompositePotential {
    fn dim(&self) -> usize {
        self.dim
    }

    fn distance(&self, a: &FloatVector, b: &FloatVector) -> Float {
        self.potentials
            .iter()
            .zip(&self.offsets)
            .map(|(potential, &offset)| {
                let n = potential.dim();
                potential
                    .distance(&block(a, offset, n), &block(b, offset, n))
                    .powi(2)
            })
            .sum::<Float>()
            .sqrt()
    }

    fn gradient(&mut self, references: &[FloatVector], input: &FloatVector) -> Result<FloatVector> {
        let (index, distance) = select_nearest(&*self, references, input)?;
        self.tracker.record(distance);

        let reference = &references[index];
        let mut step = FloatVector::zeros(self.dim);
        for (potential, &offset) in self.potentials.iter_mut().zip(&self.offsets) {
            let n = potential.dim();
            let block_step =
                potential.gradient(&[block(reference, offset, n)], &block(input, offset, n))?;
            step.rows_mut(offset, n).copy_from(&block_step);
        }
        Ok(step)
    }

    fn converged(&self) -> bool {
        self.potentials.iter().all(|p| p.converged())
    }

    fn last_distance(&self) -> Option<Float> {
        self.tracker.last()
    }
}

impl std::fmt::Debug for CompositePotential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositePotential")
            .field("potentials", &self.potentials.len())
            .field("dim", &self.dim)
            .field("last_distance", &self.tracker.last())
            .finish()
    }
}

//! 伪逆计算
//!
//! 任务 Jacobian 通常不是方阵（任务维度 < 资源维度），需要用广义逆把任务空间的
//! 梯度步映射回资源空间。
//!
//! # 算法
//!
//! ```text
//! 宽矩阵 (rows <= cols):  M# = Mᵀ (M Mᵀ + λ² I)⁻¹
//! 高矩阵 (rows >  cols):  M# = (Mᵀ M + λ² I)⁻¹ Mᵀ
//! ```
//!
//! 阻尼项 `λ² I` 在奇异位形附近保证数值稳定，代价是牺牲精确性。
//! `λ = 0` 且矩阵满秩时结果与 Moore–Penrose 伪逆一致。

use crate::{Float, FloatMatrix, FloatVector, MathError};

/// 默认阻尼系数
pub const DEFAULT_DAMPING: Float = 0.001;

/// SVD 伪逆中视为零的奇异值阈值
const PSEUDO_INVERSE_EPSILON: Float = 1e-10;

/// 计算 Moore–Penrose 伪逆（基于 SVD，不加阻尼）
///
/// 小于 `1e-10` 的奇异值按零处理，因此秩亏矩阵也能得到有限结果。
///
/// # 示例
///
/// ```rust
/// use basis_math::{FloatMatrix, pseudo_inverse};
///
/// let m = FloatMatrix::from_row_slice(2, 3, &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
/// let pinv = pseudo_inverse(&m).unwrap();
/// assert_eq!(pinv.shape(), (3, 2));
/// ```
pub fn pseudo_inverse(m: &FloatMatrix) -> Result<FloatMatrix, MathError> {
    m.clone()
        .svd(true, true)
        .pseudo_inverse(PSEUDO_INVERSE_EPSILON)
        .map_err(MathError::Decomposition)
}

/// 计算阻尼伪逆
///
/// # 参数
///
/// - `m`: 待求逆矩阵（通常是 `task_dim x resource_dim` 的任务 Jacobian）
/// - `damping`: 阻尼系数 λ
///
/// # 返回
///
/// `cols x rows` 的广义逆。若正则化后的法方程矩阵不是正定的（只可能在 `λ = 0`
/// 且矩阵秩亏时出现），退化为 [`pseudo_inverse`]。
pub fn damped_pseudo_inverse(m: &FloatMatrix, damping: Float) -> Result<FloatMatrix, MathError> {
    let (rows, cols) = m.shape();
    let lambda_sq = damping * damping;
    let mt = m.transpose();

    if rows <= cols {
        let normal = m * &mt + FloatMatrix::identity(rows, rows) * lambda_sq;
        match normal.cholesky() {
            // (M Mᵀ + λ²I) 对称，因此 Mᵀ A⁻¹ = (A⁻¹ M)ᵀ
            Some(chol) => Ok(chol.solve(m).transpose()),
            None => pseudo_inverse(m),
        }
    } else {
        let normal = &mt * m + FloatMatrix::identity(cols, cols) * lambda_sq;
        match normal.cholesky() {
            Some(chol) => Ok(chol.solve(&mt)),
            None => pseudo_inverse(m),
        }
    }
}

/// 按比例缩放向量，使其模长不超过 `max_norm`
///
/// 方向保持不变；模长已在范围内时不做修改。
pub fn clamp_norm(v: &mut FloatVector, max_norm: Float) {
    let norm = v.norm();
    if norm > max_norm {
        *v *= max_norm / norm;
    }
}

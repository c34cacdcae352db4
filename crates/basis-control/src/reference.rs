//! 参考点模块
//!
//! 参考（Reference）在每个控制周期提供一组任务空间目标点。
//! 空列表表示本周期没有激活的目标，此时控制器只执行下级控制器的贡献。
//!
//! - `DummyReference` - 由调用者直接设置的目标点
//! - `SharedReference` - 由其他线程通过 [`ReferenceHandle`] 发布目标点

use crate::error::{Result, ensure_dim};
use arc_swap::ArcSwap;
use basis_math::FloatVector;
use std::sync::Arc;

/// 参考点通用接口
pub trait Reference: Send {
    /// 刷新目标点（每周期调用一次）
    fn update(&mut self) -> Result<()>;

    /// 当前目标点列表
    fn get(&self) -> &[FloatVector];

    /// 任务空间维度
    fn dim(&self) -> usize;
}

fn check_references(context: &str, dim: usize, references: &[FloatVector]) -> Result<()> {
    for reference in references {
        ensure_dim(
            context,
            "Reference point",
            reference.len(),
            "Reference",
            dim,
        )?;
    }
    Ok(())
}

/// 直接设置的参考点
///
/// # 示例
///
/// ```rust
/// use basis_control::reference::{DummyReference, Reference};
/// use basis_math::FloatVector;
///
/// let mut reference = DummyReference::new(3);
/// assert!(reference.get().is_empty());
///
/// reference.set_reference(FloatVector::from_vec(vec![1.0, 0.0, 0.0])).unwrap();
/// assert_eq!(reference.get().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DummyReference {
    dim: usize,
    references: Vec<FloatVector>,
}

impl DummyReference {
    /// 创建没有目标点的参考
    pub fn new(dim: usize) -> Self {
        DummyReference {
            dim,
            references: Vec::new(),
        }
    }

    /// 创建只有一个目标点的参考，维度取自目标点
    pub fn with_reference(reference: FloatVector) -> Self {
        DummyReference {
            dim: reference.len(),
            references: vec![reference],
        }
    }

    /// 替换为单个目标点
    pub fn set_reference(&mut self, reference: FloatVector) -> Result<()> {
        self.set_references(vec![reference])
    }

    /// 替换全部目标点
    pub fn set_references(&mut self, references: Vec<FloatVector>) -> Result<()> {
        check_references("DummyReference", self.dim, &references)?;
        self.references = references;
        Ok(())
    }

    /// 清空目标点
    pub fn clear(&mut self) {
        self.references.clear();
    }
}

impl Reference for DummyReference {
    fn update(&mut self) -> Result<()> {
        Ok(())
    }

    fn get(&self) -> &[FloatVector] {
        &self.references
    }

    fn dim(&self) -> usize {
        self.dim
    }
}

/// 跨线程发布的参考点
///
/// 发布端（[`ReferenceHandle`]）整体替换目标点列表，控制端在 `update()` 时
/// 取一次快照，周期内看到的目标点保持一致。
///
/// 同步机制：ArcSwap（无锁读取，发布端原子替换）
pub struct SharedReference {
    dim: usize,
    source: Arc<ArcSwap<Vec<FloatVector>>>,
    snapshot: Arc<Vec<FloatVector>>,
}

/// [`SharedReference`] 的发布端
#[derive(Clone)]
pub struct ReferenceHandle {
    dim: usize,
    source: Arc<ArcSwap<Vec<FloatVector>>>,
}

impl SharedReference {
    /// 创建参考及其发布句柄
    ///
    /// # 示例
    ///
    /// ```rust
    /// use basis_control::reference::{Reference, SharedReference};
    /// use basis_math::FloatVector;
    ///
    /// let (mut reference, handle) = SharedReference::new(2);
    /// handle.publish(vec![FloatVector::from_vec(vec![0.5, 0.5])]).unwrap();
    ///
    /// // 发布的目标点在下一次 update() 之后可见
    /// assert!(reference.get().is_empty());
    /// reference.update().unwrap();
    /// assert_eq!(reference.get().len(), 1);
    /// ```
    pub fn new(dim: usize) -> (Self, ReferenceHandle) {
        let source = Arc::new(ArcSwap::from_pointee(Vec::new()));
        let reference = SharedReference {
            dim,
            source: Arc::clone(&source),
            snapshot: Arc::new(Vec::new()),
        };
        let handle = ReferenceHandle { dim, source };
        (reference, handle)
    }

    /// 获取新的发布句柄
    pub fn handle(&self) -> ReferenceHandle {
        ReferenceHandle {
            dim: self.dim,
            source: Arc::clone(&self.source),
        }
    }
}

impl Reference for SharedReference {
    fn update(&mut self) -> Result<()> {
        self.snapshot = self.source.load_full();
        Ok(())
    }

    fn get(&self) -> &[FloatVector] {
        &self.snapshot
    }

    fn dim(&self) -> usize {
        self.dim
    }
}

impl ReferenceHandle {
    /// 发布新的目标点列表（整体替换）
    pub fn publish(&self, references: Vec<FloatVector>) -> Result<()> {
        check_references("ReferenceHandle", self.dim, &references)?;
        self.source.store(Arc::new(references));
        Ok(())
    }

    /// 撤销所有目标点
    pub fn clear(&self) {
        self.source.store(Arc::new(Vec::new()));
    }

    /// 任务空间维度
    pub fn dim(&self) -> usize {
        self.dim
    }
}

impl std::fmt::Debug for SharedReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedReference")
            .field("dim", &self.dim)
            .field("active", &self.snapshot.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ControlError;
    use std::thread;

    #[test]
    fn test_dummy_reference_dimension_check() {
        let mut reference = DummyReference::new(3);
        let err = reference.set_reference(FloatVector::zeros(2)).unwrap_err();
        assert!(matches!(err, ControlError::DimensionMismatch { .. }));
        assert!(reference.get().is_empty());
    }

    #[test]
    fn test_dummy_reference_multiple_targets() {
        let mut reference = DummyReference::with_reference(FloatVector::zeros(2));
        assert_eq!(reference.dim(), 2);

        reference
            .set_references(vec![FloatVector::zeros(2), FloatVector::from_element(2, 1.0)])
            .unwrap();
        assert_eq!(reference.get().len(), 2);

        reference.clear();
        assert!(reference.get().is_empty());
    }

    #[test]
    fn test_shared_reference_publish_from_thread() {
        let (mut reference, handle) = SharedReference::new(3);

        thread::spawn(move || {
            handle
                .publish(vec![FloatVector::from_vec(vec![1.0, 2.0, 3.0])])
                .unwrap();
        })
        .join()
        .unwrap();

        reference.update().unwrap();
        assert_eq!(
            reference.get()[0],
            FloatVector::from_vec(vec![1.0, 2.0, 3.0])
        );
    }

    #[test]
    fn test_shared_reference_snapshot_is_stable_within_cycle() {
        let (mut reference, handle) = SharedReference::new(1);
        handle
            .publish(vec![FloatVector::from_element(1, 1.0)])
            .unwrap();
        reference.update().unwrap();

        handle.clear();
        // 未调用 update()，快照不变
        assert_eq!(reference.get().len(), 1);

        reference.update().unwrap();
        assert!(reference.get().is_empty());
    }

    #[test]
    fn test_handle_rejects_wrong_dimension() {
        let (reference, _) = SharedReference::new(2);
        let handle = reference.handle();
        assert!(handle.publish(vec![FloatVector::zeros(3)]).is_err());
    }
}

//! 共享资源句柄
//!
//! 同一份资源状态可能被多个使用者访问：掩码视图、嵌套控制器、或者外部驱动线程。
//! `SharedResource` 把资源放在一个 `parking_lot::Mutex` 之后，
//! 每个操作都是一个完整的临界区。
//!
//! 同步机制：每个资源实例一把互斥锁（不区分读写，资源操作本身很短）

use super::Resource;
use crate::error::Result;
use basis_math::{Float, FloatVector};
use parking_lot::Mutex;
use std::sync::Arc;

/// 共享资源句柄
///
/// `Clone` 只复制句柄，所有克隆指向同一份状态。
///
/// # 示例
///
/// ```rust
/// use basis_control::resource::{DummyResource, Resource, SharedResource};
/// use basis_math::FloatVector;
///
/// let shared = SharedResource::new(DummyResource::new(3));
/// let mut view = shared.clone();
///
/// view.add(&FloatVector::from_element(3, 1.0), 1.0).unwrap();
/// assert_eq!(shared.get(), FloatVector::from_element(3, 1.0));
/// ```
#[derive(Clone)]
pub struct SharedResource {
    inner: Arc<Mutex<Box<dyn Resource>>>,
    dim: usize,
}

impl SharedResource {
    /// 包装一个资源
    pub fn new(resource: impl Resource + 'static) -> Self {
        Self::from_boxed(Box::new(resource))
    }

    /// 包装一个已装箱的资源
    pub fn from_boxed(resource: Box<dyn Resource>) -> Self {
        let dim = resource.dim();
        SharedResource {
            inner: Arc::new(Mutex::new(resource)),
            dim,
        }
    }

    /// 在一个临界区内执行多个资源操作
    ///
    /// 用于需要"读-改-写"原子性的场景（例如掩码资源的 `set`）。
    pub fn with<R>(&self, f: impl FnOnce(&mut dyn Resource) -> R) -> R {
        let mut guard = self.inner.lock();
        f(guard.as_mut())
    }

    /// 当前句柄数量（包括自身）
    pub fn handle_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl std::fmt::Debug for SharedResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedResource")
            .field("dim", &self.dim)
            .field("handles", &self.handle_count())
            .finish()
    }
}

impl Resource for SharedResource {
    fn update(&mut self) -> Result<()> {
        self.inner.lock().update()
    }

    fn get(&self) -> FloatVector {
        self.inner.lock().get()
    }

    fn velocity(&self) -> FloatVector {
        self.inner.lock().velocity()
    }

    fn add(&mut self, step: &FloatVector, timestep: Float) -> Result<()> {
        self.inner.lock().add(step, timestep)
    }

    fn set(&mut self, value: &FloatVector) -> Result<()> {
        self.inner.lock().set(value)
    }

    fn dim(&self) -> usize {
        self.dim
    }
}

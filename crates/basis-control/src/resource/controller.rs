//! 以控制器作为资源
//!
//! 外层控制器对该资源的每次 `add()` 都驱动内层控制器执行一个完整周期，
//! 外层给出的步长本身不被使用。这样整棵控制树可以作为另一棵树的资源组合使用。

use super::Resource;
use crate::controller::{Controller, PrimitiveController};
use crate::error::Result;
use basis_math::{Float, FloatVector};
use tracing::trace;

/// 以嵌套根控制器作为资源
///
/// - `get` / `velocity` / `dim`: 内层控制器资源的对应值
/// - `add`: 内层控制器执行一次 `update()` + `action()`
/// - `set`: 直接写入内层控制器的资源
/// - `update`: 刷新内层控制器的资源
#[derive(Debug)]
pub struct PrimitiveControllerResource {
    controller: PrimitiveController,
}

impl PrimitiveControllerResource {
    pub fn new(controller: PrimitiveController) -> Self {
        PrimitiveControllerResource { controller }
    }

    /// 内层控制器
    pub fn controller(&self) -> &PrimitiveController {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut PrimitiveController {
        &mut self.controller
    }

    /// 取回内层控制器
    pub fn into_inner(self) -> PrimitiveController {
        self.controller
    }
}

impl Resource for PrimitiveControllerResource {
    fn update(&mut self) -> Result<()> {
        self.controller.resource_mut().update()
    }

    fn get(&self) -> FloatVector {
        self.controller.resource().get()
    }

    fn velocity(&self) -> FloatVector {
        self.controller.resource().velocity()
    }

    fn add(&mut self, _step: &FloatVector, _timestep: Float) -> Result<()> {
        trace!(
            "{}: nested cycle driven by outer add()",
            self.controller.name()
        );
        self.controller.step()
    }

    fn set(&mut self, value: &FloatVector) -> Result<()> {
        self.controller.resource_mut().set(value)
    }

    fn dim(&self) -> usize {
        self.controller.resource().dim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::ControllerBuilder;
    use crate::convergence::ConvergenceCriterion;
    use crate::effector::GenericEffectorTransform;
    use crate::potential::SquarePotential;
    use crate::reference::DummyReference;
    use crate::resource::DummyResource;
    use crate::sensor::IdentitySensorTransform;
    use approx::assert_relative_eq;

    fn nested(target: FloatVector) -> PrimitiveController {
        let dim = target.len();
        ControllerBuilder::new(
            DummyReference::with_reference(target),
            SquarePotential::new(dim),
            IdentitySensorTransform::new(dim),
            GenericEffectorTransform::new(dim, dim),
        )
        .name("inner")
        .coefficient(0.25)
        .convergence_criterion(ConvergenceCriterion::TaskSpaceDistanceThreshold(1e-6))
        .build_primitive(DummyResource::new(dim))
        .unwrap()
    }

    #[test]
    fn test_add_drives_nested_cycle() {
        let inner = nested(FloatVector::from_element(2, 1.0));
        let mut resource = PrimitiveControllerResource::new(inner);
        assert_eq!(resource.dim(), 2);

        // 外层步长被忽略；内层走半程 0.25 * 2 * (1 - 0)
        resource
            .add(&FloatVector::from_element(2, 100.0), 1.0)
            .unwrap();
        assert_relative_eq!(
            resource.get(),
            FloatVector::from_element(2, 0.5),
            epsilon = 1e-12
        );
        assert_eq!(resource.controller().cycles(), 1);
    }

    #[test]
    fn test_set_writes_through() {
        let mut resource = PrimitiveControllerResource::new(nested(FloatVector::zeros(3)));
        let v = FloatVector::from_vec(vec![1.0, 2.0, 3.0]);
        resource.set(&v).unwrap();

        assert_eq!(resource.get(), v);
        assert_eq!(resource.controller().resource().get(), v);
    }

    #[test]
    fn test_outer_controller_composes_nested() {
        let inner = PrimitiveControllerResource::new(nested(FloatVector::from_element(1, 1.0)));
        let mut outer = ControllerBuilder::new(
            DummyReference::with_reference(FloatVector::from_element(1, 1.0)),
            SquarePotential::new(1),
            IdentitySensorTransform::new(1),
            GenericEffectorTransform::new(1, 1),
        )
        .build_primitive(inner)
        .unwrap();

        for _ in 0..5 {
            outer.step().unwrap();
        }
        // 外层每周期驱动一次内层：1 - 0.5^5
        assert_relative_eq!(
            outer.resource().get()[0],
            1.0 - 0.5f64.powi(5),
            epsilon = 1e-12
        );
    }
}

//! 控制周期性能基准测试
//!
//! 测试一个完整控制周期（update + action）的耗时：
//! - 不同资源维度的单任务控制器
//! - 带零空间下级任务的两层控制树
//! - 阻尼伪逆本身

use basis_sdk::math::damped_pseudo_inverse;
use basis_sdk::prelude::*;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

/// 参考点远离原点、永不收敛的单任务控制器
fn single_task(dim: usize) -> PrimitiveController {
    ControllerBuilder::new(
        DummyReference::with_reference(FloatVector::from_element(dim, 1e6)),
        SquarePotential::new(dim).with_max_gradient_step_norm(1e-3),
        IdentitySensorTransform::new(dim),
        DampedGenericEffectorTransform::new(dim, dim),
    )
    .build_primitive(DummyResource::new(dim))
    .expect("valid wiring")
}

fn two_level(dim: usize) -> PrimitiveController {
    let mut row = vec![0.0; dim];
    row[0] = 1.0;

    let posture = ControllerBuilder::new(
        DummyReference::with_reference(FloatVector::from_element(dim, 1e6)),
        SquarePotential::new(dim).with_max_gradient_step_norm(1e-3),
        IdentitySensorTransform::new(dim),
        DampedGenericEffectorTransform::new(dim, dim),
    )
    .name("posture")
    .build_subordinate()
    .expect("valid wiring");

    ControllerBuilder::new(
        DummyReference::with_reference(FloatVector::from_element(1, 1e6)),
        SquarePotential::new(1).with_max_gradient_step_norm(1e-3),
        LinearSensorTransform::new(FloatMatrix::from_row_slice(1, dim, &row)),
        DampedGenericEffectorTransform::new(1, dim),
    )
    .name("primary")
    .subordinate(posture)
    .build_primitive(DummyResource::new(dim))
    .expect("valid wiring")
}

fn bench_single_task(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_task_cycle");

    for dim in [3, 7, 14] {
        group.bench_with_input(BenchmarkId::from_parameter(format!("{}dof", dim)), &dim, |b, &dim| {
            let mut controller = single_task(dim);
            b.iter(|| {
                controller.step().expect("cycle");
                black_box(controller.root().result().norm())
            });
        });
    }

    group.finish();
}

fn bench_two_level(c: &mut Criterion) {
    let mut group = c.benchmark_group("two_level_cycle");

    for dim in [3, 7, 14] {
        group.bench_with_input(BenchmarkId::from_parameter(format!("{}dof", dim)), &dim, |b, &dim| {
            let mut controller = two_level(dim);
            b.iter(|| {
                controller.step().expect("cycle");
                black_box(controller.root().combined_results().norm())
            });
        });
    }

    group.finish();
}

fn bench_damped_pseudo_inverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("damped_pseudo_inverse");

    let wide = FloatMatrix::from_fn(6, 7, |i, j| ((i * 7 + j) as f64).sin());
    group.bench_function("6x7", |b| {
        b.iter(|| black_box(damped_pseudo_inverse(black_box(&wide), 1e-3).expect("inverse")))
    });

    let tall = FloatMatrix::from_fn(7, 3, |i, j| ((i * 3 + j) as f64).cos());
    group.bench_function("7x3", |b| {
        b.iter(|| black_box(damped_pseudo_inverse(black_box(&tall), 1e-3).expect("inverse")))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_single_task,
    bench_two_level,
    bench_damped_pseudo_inverse
);
criterion_main!(benches);

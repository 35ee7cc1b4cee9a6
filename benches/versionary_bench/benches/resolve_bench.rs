//! Profile resolution benchmarks
//!
//! Measures version parsing, single-action resolution, and building the
//! profiles of a whole application.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use versionary::prelude::*;

fn application(controllers: usize, actions: usize) -> ApiVersionConventions {
    let mut conventions = ApiVersionConventions::new();
    for c in 0..controllers {
        let controller = conventions.controller(format!("controller{}", c));
        controller
            .declare_supported((1u32, 0u32))
            .unwrap()
            .declare_supported((2u32, 0u32))
            .unwrap();
        for a in 0..actions {
            let mut action = controller.action(format!("action{}()", a));
            match a % 3 {
                0 => {}
                1 => {
                    action.declare_deprecated((0u32, 9u32)).unwrap();
                }
                _ => {
                    action.map_to_version((2u32, 0u32)).unwrap();
                }
            }
        }
    }
    conventions
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for input in ["1", "v1.2", "2.0-beta"] {
        group.bench_with_input(BenchmarkId::from_parameter(input), input, |b, input| {
            b.iter(|| black_box(input).parse::<ApiVersion>().unwrap())
        });
    }

    group.finish();
}

fn bench_resolve_action(c: &mut Criterion) {
    let conventions = application(1, 3);
    let controller = conventions.get_controller("controller0").unwrap();
    let resolver = ProfileResolver::new();

    c.bench_function("resolve_action", |b| {
        b.iter(|| resolver.resolve(controller, black_box("action1()")).unwrap())
    });
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for controllers in [1usize, 10, 100] {
        let conventions = application(controllers, 10);
        group.bench_with_input(
            BenchmarkId::from_parameter(controllers),
            &conventions,
            |b, conventions| b.iter(|| conventions.build()),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_resolve_action, bench_build);
criterion_main!(benches);

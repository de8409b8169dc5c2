//! # Kinematics Benchmark

use arm_lib::arm_ctrl::{NamedTarget, SetpointTable, TwoLinkKinematics};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn kinematics_benchmark(c: &mut Criterion) {
    let kinematics = TwoLinkKinematics::new(0.925, 0.6).expect("valid geometry");

    c.bench_function("solve reachable target", |b| {
        b.iter(|| kinematics.solve(black_box(1.0), black_box(0.5)))
    });

    c.bench_function("solve unreachable target", |b| {
        b.iter(|| kinematics.solve(black_box(3.0), black_box(0.0)))
    });

    let targets: Vec<NamedTarget> = (0..32)
        .map(|i| NamedTarget {
            name: format!("setpoint_{}", i),
            horizontal_distance_m: 0.4 + 0.03 * i as f64,
            vertical_distance_m: 0.1,
        })
        .collect();

    c.bench_function("build 32 entry setpoint table", |b| {
        b.iter(|| SetpointTable::build(black_box(&kinematics), black_box(&targets)))
    });
}

criterion_group!(benches, kinematics_benchmark);
criterion_main!(benches);

//! Brute force vs table-based inversion timings.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use stick_solver::{angle, AdjustedYawTable, IntendedStick, StickSolver, TableTrig};

fn bench_table_build(c: &mut Criterion) {
    let trig = TableTrig::generate();
    c.bench_function("table_build", |b| {
        b.iter(|| AdjustedYawTable::build(black_box(&trig)))
    });
}

fn bench_inversions(c: &mut Criterion) {
    let solver = StickSolver::with_generated_tables();
    let saturated = IntendedStick {
        yaw: angle(0x2000),
        mag: 32.0,
    };
    let partial = IntendedStick {
        yaw: angle(0x2000),
        mag: 12.0,
    };

    c.bench_function("intended_to_raw_exact", |b| {
        b.iter(|| {
            solver.intended_to_raw_exact(black_box(saturated), angle(0), angle(0), false, angle(0))
        })
    });

    c.bench_function("intended_to_raw_heuristic_saturated", |b| {
        b.iter(|| solver.intended_to_raw(black_box(saturated), angle(0), angle(0), false, angle(0)))
    });

    c.bench_function("intended_to_raw_heuristic_partial", |b| {
        b.iter(|| solver.intended_to_raw(black_box(partial), angle(0), angle(0), false, angle(0)))
    });
}

criterion_group!(benches, bench_table_build, bench_inversions);
criterion_main!(benches);

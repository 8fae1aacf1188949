//! Criterion benchmarks for the assignment solver and the tracker step.
//!
//! Run with: cargo bench
//! Run specific group: cargo bench -- assignment

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use radtrack::{assign_min_cost, MultiTargetTracker, SimConfig, TargetSim2D, TrackerConfig, Vec2};

fn random_cost_matrix(rng: &mut StdRng, n: usize, m: usize) -> Vec<Vec<f64>> {
    (0..n)
        .map(|_| (0..m).map(|_| rng.gen_range(0.0..100.0)).collect())
        .collect()
}

fn bench_assignment(c: &mut Criterion) {
    let mut group = c.benchmark_group("assignment");
    for size in [4usize, 16, 64] {
        let mut rng = StdRng::seed_from_u64(42);
        let cost = random_cost_matrix(&mut rng, size, size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &cost, |b, cost| {
            b.iter(|| assign_min_cost(cost));
        });
    }
    group.finish();
}

fn bench_tracker_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("tracker_step");
    for targets in [3usize, 10, 30] {
        group.bench_with_input(
            BenchmarkId::from_parameter(targets),
            &targets,
            |b, &targets| {
                // Warm a tracker up on an established scene, then measure
                // steady-state steps on clones of it.
                let cfg = SimConfig {
                    num_targets: targets,
                    enable_clutter: true,
                    clutter_per_step: 5,
                    ..SimConfig::default()
                };
                let mut sim = TargetSim2D::new(42, cfg);
                let mut tracker = MultiTargetTracker::new(TrackerConfig::default());
                let mut batches: Vec<Vec<Vec2>> = Vec::new();
                for _ in 0..60 {
                    sim.step();
                    let z: Vec<Vec2> = sim.last_measurements().iter().map(|m| m.z).collect();
                    tracker.step(&z, 0.05, 1.5, 3.0).unwrap();
                    batches.push(z);
                }

                let mut next = 0usize;
                b.iter_batched(
                    || tracker.clone(),
                    |mut t| {
                        let z = &batches[next % batches.len()];
                        next = next.wrapping_add(1);
                        t.step(z, 0.05, 1.5, 3.0).unwrap();
                        t
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_assignment, bench_tracker_step);
criterion_main!(benches);

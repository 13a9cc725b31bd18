/*!
 * Lottery Scheduling Benchmarks
 *
 * Draw latency, quantum event handling, and rebalance sweeps across
 * table populations
 */

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use schedd::{EntropyRng, SchedConfig, SchedEngine, StartMode, StartRequest};
use std::time::Duration;

/// Seats a system parent plus `users` lottery participants
fn populated_engine(users: u32) -> SchedEngine {
    let engine = SchedEngine::builder()
        .with_config(SchedConfig {
            table_capacity: users as usize + 2,
            ..Default::default()
        })
        .with_random(Box::new(EntropyRng::with_seed(7)))
        .build();

    engine
        .start_scheduling(StartRequest {
            endpoint: 1,
            ceiling: 2,
            mode: StartMode::Explicit {
                quantum: Duration::from_millis(200),
            },
        })
        .unwrap();

    for i in 0..users {
        engine
            .start_scheduling(StartRequest {
                endpoint: 100 + i,
                ceiling: 14,
                mode: StartMode::Inherit { parent: 1 },
            })
            .unwrap();
    }

    engine
}

fn bench_draw_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("lottery_draw");

    for population in [8u32, 64, 256] {
        group.bench_with_input(
            BenchmarkId::from_parameter(population),
            &population,
            |b, &population| {
                let engine = populated_engine(population);
                let baseline = engine.config().baseline_user_level();

                b.iter(|| {
                    let winner = engine.run_lottery().unwrap().unwrap();
                    // Park the winner so the pool is full again next draw
                    engine.change_nice(winner, baseline).unwrap();
                });
            },
        );
    }

    group.finish();
}

fn bench_quantum_events(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantum_event");

    for population in [8u32, 64] {
        group.bench_with_input(
            BenchmarkId::from_parameter(population),
            &population,
            |b, &population| {
                let engine = populated_engine(population);
                engine.run_lottery().unwrap();

                // Each event returns the winner to the baseline and crowns
                // a successor, so a winner always exists
                b.iter(|| {
                    let winner = engine.current_winner().unwrap();
                    black_box(engine.on_quantum_exhausted(winner).unwrap());
                });
            },
        );
    }

    group.finish();
}

fn bench_admission_cycle(c: &mut Criterion) {
    c.bench_function("admission_cycle", |b| {
        let engine = populated_engine(64);
        let baseline = engine.config().baseline_user_level();

        b.iter(|| {
            engine
                .start_scheduling(StartRequest {
                    endpoint: 9_999,
                    ceiling: 14,
                    mode: StartMode::Inherit { parent: 1 },
                })
                .unwrap();
            engine.stop_scheduling(9_999).unwrap();

            // The removal draw crowns a survivor; park it so the pool
            // stays stationary across iterations
            if let Some(winner) = engine.current_winner() {
                engine.change_nice(winner, baseline).unwrap();
            }
        });
    });
}

fn bench_settled_sweep(c: &mut Criterion) {
    c.bench_function("sweep_no_displacement", |b| {
        let engine = populated_engine(254);

        b.iter(|| {
            // Every entry already rests at its ceiling (should be fast)
            black_box(engine.balance_queues());
        });
    });
}

criterion_group!(
    benches,
    bench_draw_scaling,
    bench_quantum_events,
    bench_admission_cycle,
    bench_settled_sweep
);

criterion_main!(benches);

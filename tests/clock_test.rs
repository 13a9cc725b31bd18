/*!
 * Clock Tests
 * Periodic rebalancing wiring between the clock task and the engine
 */

use pretty_assertions::assert_eq;
use schedd::{BalanceClock, EntropyRng, SchedConfig, SchedEngine, StartMode, StartRequest};
use std::time::Duration;

fn engine_with_period(period: Duration) -> SchedEngine {
    SchedEngine::builder()
        .with_config(SchedConfig {
            rebalance_period: period,
            ..Default::default()
        })
        .with_random(Box::new(EntropyRng::with_seed(42)))
        .build()
}

fn explicit(endpoint: u32, ceiling: u8) -> StartRequest {
    StartRequest {
        endpoint,
        ceiling,
        mode: StartMode::Explicit {
            quantum: Duration::from_millis(200),
        },
    }
}

#[tokio::test]
async fn test_clock_restores_demoted_processes_on_its_period() {
    let engine = engine_with_period(Duration::from_millis(20));
    engine.start_scheduling(explicit(5, 1)).unwrap();
    engine.on_quantum_exhausted(5).unwrap();
    assert_eq!(engine.proc_stats(5).unwrap().priority, 2);

    let clock = BalanceClock::spawn(engine.clone());
    tokio::time::sleep(Duration::from_millis(60)).await;

    assert_eq!(engine.proc_stats(5).unwrap().priority, 1);
    assert!(engine.stats().balance_sweeps >= 2);

    clock.shutdown().await;
}

#[tokio::test]
async fn test_trigger_forces_a_sweep_ahead_of_the_period() {
    let engine = engine_with_period(Duration::from_secs(10));
    let clock = BalanceClock::spawn(engine.clone());

    // Let the interval's opening tick pass before creating any work
    tokio::time::sleep(Duration::from_millis(20)).await;
    engine.start_scheduling(explicit(5, 1)).unwrap();
    engine.on_quantum_exhausted(5).unwrap();
    assert_eq!(engine.proc_stats(5).unwrap().priority, 2);

    clock.trigger();
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(engine.proc_stats(5).unwrap().priority, 1);
    clock.shutdown().await;
}

#[tokio::test]
async fn test_period_update_speeds_up_the_sweep_cadence() {
    let engine = engine_with_period(Duration::from_secs(10));
    let clock = BalanceClock::spawn(engine.clone());
    tokio::time::sleep(Duration::from_millis(20)).await;

    let before = engine.stats().balance_sweeps;
    clock.update_period(Duration::from_millis(5));
    tokio::time::sleep(Duration::from_millis(60)).await;

    assert!(engine.stats().balance_sweeps >= before + 2);
    clock.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_stops_the_clock_cleanly() {
    let engine = engine_with_period(Duration::from_millis(10));
    let clock = BalanceClock::spawn(engine.clone());
    tokio::time::sleep(Duration::from_millis(30)).await;

    clock.shutdown().await;
    let settled = engine.stats().balance_sweeps;
    tokio::time::sleep(Duration::from_millis(40)).await;

    // No further sweeps once the task has exited
    assert_eq!(engine.stats().balance_sweeps, settled);
}

#[test]
fn test_repeated_sweeps_walk_everyone_back_to_their_ceiling() {
    let engine = engine_with_period(Duration::from_secs(5));
    engine.start_scheduling(explicit(1, 1)).unwrap();
    engine.start_scheduling(explicit(2, 2)).unwrap();
    engine.start_scheduling(explicit(3, 3)).unwrap();

    for _ in 0..3 {
        engine.on_quantum_exhausted(1).unwrap();
    }
    engine.on_quantum_exhausted(2).unwrap();

    assert_eq!(engine.proc_stats(1).unwrap().priority, 4);
    assert_eq!(engine.proc_stats(2).unwrap().priority, 3);
    assert_eq!(engine.proc_stats(3).unwrap().priority, 3);

    // Each sweep moves a displaced process one level toward its ceiling
    assert_eq!(engine.balance_queues(), 2);
    assert_eq!(engine.balance_queues(), 1);
    assert_eq!(engine.balance_queues(), 1);
    assert_eq!(engine.balance_queues(), 0);

    for endpoint in [1, 2, 3] {
        let stats = engine.proc_stats(endpoint).unwrap();
        assert_eq!(stats.priority, stats.max_priority);
    }
}

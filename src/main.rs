/*!
 * schedd - Main Entry Point
 *
 * Scheduling policy daemon that drives the hybrid priority/lottery engine
 * against a synthetic workload:
 * - admits a small system + user population
 * - feeds quantum-exhaustion events on a timer
 * - rebalances queues in the background
 */

use schedd::{
    init_tracing, BalanceClock, EntropyRng, LoggingDispatcher, SchedConfig, SchedEngine,
    StartMode, StartRequest,
};
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize structured tracing
    init_tracing();

    info!("schedd starting...");
    info!("================================================");

    let config = SchedConfig::from_env();
    info!(
        queue_count = config.queue_count,
        baseline_level = config.baseline_user_level(),
        winner_level = config.winner_level(),
        user_quantum_ms = config.user_quantum.as_millis() as u64,
        rebalance_secs = config.rebalance_period.as_secs(),
        table_capacity = config.table_capacity,
        "Configuration loaded"
    );

    let quantum = config.user_quantum;
    let engine = SchedEngine::builder()
        .with_config(config.clone())
        .with_dispatcher(Arc::new(LoggingDispatcher))
        .with_random(Box::new(EntropyRng::new()))
        .build();

    info!("Admitting synthetic workload...");

    // Root system entity the user population inherits from
    engine.start_scheduling(StartRequest {
        endpoint: 1,
        ceiling: 2,
        mode: StartMode::Explicit {
            quantum: Duration::from_millis(50),
        },
    })?;

    for endpoint in 10..14 {
        engine.start_scheduling(StartRequest {
            endpoint,
            ceiling: config.baseline_user_level(),
            mode: StartMode::Inherit { parent: 1 },
        })?;
    }

    // Skew the odds so the draws have something to show
    engine.adjust_tickets(10, 40)?;
    engine.adjust_tickets(11, -10)?;

    let clock = BalanceClock::spawn(engine.clone());

    // Seed the first win
    engine.run_lottery()?;

    info!("Entering event loop - press Ctrl+C to exit");

    let mut tick = tokio::time::interval(quantum);
    let mut events: u64 = 0;

    loop {
        tokio::select! {
            _ = tick.tick() => {
                events += 1;

                // Most quanta the winner runs dry; every few events a
                // baseline entry runs dry instead, exercising the
                // blocked-winner boost path
                let exhausted = if events % 5 == 0 {
                    engine
                        .all_proc_stats()
                        .iter()
                        .find(|p| p.is_user && !p.is_winner)
                        .map(|p| p.endpoint)
                } else {
                    engine.current_winner()
                };

                if let Some(endpoint) = exhausted {
                    match engine.on_quantum_exhausted(endpoint) {
                        Ok(Some(next)) => info!(
                            "Endpoint {} ran out of quantum; endpoint {} takes the win",
                            endpoint, next
                        ),
                        Ok(None) => info!(
                            "Endpoint {} ran out of quantum; no eligible entries",
                            endpoint
                        ),
                        Err(e) => tracing::warn!(error = %e, "Quantum event failed"),
                    }
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl+C received, shutting down");
                break;
            }
        }
    }

    clock.shutdown().await;

    let stats = engine.stats();
    println!("{}", serde_json::to_string_pretty(&stats)?);

    Ok(())
}

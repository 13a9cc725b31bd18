/*!
 * Balance Clock
 * Self-rearming timer task that drives periodic queue rebalancing
 */

use super::SchedEngine;
use log::{info, warn};
use std::time::Duration;
use tokio::sync::mpsc;

/// Control messages for the balance clock task
#[derive(Debug, Clone)]
pub enum ClockCommand {
    /// Replace the rebalance period
    UpdatePeriod(Duration),
    /// Fire a rebalance sweep immediately
    Trigger,
    /// Stop the clock task
    Shutdown,
}

/// Handle to the background rebalance timer
pub struct BalanceClock {
    command_tx: mpsc::UnboundedSender<ClockCommand>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl BalanceClock {
    /// Spawn a clock that fires `balance_queues` on the engine's
    /// configured period
    pub fn spawn(engine: SchedEngine) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let period = engine.config().rebalance_period;

        let handle = tokio::spawn(async move {
            run_clock_loop(engine, period, command_rx).await;
        });

        info!("Balance clock spawned with {:?} period", period);

        Self {
            command_tx,
            handle: Some(handle),
        }
    }

    /// Replace the rebalance period (takes effect immediately)
    pub fn update_period(&self, period: Duration) {
        let _ = self.command_tx.send(ClockCommand::UpdatePeriod(period));
    }

    /// Fire a rebalance sweep without waiting for the next tick
    pub fn trigger(&self) {
        let _ = self.command_tx.send(ClockCommand::Trigger);
    }

    /// Shutdown the clock task gracefully
    pub async fn shutdown(mut self) {
        let _ = self.command_tx.send(ClockCommand::Shutdown);

        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!("Balance clock shutdown error: {}", e);
            } else {
                info!("Balance clock shutdown complete");
            }
        }
    }
}

impl Drop for BalanceClock {
    fn drop(&mut self) {
        if self.handle.is_some() {
            let _ = self.command_tx.send(ClockCommand::Shutdown);
        }
    }
}

/// Core clock loop
async fn run_clock_loop(
    engine: SchedEngine,
    period: Duration,
    mut command_rx: mpsc::UnboundedReceiver<ClockCommand>,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    info!("Balance clock loop started with {:?} period", period);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let promoted = engine.balance_queues();
                if promoted > 0 {
                    log::trace!("Balance tick promoted {} entries", promoted);
                }
            }

            Some(cmd) = command_rx.recv() => {
                match cmd {
                    ClockCommand::UpdatePeriod(new_period) => {
                        info!("Rebalance period updated to {:?}", new_period);

                        interval = tokio::time::interval(new_period);
                        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
                    }

                    ClockCommand::Trigger => {
                        engine.balance_queues();
                        log::trace!("Manual rebalance trigger");
                    }

                    ClockCommand::Shutdown => {
                        info!("Balance clock shutting down");
                        break;
                    }
                }
            }
        }
    }
}

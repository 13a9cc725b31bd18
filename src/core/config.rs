/*!
 * Engine Configuration
 * Queue layout, quantum, and rebalance settings with environment overrides
 */

use super::types::QueueLevel;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

/// Lowest legal ticket count; a zero-ticket process could never win
pub const TICKET_MIN: u32 = 1;

/// Highest legal ticket count
pub const TICKET_MAX: u32 = 100;

// Fewer than four queues leaves no room below the winner level for
// system work.
const MIN_QUEUE_COUNT: u8 = 4;

/// Scheduling engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchedConfig {
    /// Number of priority queues; valid levels are 0..queue_count
    pub queue_count: u8,
    /// Quantum granted to a lottery winner
    pub user_quantum: Duration,
    /// Period of the starvation-avoidance rebalance sweep
    pub rebalance_period: Duration,
    /// Ticket grant for newly admitted entities
    pub initial_tickets: u32,
    /// Fixed process table size
    pub table_capacity: usize,
}

impl Default for SchedConfig {
    fn default() -> Self {
        Self {
            queue_count: 16,
            user_quantum: Duration::from_millis(200),
            rebalance_period: Duration::from_secs(5),
            initial_tickets: 20,
            table_capacity: 256,
        }
    }
}

impl SchedConfig {
    /// Resting level for eligible user processes
    pub fn baseline_user_level(&self) -> QueueLevel {
        self.queue_count - 2
    }

    /// Level reserved for the current lottery winner
    pub fn winner_level(&self) -> QueueLevel {
        self.baseline_user_level() - 1
    }

    /// Load configuration from the environment, falling back per-field to
    /// defaults
    ///
    /// Environment variables:
    /// - SCHEDD_QUEUE_COUNT
    /// - SCHEDD_USER_QUANTUM_MS
    /// - SCHEDD_REBALANCE_SECS
    /// - SCHEDD_INITIAL_TICKETS
    /// - SCHEDD_TABLE_CAPACITY
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            queue_count: env_or("SCHEDD_QUEUE_COUNT", defaults.queue_count),
            user_quantum: Duration::from_millis(env_or(
                "SCHEDD_USER_QUANTUM_MS",
                defaults.user_quantum.as_millis() as u64,
            )),
            rebalance_period: Duration::from_secs(env_or(
                "SCHEDD_REBALANCE_SECS",
                defaults.rebalance_period.as_secs(),
            )),
            initial_tickets: env_or("SCHEDD_INITIAL_TICKETS", defaults.initial_tickets),
            table_capacity: env_or("SCHEDD_TABLE_CAPACITY", defaults.table_capacity),
        };

        config.sanitized()
    }

    /// Clamp out-of-range fields so the config is always internally valid
    pub fn sanitized(mut self) -> Self {
        if self.queue_count < MIN_QUEUE_COUNT {
            warn!(
                "Queue count {} below minimum {}, using minimum",
                self.queue_count, MIN_QUEUE_COUNT
            );
            self.queue_count = MIN_QUEUE_COUNT;
        }
        if self.user_quantum.is_zero() {
            warn!("Zero user quantum, using default");
            self.user_quantum = Self::default().user_quantum;
        }
        if self.rebalance_period.is_zero() {
            warn!("Zero rebalance period, using default");
            self.rebalance_period = Self::default().rebalance_period;
        }
        if !(TICKET_MIN..=TICKET_MAX).contains(&self.initial_tickets) {
            warn!(
                "Initial ticket grant {} outside [{}, {}], clamping",
                self.initial_tickets, TICKET_MIN, TICKET_MAX
            );
            self.initial_tickets = self.initial_tickets.clamp(TICKET_MIN, TICKET_MAX);
        }
        if self.table_capacity == 0 {
            warn!("Zero table capacity, using default");
            self.table_capacity = Self::default().table_capacity;
        }
        self
    }
}

/// Read an environment variable, falling back to `default` when unset or
/// unparseable
fn env_or<T>(name: &str, default: T) -> T
where
    T: FromStr + Display,
{
    match std::env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Ignoring unparseable {}={:?}, using {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_levels() {
        let config = SchedConfig::default();
        assert_eq!(config.queue_count, 16);
        assert_eq!(config.baseline_user_level(), 14);
        assert_eq!(config.winner_level(), 13);
    }

    #[test]
    fn test_sanitize_clamps_queue_count() {
        let config = SchedConfig {
            queue_count: 2,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.queue_count, MIN_QUEUE_COUNT);
    }

    #[test]
    fn test_sanitize_clamps_tickets() {
        let config = SchedConfig {
            initial_tickets: 0,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.initial_tickets, TICKET_MIN);

        let config = SchedConfig {
            initial_tickets: 5000,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.initial_tickets, TICKET_MAX);
    }

    #[test]
    fn test_sanitize_rejects_zero_durations() {
        let config = SchedConfig {
            user_quantum: Duration::ZERO,
            rebalance_period: Duration::ZERO,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(config.user_quantum, SchedConfig::default().user_quantum);
        assert_eq!(
            config.rebalance_period,
            SchedConfig::default().rebalance_period
        );
    }
}

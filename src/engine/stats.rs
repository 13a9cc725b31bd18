/*!
 * Lock-Free Engine Statistics
 * Atomic counters for zero-contention tracking of scheduling activity
 */

use crate::core::serde::{is_false, is_zero_u64};
use crate::core::types::{Endpoint, QueueLevel};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Atomic engine statistics for lock-free updates
///
/// # Performance
/// - Cache-line aligned to prevent false sharing
/// - All operations use relaxed ordering
/// - Read-only snapshot requires no synchronization
#[repr(C, align(64))]
#[derive(Debug, Default)]
pub struct AtomicEngineStats {
    admissions: AtomicU64,
    removals: AtomicU64,
    nice_changes: AtomicU64,
    quantum_events: AtomicU64,
    demotions: AtomicU64,
    lotteries: AtomicU64,
    empty_draws: AtomicU64,
    wins: AtomicU64,
    ticket_boosts: AtomicU64,
    balance_sweeps: AtomicU64,
    promotions: AtomicU64,
}

impl AtomicEngineStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment admissions (lock-free)
    #[inline(always)]
    pub fn inc_admissions(&self) {
        self.admissions.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment removals (lock-free)
    #[inline(always)]
    pub fn inc_removals(&self) {
        self.removals.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment niceness changes (lock-free)
    #[inline(always)]
    pub fn inc_nice_changes(&self) {
        self.nice_changes.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment quantum-exhaustion events (lock-free)
    ///
    /// # Performance
    /// Hot path - called on every out-of-quantum notification
    #[inline(always)]
    pub fn inc_quantum_events(&self) {
        self.quantum_events.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment round-robin demotions (lock-free)
    #[inline(always)]
    pub fn inc_demotions(&self) {
        self.demotions.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment lotteries held (lock-free)
    ///
    /// # Performance
    /// Hot path - called on every draw, including empty ones
    #[inline(always)]
    pub fn inc_lotteries(&self) {
        self.lotteries.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment draws that found no eligible tickets (lock-free)
    #[inline(always)]
    pub fn inc_empty_draws(&self) {
        self.empty_draws.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment lottery wins (lock-free)
    #[inline(always)]
    pub fn inc_wins(&self) {
        self.wins.fetch_add(1, Ordering::Relaxed);
    }

    /// Add tickets granted by blocked-winner boosts (lock-free)
    #[inline(always)]
    pub fn add_ticket_boosts(&self, count: u64) {
        self.ticket_boosts.fetch_add(count, Ordering::Relaxed);
    }

    /// Increment rebalance sweeps (lock-free)
    #[inline(always)]
    pub fn inc_balance_sweeps(&self) {
        self.balance_sweeps.fetch_add(1, Ordering::Relaxed);
    }

    /// Add promotions performed by a rebalance sweep (lock-free)
    #[inline(always)]
    pub fn add_promotions(&self, count: u64) {
        self.promotions.fetch_add(count, Ordering::Relaxed);
    }

    /// Get snapshot of current stats
    ///
    /// # Note
    /// Counter values may not be mutually consistent under concurrent
    /// updates, but each individual value is accurate. This is acceptable
    /// for monitoring.
    #[inline]
    pub fn snapshot(&self) -> EngineStats {
        EngineStats {
            admissions: self.admissions.load(Ordering::Relaxed),
            removals: self.removals.load(Ordering::Relaxed),
            nice_changes: self.nice_changes.load(Ordering::Relaxed),
            quantum_events: self.quantum_events.load(Ordering::Relaxed),
            demotions: self.demotions.load(Ordering::Relaxed),
            lotteries: self.lotteries.load(Ordering::Relaxed),
            empty_draws: self.empty_draws.load(Ordering::Relaxed),
            wins: self.wins.load(Ordering::Relaxed),
            ticket_boosts: self.ticket_boosts.load(Ordering::Relaxed),
            balance_sweeps: self.balance_sweeps.load(Ordering::Relaxed),
            promotions: self.promotions.load(Ordering::Relaxed),
        }
    }
}

/// Engine statistics snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EngineStats {
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub admissions: u64,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub removals: u64,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub nice_changes: u64,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub quantum_events: u64,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub demotions: u64,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub lotteries: u64,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub empty_draws: u64,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub wins: u64,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub ticket_boosts: u64,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub balance_sweeps: u64,
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub promotions: u64,
}

/// Scheduling view of one endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcStats {
    pub endpoint: Endpoint,
    pub priority: QueueLevel,
    pub max_priority: QueueLevel,
    pub time_slice_micros: u64,
    pub tickets: u32,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_user: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_winner: bool,
}

impl ProcStats {
    pub fn time_slice(&self) -> Duration {
        Duration::from_micros(self.time_slice_micros)
    }
}

/*!
 * Scheduling Engine
 * Hybrid static-priority / lottery scheduling over a fixed process table
 */

use crate::core::config::SchedConfig;
use crate::core::errors::{SchedError, SchedResult};
use crate::core::types::{Endpoint, QueueLevel, Slot};
use crate::dispatch::{Dispatcher, LoggingDispatcher};
use crate::random::{EntropyRng, RandomSource};
use crate::registry::ProcessTable;
use log::info;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

mod admission;
mod balance;
mod clock;
mod lottery;
mod quantum;
mod stats;

pub use admission::{StartMode, StartRequest};
pub use clock::{BalanceClock, ClockCommand};
pub use stats::{AtomicEngineStats, EngineStats, ProcStats};

/// Scheduling policy engine
///
/// Owns the process table, the lottery RNG, the dispatcher handle, and the
/// statistics. Request handling and the rebalance timer both serialize
/// through the table lock, held for the whole of each operation including
/// the in-operation lottery draw and the dispatcher pushes.
pub struct SchedEngine {
    config: SchedConfig,
    table: Arc<RwLock<ProcessTable>>,
    // Locked only while the table guard is held; lock order is table, rng
    rng: Arc<Mutex<Box<dyn RandomSource>>>,
    dispatcher: Arc<dyn Dispatcher>,
    stats: Arc<AtomicEngineStats>,
}

impl SchedEngine {
    /// Create an engine with the default dispatcher and RNG
    pub fn new(config: SchedConfig) -> Self {
        Self::builder().with_config(config).build()
    }

    pub fn builder() -> SchedEngineBuilder {
        SchedEngineBuilder::new()
    }

    pub fn config(&self) -> &SchedConfig {
        &self.config
    }

    /// Get statistics snapshot
    pub fn stats(&self) -> EngineStats {
        self.stats.snapshot()
    }

    /// Number of scheduled entities
    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.read().is_empty()
    }

    /// First winner-level entry in slot order, if any currently holds
    /// the win
    pub fn current_winner(&self) -> Option<Endpoint> {
        let winner_level = self.config.winner_level();
        self.table
            .read()
            .iter_in_use()
            .find(|(_, e)| e.holds_win(winner_level))
            .map(|(_, e)| e.endpoint)
    }

    /// Get per-endpoint scheduling view
    pub fn proc_stats(&self, endpoint: Endpoint) -> Option<ProcStats> {
        let table = self.table.read();
        let slot = table.lookup(endpoint)?;
        Some(self.snapshot_slot(&table, slot))
    }

    /// Get scheduling views for every in-use endpoint, in slot order
    pub fn all_proc_stats(&self) -> Vec<ProcStats> {
        let table = self.table.read();
        table
            .iter_in_use()
            .map(|(slot, _)| self.snapshot_slot(&table, slot))
            .collect()
    }

    fn snapshot_slot(&self, table: &ProcessTable, slot: Slot) -> ProcStats {
        let entry = table.get(slot);
        ProcStats {
            endpoint: entry.endpoint,
            priority: entry.priority,
            max_priority: entry.max_priority,
            time_slice_micros: entry.time_slice.as_micros() as u64,
            tickets: entry.tickets,
            is_user: entry.is_user(),
            is_winner: entry.holds_win(self.config.winner_level()),
        }
    }

    /// Reject levels outside the queue range or on the reserved winner level
    fn validate_level(&self, level: QueueLevel) -> SchedResult<()> {
        if level >= self.config.queue_count {
            return Err(SchedError::InvalidCeiling {
                requested: level,
                queue_count: self.config.queue_count,
            });
        }
        if level == self.config.winner_level() {
            return Err(SchedError::ReservedLevel(level));
        }
        Ok(())
    }

    /// Push one slot's current decision through the dispatcher
    fn dispatch_slot(&self, table: &ProcessTable, slot: Slot) -> SchedResult<()> {
        let entry = table.get(slot);
        self.dispatcher
            .apply(entry.endpoint, entry.priority, entry.time_slice)
            .map_err(|source| SchedError::DispatcherFailure {
                endpoint: entry.endpoint,
                source,
            })
    }
}

impl Clone for SchedEngine {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            table: Arc::clone(&self.table),
            rng: Arc::clone(&self.rng),
            dispatcher: Arc::clone(&self.dispatcher),
            stats: Arc::clone(&self.stats),
        }
    }
}

impl Default for SchedEngine {
    fn default() -> Self {
        Self::new(SchedConfig::default())
    }
}

/// Builder for [`SchedEngine`]
pub struct SchedEngineBuilder {
    config: SchedConfig,
    dispatcher: Option<Arc<dyn Dispatcher>>,
    random: Option<Box<dyn RandomSource>>,
}

impl SchedEngineBuilder {
    pub fn new() -> Self {
        Self {
            config: SchedConfig::default(),
            dispatcher: None,
            random: None,
        }
    }

    pub fn with_config(mut self, config: SchedConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_dispatcher(mut self, dispatcher: Arc<dyn Dispatcher>) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    pub fn with_random(mut self, random: Box<dyn RandomSource>) -> Self {
        self.random = Some(random);
        self
    }

    pub fn build(self) -> SchedEngine {
        let config = self.config.sanitized();

        info!(
            "Scheduling engine initialized: {} queues (baseline {}, winner {}), {:?} user quantum, {} slots",
            config.queue_count,
            config.baseline_user_level(),
            config.winner_level(),
            config.user_quantum,
            config.table_capacity
        );

        SchedEngine {
            table: Arc::new(RwLock::new(ProcessTable::new(config.table_capacity))),
            rng: Arc::new(Mutex::new(
                self.random.unwrap_or_else(|| Box::new(EntropyRng::new())),
            )),
            dispatcher: self
                .dispatcher
                .unwrap_or_else(|| Arc::new(LoggingDispatcher)),
            stats: Arc::new(AtomicEngineStats::new()),
            config,
        }
    }
}

impl Default for SchedEngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

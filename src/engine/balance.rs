/*!
 * Queue Rebalancing
 * Periodic promotion of entries that drifted below their ceiling
 */

use super::SchedEngine;
use log::{debug, warn};

impl SchedEngine {
    /// Promote every in-use entry sitting below its ceiling by one level
    ///
    /// Runs for system and user entries alike; this sweep is the only
    /// promotion path for system processes. Each promoted entry is pushed
    /// through the dispatcher; per-slot dispatch failures are logged and
    /// do not stop the sweep. Returns the number of promotions.
    pub fn balance_queues(&self) -> usize {
        let mut table = self.table.write();
        self.stats.inc_balance_sweeps();

        let mut promoted = 0;
        for slot in 0..table.capacity() {
            let entry = table.get_mut(slot);
            if !entry.in_use() || entry.priority <= entry.max_priority {
                continue;
            }

            entry.priority -= 1;
            let endpoint = entry.endpoint;
            promoted += 1;

            if let Err(e) = self.dispatch_slot(&table, slot) {
                warn!("Rebalance dispatch for endpoint {} failed: {}", endpoint, e);
            }
        }

        if promoted > 0 {
            self.stats.add_promotions(promoted as u64);
            debug!("Rebalance sweep promoted {} entries", promoted);
        }
        promoted
    }
}

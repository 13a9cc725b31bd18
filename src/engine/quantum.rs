/*!
 * Quantum Accounting
 * Out-of-quantum events: demotion, win spending, and blocked-winner boosts
 */

use super::SchedEngine;
use crate::core::errors::{SchedError, SchedResult};
use crate::core::types::Endpoint;
use log::debug;

impl SchedEngine {
    /// Handle a quantum-exhaustion notification for one endpoint
    ///
    /// System entities round-robin downward one level until they reach the
    /// baseline. A user entity holding the win returns to baseline and
    /// spends one ticket; a user entity that ran dry anywhere else means
    /// the winner is blocked, so every baseline user gains a ticket. The
    /// updated decision is pushed through the dispatcher and, if that
    /// succeeds, a fresh draw picks the next winner.
    pub fn on_quantum_exhausted(&self, endpoint: Endpoint) -> SchedResult<Option<Endpoint>> {
        let mut table = self.table.write();
        let slot = table
            .lookup(endpoint)
            .ok_or(SchedError::UnknownEndpoint(endpoint))?;
        self.stats.inc_quantum_events();

        let baseline = self.config.baseline_user_level();
        let winner_level = self.config.winner_level();

        let entry = table.get_mut(slot);
        if !entry.is_user() {
            if entry.priority < baseline {
                entry.priority += 1;
                self.stats.inc_demotions();
                debug!(
                    "Endpoint {} demoted to level {} after running dry",
                    endpoint, entry.priority
                );
            }
        } else if entry.priority == winner_level {
            // The won quantum has been spent
            entry.priority = baseline;
            entry.adjust_tickets(-1);
            debug!(
                "Endpoint {} spent its win, back to baseline with {} tickets",
                endpoint, entry.tickets
            );
        } else {
            // A user ran dry without holding the win: the winner is blocked,
            // reward everyone still waiting at baseline
            let mut boosted = 0;
            for slot in 0..table.capacity() {
                let entry = table.get_mut(slot);
                if entry.is_eligible(baseline) {
                    entry.adjust_tickets(1);
                    boosted += 1;
                }
            }
            self.stats.add_ticket_boosts(boosted);
            debug!(
                "Endpoint {} ran dry below the win; boosted {} baseline entries",
                endpoint, boosted
            );
        }

        self.dispatch_slot(&table, slot)?;
        self.run_lottery_locked(&mut table)
    }
}

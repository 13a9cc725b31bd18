/*!
 * Ticket Lottery
 * Weighted random selection among baseline user processes
 */

use super::SchedEngine;
use crate::core::errors::{SchedError, SchedResult};
use crate::core::types::Endpoint;
use crate::registry::ProcessTable;
use log::{info, trace};

impl SchedEngine {
    /// Hold a lottery among eligible user processes
    ///
    /// Returns the winning endpoint, or `Ok(None)` when no tickets are in
    /// play (an empty draw is a valid steady state, not an error).
    pub fn run_lottery(&self) -> SchedResult<Option<Endpoint>> {
        let mut table = self.table.write();
        self.run_lottery_locked(&mut table)
    }

    /// Draw while already holding the table lock
    ///
    /// Walks the eligible entries in slot order subtracting ticket counts;
    /// the first entry whose count meets the remaining draw wins, so each
    /// entry's chance is proportional to its ticket share. The winner moves
    /// to the winner level with a fresh user quantum and its decision is
    /// pushed through the dispatcher.
    pub(crate) fn run_lottery_locked(
        &self,
        table: &mut ProcessTable,
    ) -> SchedResult<Option<Endpoint>> {
        self.stats.inc_lotteries();

        let baseline = self.config.baseline_user_level();
        let total: u32 = table
            .iter_in_use()
            .filter(|(_, e)| e.is_eligible(baseline))
            .map(|(_, e)| e.tickets)
            .sum();

        if total == 0 {
            self.stats.inc_empty_draws();
            trace!("Lottery held with no tickets in play");
            return Ok(None);
        }

        // Draw in [1, total]
        let lucky = self.rng.lock().next(total) + 1;

        let mut remaining = lucky;
        let mut winner = None;
        for (slot, entry) in table.iter_in_use() {
            if !entry.is_eligible(baseline) {
                continue;
            }
            if remaining <= entry.tickets {
                winner = Some(slot);
                break;
            }
            remaining -= entry.tickets;
        }

        // A positive total guarantees the walk lands on an entry
        let slot = match winner {
            Some(slot) => slot,
            None => unreachable!("draw {} exceeded ticket total {}", lucky, total),
        };

        let winner_level = self.config.winner_level();
        let entry = table.get_mut(slot);
        entry.priority = winner_level;
        entry.time_slice = self.config.user_quantum;
        let endpoint = entry.endpoint;
        let tickets = entry.tickets;

        self.stats.inc_wins();
        info!(
            "Endpoint {} won the lottery with {} of {} tickets",
            endpoint, tickets, total
        );

        self.dispatch_slot(table, slot)?;
        Ok(Some(endpoint))
    }

    /// Adjust an endpoint's ticket count by `delta`, clamped to the legal
    /// range; returns the new count
    pub fn adjust_tickets(&self, endpoint: Endpoint, delta: i32) -> SchedResult<u32> {
        let mut table = self.table.write();
        let slot = table
            .lookup(endpoint)
            .ok_or(SchedError::UnknownEndpoint(endpoint))?;

        let entry = table.get_mut(slot);
        entry.adjust_tickets(delta);
        trace!(
            "Endpoint {} ticket count adjusted by {} to {}",
            endpoint,
            delta,
            entry.tickets
        );
        Ok(entry.tickets)
    }
}

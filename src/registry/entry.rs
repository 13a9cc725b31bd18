/*!
 * Process Table Entries
 * Per-slot scheduling state for schedulable entities
 */

use crate::core::config::{TICKET_MAX, TICKET_MIN};
use crate::core::types::{Endpoint, QueueLevel};
use bitflags::bitflags;
use std::time::Duration;

bitflags! {
    /// Per-slot state flags; a slot with no flags set is free
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct SchedFlags: u8 {
        /// Slot holds a live schedulable entity
        const IN_USE = 1 << 0;
        /// Entity competes in the ticket lottery
        const USER_PROCESS = 1 << 1;
    }
}

/// Scheduling state of one table slot
#[derive(Debug, Clone)]
pub struct ProcEntry {
    pub endpoint: Endpoint,
    /// Creating entity; read only at admission
    pub parent: Endpoint,
    pub flags: SchedFlags,
    /// Current queue level; may sit below the ceiling until rebalanced
    pub priority: QueueLevel,
    /// Best (numerically lowest) level this entry may hold
    pub max_priority: QueueLevel,
    /// Quantum granted at the current level
    pub time_slice: Duration,
    /// Lottery weight, meaningful only for user processes
    pub tickets: u32,
}

impl ProcEntry {
    /// Placeholder state for a free slot
    pub(crate) fn vacant() -> Self {
        Self {
            endpoint: 0,
            parent: 0,
            flags: SchedFlags::empty(),
            priority: 0,
            max_priority: 0,
            time_slice: Duration::ZERO,
            tickets: 0,
        }
    }

    pub fn is_free(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn in_use(&self) -> bool {
        self.flags.contains(SchedFlags::IN_USE)
    }

    pub fn is_user(&self) -> bool {
        self.flags.contains(SchedFlags::USER_PROCESS)
    }

    /// Whether this entry competes in lottery draws at `baseline`
    pub fn is_eligible(&self, baseline: QueueLevel) -> bool {
        self.in_use() && self.is_user() && self.priority == baseline
    }

    /// Whether this entry currently holds the lottery win
    pub fn holds_win(&self, winner_level: QueueLevel) -> bool {
        self.in_use() && self.is_user() && self.priority == winner_level
    }

    /// Adjust the ticket count by `delta`, clamped to the legal range
    pub fn adjust_tickets(&mut self, delta: i32) {
        self.tickets = self
            .tickets
            .saturating_add_signed(delta)
            .clamp(TICKET_MIN, TICKET_MAX);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_entry() -> ProcEntry {
        ProcEntry {
            endpoint: 7,
            parent: 1,
            flags: SchedFlags::IN_USE | SchedFlags::USER_PROCESS,
            priority: 14,
            max_priority: 14,
            time_slice: Duration::from_millis(200),
            tickets: 20,
        }
    }

    #[test]
    fn test_vacant_slot_is_free() {
        let entry = ProcEntry::vacant();
        assert!(entry.is_free());
        assert!(!entry.in_use());
        assert!(!entry.is_eligible(14));
    }

    #[test]
    fn test_eligibility_requires_baseline_level() {
        let mut entry = user_entry();
        assert!(entry.is_eligible(14));

        entry.priority = 13;
        assert!(!entry.is_eligible(14));
        assert!(entry.holds_win(13));
    }

    #[test]
    fn test_eligibility_requires_user_flag() {
        let mut entry = user_entry();
        entry.flags = SchedFlags::IN_USE;
        assert!(!entry.is_eligible(14));
        assert!(!entry.holds_win(13));
    }

    #[test]
    fn test_adjust_tickets_clamps_low() {
        let mut entry = user_entry();
        entry.adjust_tickets(-500);
        assert_eq!(entry.tickets, TICKET_MIN);
    }

    #[test]
    fn test_adjust_tickets_clamps_high() {
        let mut entry = user_entry();
        entry.adjust_tickets(500);
        assert_eq!(entry.tickets, TICKET_MAX);
    }

    #[test]
    fn test_adjust_tickets_plain_delta() {
        let mut entry = user_entry();
        entry.adjust_tickets(-1);
        assert_eq!(entry.tickets, 19);
        entry.adjust_tickets(3);
        assert_eq!(entry.tickets, 22);
    }
}

/*!
 * Admission Operations
 * Start, stop, and re-nice requests from the scheduling client
 */

use super::SchedEngine;
use crate::core::errors::{SchedError, SchedResult};
use crate::core::types::{Endpoint, QueueLevel, Slot};
use crate::registry::{ProcEntry, SchedFlags};
use log::{info, warn};
use std::time::Duration;

/// How a new entity receives its initial priority and quantum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMode {
    /// System entity: level and quantum taken verbatim from the request
    Explicit { quantum: Duration },
    /// User entity: quantum inherited from an already-scheduled parent,
    /// placed at the baseline user level
    Inherit { parent: Endpoint },
}

/// Admission request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StartRequest {
    pub endpoint: Endpoint,
    pub ceiling: QueueLevel,
    pub mode: StartMode,
}

impl SchedEngine {
    /// Admit an entity into the scheduling population
    ///
    /// The slot is claimed first, control is handed over through the
    /// dispatcher, and only then does the entry become schedulable. A
    /// handover refusal leaves the slot free; a failure to push the
    /// initial decision is surfaced but the entity stays scheduled.
    pub fn start_scheduling(&self, request: StartRequest) -> SchedResult<Slot> {
        let mut table = self.table.write();

        self.validate_level(request.ceiling)?;
        if table.lookup(request.endpoint).is_some() {
            return Err(SchedError::AlreadyScheduled(request.endpoint));
        }

        let baseline = self.config.baseline_user_level();
        let (parent, priority, max_priority, time_slice, flags) = match request.mode {
            StartMode::Explicit { quantum } => (
                request.endpoint,
                request.ceiling,
                request.ceiling,
                quantum,
                SchedFlags::IN_USE,
            ),
            StartMode::Inherit { parent } => {
                let parent_slot = table
                    .lookup(parent)
                    .ok_or(SchedError::InvalidParent(parent))?;
                (
                    parent,
                    baseline,
                    baseline,
                    table.get(parent_slot).time_slice,
                    SchedFlags::IN_USE | SchedFlags::USER_PROCESS,
                )
            }
        };

        let slot = table.allocate(ProcEntry {
            endpoint: request.endpoint,
            parent,
            flags: SchedFlags::empty(),
            priority,
            max_priority,
            time_slice,
            tickets: self.config.initial_tickets,
        })?;

        if let Err(source) = self.dispatcher.take_over(request.endpoint) {
            table.release(slot);
            return Err(SchedError::DispatcherFailure {
                endpoint: request.endpoint,
                source,
            });
        }

        table.get_mut(slot).flags = flags;
        self.stats.inc_admissions();
        info!(
            "Endpoint {} admitted at level {} (slot {}, {:?} quantum, {} tickets)",
            request.endpoint, priority, slot, time_slice, self.config.initial_tickets
        );

        self.dispatch_slot(&table, slot)?;
        Ok(slot)
    }

    /// Remove an entity from the scheduling population
    ///
    /// Frees the slot and holds a fresh draw, since the vacated slot may
    /// have held the win.
    pub fn stop_scheduling(&self, endpoint: Endpoint) -> SchedResult<()> {
        let mut table = self.table.write();
        let slot = table
            .lookup(endpoint)
            .ok_or(SchedError::UnknownEndpoint(endpoint))?;

        table.release(slot);
        self.stats.inc_removals();
        info!("Endpoint {} removed from scheduling (slot {})", endpoint, slot);

        self.run_lottery_locked(&mut table)?;
        Ok(())
    }

    /// Move an entity's ceiling and current level to `new_ceiling`
    ///
    /// All-or-nothing: a dispatcher refusal rolls both fields back.
    pub fn change_nice(&self, endpoint: Endpoint, new_ceiling: QueueLevel) -> SchedResult<()> {
        let mut table = self.table.write();
        let slot = table
            .lookup(endpoint)
            .ok_or(SchedError::UnknownEndpoint(endpoint))?;
        self.validate_level(new_ceiling)?;

        let entry = table.get_mut(slot);
        let old_priority = entry.priority;
        let old_ceiling = entry.max_priority;
        entry.priority = new_ceiling;
        entry.max_priority = new_ceiling;

        if let Err(e) = self.dispatch_slot(&table, slot) {
            let entry = table.get_mut(slot);
            entry.priority = old_priority;
            entry.max_priority = old_ceiling;
            warn!(
                "Niceness change for endpoint {} rolled back: {}",
                endpoint, e
            );
            return Err(e);
        }

        self.stats.inc_nice_changes();
        info!(
            "Endpoint {} re-niced from ceiling {} to {}",
            endpoint, old_ceiling, new_ceiling
        );
        Ok(())
    }
}

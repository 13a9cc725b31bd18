/*!
 * Process Table
 * Fixed-capacity slot arena for schedulable entities
 */

use crate::core::errors::{SchedError, SchedResult};
use crate::core::types::{Endpoint, Slot};
use log::trace;

mod entry;

pub use entry::{ProcEntry, SchedFlags};

/// Fixed-capacity table of scheduling entries
///
/// Slots are addressed by index and scanned linearly; the table never
/// resizes. A slot whose flags are empty is free.
pub struct ProcessTable {
    slots: Vec<ProcEntry>,
}

impl ProcessTable {
    /// Create a table with a fixed number of slots
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| ProcEntry::vacant()).collect(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of in-use slots
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|e| e.in_use()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve an endpoint to its slot
    pub fn lookup(&self, endpoint: Endpoint) -> Option<Slot> {
        self.slots
            .iter()
            .position(|e| e.in_use() && e.endpoint == endpoint)
    }

    /// Store an entry in the first free slot
    ///
    /// The caller decides when the entry becomes schedulable by setting
    /// its flags; `allocate` only claims the slot.
    pub fn allocate(&mut self, entry: ProcEntry) -> SchedResult<Slot> {
        let slot = self
            .slots
            .iter()
            .position(|e| e.is_free())
            .ok_or(SchedError::TableFull(self.slots.len()))?;

        trace!("Slot {} claimed for endpoint {}", slot, entry.endpoint);
        self.slots[slot] = entry;
        Ok(slot)
    }

    /// Free a slot; the entry is immediately excluded from scheduling
    pub fn release(&mut self, slot: Slot) {
        trace!("Slot {} released", slot);
        self.slots[slot].flags = SchedFlags::empty();
    }

    pub fn get(&self, slot: Slot) -> &ProcEntry {
        &self.slots[slot]
    }

    pub fn get_mut(&mut self, slot: Slot) -> &mut ProcEntry {
        &mut self.slots[slot]
    }

    /// Iterate in-use entries in slot order
    pub fn iter_in_use(&self) -> impl Iterator<Item = (Slot, &ProcEntry)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, e)| e.in_use())
    }
}

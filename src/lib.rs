/*!
 * schedd Library
 * Hybrid static-priority / lottery scheduling engine exposed as a library
 */

pub mod core;
pub mod dispatch;
pub mod engine;
pub mod random;
pub mod registry;
pub mod telemetry;

// Re-exports
pub use crate::core::{
    Endpoint, QueueLevel, SchedConfig, SchedError, SchedResult, Slot, TICKET_MAX, TICKET_MIN,
};
pub use dispatch::{DispatchError, Dispatcher, LoggingDispatcher};
pub use engine::{
    AtomicEngineStats, BalanceClock, ClockCommand, EngineStats, ProcStats, SchedEngine,
    SchedEngineBuilder, StartMode, StartRequest,
};
pub use random::{EntropyRng, RandomSource};
pub use registry::{ProcEntry, ProcessTable, SchedFlags};
pub use telemetry::init_tracing;

/*!
 * Core Module
 * Fundamental engine types, errors, and configuration
 */

pub mod config;
pub mod errors;
pub mod serde;
pub mod types;

// Re-export for convenience
pub use config::{SchedConfig, TICKET_MAX, TICKET_MIN};
pub use errors::{SchedError, SchedResult};
pub use types::{Endpoint, QueueLevel, Slot};

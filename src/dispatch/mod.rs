/*!
 * Dispatch Boundary
 * Pushes scheduling decisions to the execution substrate
 */

use crate::core::types::{Endpoint, QueueLevel};
use log::debug;
use std::time::Duration;
use thiserror::Error;

/// Substrate dispatch errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Substrate refused control handover: {0}")]
    HandoverRefused(String),

    #[error("Substrate rejected scheduling decision: {0}")]
    DecisionRejected(String),
}

/// Execution substrate adapter
///
/// The engine is the source of truth for scheduling state; the substrate
/// receives decisions through this trait and failures are reported upward,
/// never retried.
pub trait Dispatcher: Send + Sync {
    /// Place the entity under this scheduler's control (admission handshake)
    fn take_over(&self, endpoint: Endpoint) -> Result<(), DispatchError>;

    /// Push a (priority, quantum) decision for one entity
    fn apply(
        &self,
        endpoint: Endpoint,
        priority: QueueLevel,
        time_slice: Duration,
    ) -> Result<(), DispatchError>;
}

/// Default dispatcher when no substrate is wired: logs and accepts
/// every decision
pub struct LoggingDispatcher;

impl Dispatcher for LoggingDispatcher {
    fn take_over(&self, endpoint: Endpoint) -> Result<(), DispatchError> {
        debug!("Taking over scheduling control of endpoint {}", endpoint);
        Ok(())
    }

    fn apply(
        &self,
        endpoint: Endpoint,
        priority: QueueLevel,
        time_slice: Duration,
    ) -> Result<(), DispatchError> {
        debug!(
            "Dispatching endpoint {} at level {} with {:?} quantum",
            endpoint, priority, time_slice
        );
        Ok(())
    }
}

/*!
 * Scheduling Errors
 * Rejection and substrate-failure kinds for engine operations
 */

use super::types::{Endpoint, QueueLevel};
use crate::dispatch::DispatchError;
use thiserror::Error;

/// Scheduling operation result
pub type SchedResult<T> = Result<T, SchedError>;

/// Scheduling errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedError {
    #[error("Unknown endpoint: {0}")]
    UnknownEndpoint(Endpoint),

    #[error("Parent endpoint not scheduled: {0}")]
    InvalidParent(Endpoint),

    #[error("Priority ceiling {requested} out of range: queue count is {queue_count}")]
    InvalidCeiling { requested: QueueLevel, queue_count: u8 },

    #[error("Level {0} is reserved for the lottery winner")]
    ReservedLevel(QueueLevel),

    #[error("Endpoint already scheduled: {0}")]
    AlreadyScheduled(Endpoint),

    #[error("Process table full: all {0} slots in use")]
    TableFull(usize),

    #[error("Dispatcher failed for endpoint {endpoint}: {source}")]
    DispatcherFailure {
        endpoint: Endpoint,
        #[source]
        source: DispatchError,
    },
}

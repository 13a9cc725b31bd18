/*!
 * Core Types
 * Common types used across the scheduling engine
 */

/// External execution-context handle of a schedulable entity
pub type Endpoint = u32;

/// Index of an entry in the process table
pub type Slot = usize;

/// Priority queue level (lower value = higher scheduling precedence)
pub type QueueLevel = u8;

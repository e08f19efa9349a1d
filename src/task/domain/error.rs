//! Error types for task domain validation and parsing.

use super::{TaskId, TaskStatus};
use thiserror::Error;

/// Errors returned while constructing or transitioning domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The bounty is empty after trimming.
    #[error("task bounty must not be empty")]
    EmptyBounty,

    /// The bounty is not a positive amount with an optional denomination.
    #[error("invalid bounty '{0}', expected a positive amount such as 100 or 100microSERVDR")]
    InvalidBounty(String),

    /// The requested state transition is not allowed.
    #[error("invalid state transition for task {task_id}: {from} -> {to}")]
    InvalidStateTransition {
        /// Task identifier.
        task_id: TaskId,
        /// Current task status.
        from: TaskStatus,
        /// Requested target status.
        to: TaskStatus,
    },

    /// A task record carries a claim its status does not allow, or lacks
    /// one its status requires.
    #[error("task {task_id} in status {status} has an inconsistent claim")]
    InconsistentClaim {
        /// Task identifier.
        task_id: TaskId,
        /// Recorded task status.
        status: TaskStatus,
    },
}

/// Error returned while parsing task statuses from text.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

//! Identifier types for the task domain.

use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque identifier of a bounty task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Wraps a caller-supplied identifier.
    ///
    /// No validation is applied; unknown identifiers simply fail lookup.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Issues `task-{unix_seconds}-{sequence}` identifiers.
///
/// The sequence is shared by every id the generator hands out, so two tasks
/// created within the same second still receive distinct ids.
#[derive(Debug, Default)]
pub struct TaskIdGenerator {
    sequence: AtomicU64,
}

impl TaskIdGenerator {
    /// Creates a generator starting at sequence 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sequence: AtomicU64::new(0),
        }
    }

    /// Returns the next identifier.
    pub fn next_id(&self, clock: &impl Clock) -> TaskId {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        TaskId(format!("task-{}-{sequence}", clock.utc().timestamp()))
    }
}

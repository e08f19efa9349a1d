//! Task aggregate root and its lifecycle status.

use super::{Bounty, ParseTaskStatusError, TaskDomainError, TaskId};
use crate::address::Address;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
///
/// Tasks move strictly forward: `Open` → `Claimed` → `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Task is posted and waiting for a claimer.
    Open,
    /// A claimer has submitted proof of completion.
    Claimed,
    /// An admin approved the claim and the bounty was released.
    Completed,
}

impl TaskStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Open, Self::Claimed, Self::Completed];

    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Claimed => "CLAIMED",
            Self::Completed => "COMPLETED",
        }
    }

    /// Returns `true` when the lifecycle permits moving to `target`.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Open, Self::Claimed) | (Self::Claimed, Self::Completed)
        )
    }

    /// Returns `true` for the terminal status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "OPEN" => Ok(Self::Open),
            "CLAIMED" => Ok(Self::Claimed),
            "COMPLETED" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Claimer and proof recorded when a task is claimed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskClaim {
    claimer: Address,
    proof: String,
}

impl TaskClaim {
    /// Returns the claimer address.
    #[must_use]
    pub const fn claimer(&self) -> &Address {
        &self.claimer
    }

    /// Returns the claimant-supplied proof, which may be empty.
    #[must_use]
    pub fn proof(&self) -> &str {
        &self.proof
    }
}

/// Validated fields of a task about to be posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Identifier assigned by the lifecycle service.
    pub id: TaskId,
    /// Short task title, non-empty.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Address of the poster.
    pub creator: Address,
    /// Locked reward.
    pub bounty: Bounty,
}

/// Task aggregate root.
///
/// `id`, `creator` and `bounty` are fixed at creation. The claim is absent
/// exactly while the task is open and is never replaced once recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord")]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    creator: Address,
    bounty: Bounty,
    status: TaskStatus,
    #[serde(flatten)]
    claim: Option<TaskClaim>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Unchecked wire shape of a [`Task`].
#[derive(Deserialize)]
struct TaskRecord {
    id: TaskId,
    title: String,
    description: String,
    creator: Address,
    bounty: Bounty,
    status: TaskStatus,
    #[serde(flatten)]
    claim: Option<TaskClaim>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskDomainError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let TaskRecord {
            id,
            title,
            description,
            creator,
            bounty,
            status,
            claim,
            created_at,
            updated_at,
        } = record;

        if claim.is_some() == (status == TaskStatus::Open) {
            return Err(TaskDomainError::InconsistentClaim {
                task_id: id,
                status,
            });
        }
        Ok(Self {
            id,
            title,
            description,
            creator,
            bounty,
            status,
            claim,
            created_at,
            updated_at,
        })
    }
}

impl Task {
    /// Creates an open task.
    #[must_use]
    pub fn open(new_task: NewTask, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        let NewTask {
            id,
            title,
            description,
            creator,
            bounty,
        } = new_task;

        Self {
            id,
            title,
            description,
            creator,
            bounty,
            status: TaskStatus::Open,
            claim: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Returns the task title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the poster's address.
    #[must_use]
    pub const fn creator(&self) -> &Address {
        &self.creator
    }

    /// Returns the locked bounty.
    #[must_use]
    pub const fn bounty(&self) -> &Bounty {
        &self.bounty
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the recorded claim, if any.
    #[must_use]
    pub const fn claim(&self) -> Option<&TaskClaim> {
        self.claim.as_ref()
    }

    /// Returns the claimer address, if the task has been claimed.
    #[must_use]
    pub fn claimer(&self) -> Option<&Address> {
        self.claim.as_ref().map(TaskClaim::claimer)
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Checks that the task can move to `target` without changing it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] when the lifecycle
    /// does not allow the move.
    pub fn ensure_can_transition_to(&self, target: TaskStatus) -> Result<(), TaskDomainError> {
        if self.status.can_transition_to(target) {
            return Ok(());
        }
        Err(self.transition_error(target))
    }

    /// Returns the claim a completion would pay out to.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// claimed.
    pub fn pending_payout(&self) -> Result<&TaskClaim, TaskDomainError> {
        self.ensure_can_transition_to(TaskStatus::Completed)?;
        self.claim
            .as_ref()
            .ok_or_else(|| self.transition_error(TaskStatus::Completed))
    }

    /// Records a claim and moves the task to [`TaskStatus::Claimed`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// open. The task is left untouched on error.
    pub fn claim_by(
        &mut self,
        claimer: Address,
        proof: impl Into<String>,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        self.ensure_can_transition_to(TaskStatus::Claimed)?;
        self.claim = Some(TaskClaim {
            claimer,
            proof: proof.into(),
        });
        self.status = TaskStatus::Claimed;
        self.touch(clock);
        Ok(())
    }

    /// Moves a claimed task to [`TaskStatus::Completed`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] unless the task is
    /// claimed. The task is left untouched on error.
    pub fn complete(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.ensure_can_transition_to(TaskStatus::Completed)?;
        self.status = TaskStatus::Completed;
        self.touch(clock);
        Ok(())
    }

    fn transition_error(&self, target: TaskStatus) -> TaskDomainError {
        TaskDomainError::InvalidStateTransition {
            task_id: self.id.clone(),
            from: self.status,
            to: target,
        }
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

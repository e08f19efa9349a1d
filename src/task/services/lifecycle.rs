//! Service layer for posting, claiming and approving bounty tasks.

use super::locks::{SettlementReservation, TaskLocks};
use crate::address::Address;
use crate::admin::AdminRegistry;
use crate::error::ErrorKind;
use crate::settlement::ports::{SettlementError, SettlementGateway};
use crate::task::{
    domain::{Bounty, NewTask, Task, TaskDomainError, TaskId, TaskIdGenerator, TaskStatus},
    ports::{TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinError;

/// Request payload for posting a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: String,
    creator: String,
    bounty: String,
}

impl CreateTaskRequest {
    /// Creates a request with the required task fields.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        creator: impl Into<String>,
        bounty: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            creator: creator.into(),
            bounty: bounty.into(),
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Request payload for claiming an open task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimTaskRequest {
    task_id: TaskId,
    claimer: String,
    proof: String,
}

impl ClaimTaskRequest {
    /// Creates a claim with an empty proof.
    #[must_use]
    pub fn new(task_id: TaskId, claimer: impl Into<String>) -> Self {
        Self {
            task_id,
            claimer: claimer.into(),
            proof: String::new(),
        }
    }

    /// Sets the proof of completion.
    #[must_use]
    pub fn with_proof(mut self, proof: impl Into<String>) -> Self {
        self.proof = proof.into();
        self
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation or a state-machine guard failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The address is not accepted by the settlement gateway.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    NotFound(TaskId),
    /// The approver is not an admin.
    #[error("{0} is not authorized to approve tasks")]
    Unauthorized(String),
    /// Another approval of the task is already settling.
    #[error("settlement for task {0} is already in progress")]
    SettlementInProgress(TaskId),
    /// The settlement gateway failed; no state was committed.
    #[error(transparent)]
    Settlement(#[from] SettlementError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// The background settlement of an approval panicked or was aborted.
    #[error("approval settlement did not finish: {0}")]
    SettlementAborted(#[from] JoinError),
}

impl TaskLifecycleError {
    /// Returns the taxonomy category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(
                TaskDomainError::EmptyTitle
                | TaskDomainError::EmptyBounty
                | TaskDomainError::InvalidBounty(_),
            ) => ErrorKind::InvalidInput,
            Self::Domain(TaskDomainError::InvalidStateTransition { .. })
            | Self::SettlementInProgress(_) => ErrorKind::InvalidTransition,
            Self::Domain(TaskDomainError::InconsistentClaim { .. })
            | Self::SettlementAborted(_) => ErrorKind::Internal,
            Self::InvalidAddress(_) => ErrorKind::InvalidAddress,
            Self::NotFound(_) | Self::Repository(TaskRepositoryError::NotFound(_)) => {
                ErrorKind::NotFound
            }
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Settlement(_) => ErrorKind::SettlementFailure,
            Self::Repository(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Transitions on one task are serialized by a per-task lock that is held
/// only while reading and committing the record, never across a settlement
/// call. Approval reserves the task before releasing its bounty, so a
/// concurrent approval observes an invalid transition instead of paying
/// out twice. The release and the completion run on a spawned task, so a
/// caller that gives up waiting cannot separate them.
pub struct TaskLifecycleService<R, G, C>
where
    R: TaskRepository,
    G: SettlementGateway + ?Sized,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    gateway: Arc<G>,
    admins: Arc<AdminRegistry>,
    clock: Arc<C>,
    ids: Arc<TaskIdGenerator>,
    locks: Arc<TaskLocks>,
}

impl<R, G, C> Clone for TaskLifecycleService<R, G, C>
where
    R: TaskRepository,
    G: SettlementGateway + ?Sized,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            gateway: Arc::clone(&self.gateway),
            admins: Arc::clone(&self.admins),
            clock: Arc::clone(&self.clock),
            ids: Arc::clone(&self.ids),
            locks: Arc::clone(&self.locks),
        }
    }
}

impl<R, G, C> TaskLifecycleService<R, G, C>
where
    R: TaskRepository,
    G: SettlementGateway + ?Sized,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub fn new(
        repository: Arc<R>,
        gateway: Arc<G>,
        admins: Arc<AdminRegistry>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            repository,
            gateway,
            admins,
            clock,
            ids: Arc::new(TaskIdGenerator::new()),
            locks: Arc::new(TaskLocks::default()),
        }
    }

    /// Posts a new open task after locking its bounty.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Domain`] when the title or bounty is
    /// invalid, [`TaskLifecycleError::InvalidAddress`] when the creator is
    /// not accepted, or [`TaskLifecycleError::Settlement`] when the bounty
    /// cannot be locked. No task is stored on any of these paths.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let CreateTaskRequest {
            title,
            description,
            creator,
            bounty,
        } = request;

        let trimmed_title = title.trim();
        if trimmed_title.is_empty() {
            return Err(TaskDomainError::EmptyTitle.into());
        }
        let parsed_bounty = Bounty::parse(bounty)?;
        let creator_address = self.accepted_address(&creator).await?;

        let task = Task::open(
            NewTask {
                id: self.ids.next_id(&*self.clock),
                title: trimmed_title.to_owned(),
                description,
                creator: creator_address,
                bounty: parsed_bounty,
            },
            &*self.clock,
        );

        if let Err(err) = self
            .gateway
            .lock_bounty(task.id(), task.creator(), task.bounty())
            .await
        {
            tracing::warn!(
                task_id = %task.id(),
                creator = %task.creator(),
                error = %err,
                "Bounty lock failed; task not created"
            );
            return Err(err.into());
        }

        if let Err(err) = self.repository.store(&task).await {
            tracing::error!(task_id = %task.id(), error = %err, "Storing task failed; refunding bounty");
            if let Err(refund_err) = self
                .gateway
                .release_bounty(task.id(), task.creator(), task.bounty())
                .await
            {
                tracing::error!(
                    task_id = %task.id(),
                    error = %refund_err,
                    "Refunding bounty of unstored task failed"
                );
            }
            return Err(err.into());
        }

        tracing::info!(
            task_id = %task.id(),
            creator = %task.creator(),
            bounty = %task.bounty(),
            "Created task"
        );
        Ok(task)
    }

    /// Claims an open task.
    ///
    /// An empty proof is accepted. When several claims race, exactly one
    /// commits; the others observe an invalid transition.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::NotFound`] for unknown tasks,
    /// [`TaskLifecycleError::Domain`] when the task is not open, or
    /// [`TaskLifecycleError::InvalidAddress`] when the claimer is not
    /// accepted.
    pub async fn claim_task(&self, request: ClaimTaskRequest) -> TaskLifecycleResult<Task> {
        let ClaimTaskRequest {
            task_id,
            claimer,
            proof,
        } = request;

        self.find_or_not_found(&task_id)
            .await?
            .ensure_can_transition_to(TaskStatus::Claimed)?;
        let claimer_address = self.accepted_address(&claimer).await?;

        let _transition = self.locks.acquire(&task_id).await;
        let mut task = self.find_or_not_found(&task_id).await?;
        task.claim_by(claimer_address, proof, &*self.clock)?;
        self.repository.update(&task).await?;

        tracing::info!(task_id = %task_id, claimer = %claimer, "Claimed task");
        Ok(task)
    }

    /// Approves a claimed task and releases its bounty to the claimer.
    ///
    /// The task is marked completed only after the release succeeds; a
    /// failed release leaves it claimed so approval can be retried. When the
    /// release succeeded but the completion could not be stored, a retry
    /// records the completion without paying out again.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Unauthorized`] when `approver` is not an
    /// admin, [`TaskLifecycleError::NotFound`] for unknown tasks,
    /// [`TaskLifecycleError::Domain`] or
    /// [`TaskLifecycleError::SettlementInProgress`] when the task cannot be
    /// completed, [`TaskLifecycleError::Settlement`] when the release
    /// fails, or [`TaskLifecycleError::SettlementAborted`] when the spawned
    /// settlement does not run to completion.
    pub async fn approve_task(&self, task_id: &TaskId, approver: &str) -> TaskLifecycleResult<Task>
    where
        R: 'static,
        G: 'static,
        C: 'static,
    {
        if !self.admins.is_admin(approver) {
            tracing::warn!(task_id = %task_id, approver, "Rejected approval from non-admin");
            return Err(TaskLifecycleError::Unauthorized(approver.to_owned()));
        }

        let (claimed, reservation) = {
            let _transition = self.locks.acquire(task_id).await;
            let task = self.find_or_not_found(task_id).await?;
            task.pending_payout()?;
            let reservation = self
                .locks
                .reserve_settlement(task_id)
                .ok_or_else(|| TaskLifecycleError::SettlementInProgress(task_id.clone()))?;
            (task, reservation)
        };

        let service = self.clone();
        let settlement =
            tokio::spawn(async move { service.settle_approval(claimed, reservation).await });
        let task = settlement.await??;

        tracing::info!(
            task_id = %task_id,
            approver,
            claimer = ?task.claimer().map(Address::as_str),
            "Approved task"
        );
        Ok(task)
    }

    /// Returns tasks, optionally restricted to one status.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when lookup fails.
    pub async fn list_tasks(&self, status: Option<TaskStatus>) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.list(status).await?)
    }

    /// Finds a task by identifier.
    ///
    /// Returns `Ok(None)` when no task has the identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when lookup fails.
    pub async fn find_by_id(&self, task_id: &TaskId) -> TaskLifecycleResult<Option<Task>> {
        Ok(self.repository.find_by_id(task_id).await?)
    }

    async fn settle_approval(
        &self,
        claimed: Task,
        reservation: SettlementReservation,
    ) -> TaskLifecycleResult<Task> {
        let task_id = claimed.id();
        let payout = claimed.pending_payout()?;

        if self.locks.is_released(task_id) {
            tracing::info!(task_id = %task_id, "Bounty already released; recording completion");
        } else {
            if let Err(err) = self
                .gateway
                .release_bounty(task_id, payout.claimer(), claimed.bounty())
                .await
            {
                tracing::warn!(task_id = %task_id, error = %err, "Bounty release failed; task stays claimed");
                return Err(err.into());
            }
            self.locks.record_release(task_id);
        }

        let _transition = self.locks.acquire(task_id).await;
        let mut task = self.find_or_not_found(task_id).await?;
        task.complete(&*self.clock)?;
        if let Err(err) = self.repository.update(&task).await {
            tracing::error!(
                task_id = %task_id,
                error = %err,
                "Bounty released but completion was not recorded; a retry records it"
            );
            return Err(err.into());
        }
        self.locks.clear_release(task_id);
        drop(reservation);
        Ok(task)
    }

    async fn find_or_not_found(&self, task_id: &TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or_else(|| TaskLifecycleError::NotFound(task_id.clone()))
    }

    async fn accepted_address(&self, raw: &str) -> TaskLifecycleResult<Address> {
        let address =
            Address::new(raw).map_err(|_| TaskLifecycleError::InvalidAddress(raw.to_owned()))?;
        if !self.gateway.validate_address(address.as_str()).await {
            return Err(TaskLifecycleError::InvalidAddress(raw.to_owned()));
        }
        Ok(address)
    }
}

//! Ledger gateway port for locking and releasing bounties.

use crate::address::Address;
use crate::task::domain::{Bounty, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for settlement gateway operations.
pub type SettlementResult<T> = Result<T, SettlementError>;

/// Settlement contract consumed by the task lifecycle.
///
/// Every call may fail and may be slow; callers must not hold task locks
/// across these calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettlementGateway: Send + Sync {
    /// Moves `bounty` from `payer` into escrow for `task_id`.
    async fn lock_bounty(
        &self,
        task_id: &TaskId,
        payer: &Address,
        bounty: &Bounty,
    ) -> SettlementResult<()>;

    /// Pays the escrowed `bounty` for `task_id` out to `payee`.
    async fn release_bounty(
        &self,
        task_id: &TaskId,
        payee: &Address,
        bounty: &Bounty,
    ) -> SettlementResult<()>;

    /// Returns `true` when the ledger accepts `address`.
    async fn validate_address(&self, address: &str) -> bool;

    /// Returns the spendable balance of `address` in the ledger's unit.
    async fn balance(&self, address: &Address) -> SettlementResult<u128>;

    /// Returns the escrow account holding locked bounties.
    fn escrow_address(&self) -> String;
}

/// Errors returned by settlement gateway adapters.
#[derive(Debug, Clone, Error)]
pub enum SettlementError {
    /// The ledger refused the request.
    #[error("settlement rejected: {0}")]
    Rejected(String),

    /// No bounty is held in escrow for the task.
    #[error("no escrowed bounty for task {0}")]
    NoEscrow(TaskId),

    /// A bounty is already held in escrow for the task.
    #[error("bounty for task {0} is already escrowed")]
    AlreadyEscrowed(TaskId),

    /// The ledger could not be reached or answered unintelligibly.
    #[error("settlement transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl SettlementError {
    /// Wraps a transport-level error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}

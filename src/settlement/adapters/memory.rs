//! In-memory escrow ledger.

use crate::address::{Address, AddressRegistry};
use crate::settlement::ports::{SettlementError, SettlementGateway, SettlementResult};
use crate::task::domain::{Bounty, TaskId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockWriteGuard};
use std::time::Duration;

/// Escrow account reported by the in-memory ledger.
pub const IN_MEMORY_ESCROW_ADDRESS: &str = "serv1escrow000000000000000000000000000000";

/// A bounty paid out of escrow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payout {
    /// Task whose bounty was released.
    pub task_id: TaskId,
    /// Receiving address.
    pub payee: Address,
    /// Released amount.
    pub amount: u128,
}

/// In-memory settlement gateway.
///
/// Address validation is delegated to the shared [`AddressRegistry`].
/// Every account starts at the configured balance; locks debit the payer
/// and releases credit the payee. No transfer leaves the process.
#[derive(Debug, Clone)]
pub struct InMemorySettlementGateway {
    addresses: Arc<AddressRegistry>,
    initial_balance: u128,
    latency: Option<Duration>,
    state: Arc<RwLock<LedgerState>>,
}

#[derive(Debug, Default)]
struct LedgerState {
    escrow: HashMap<TaskId, EscrowEntry>,
    balances: HashMap<Address, u128>,
    payouts: Vec<Payout>,
    fail_locks: Option<String>,
    fail_releases: Option<String>,
}

#[derive(Debug, Clone)]
struct EscrowEntry {
    amount: u128,
}

impl InMemorySettlementGateway {
    /// Creates a ledger validating addresses against `addresses`.
    #[must_use]
    pub fn new(addresses: Arc<AddressRegistry>, initial_balance: u128) -> Self {
        Self {
            addresses,
            initial_balance,
            latency: None,
            state: Arc::new(RwLock::new(LedgerState::default())),
        }
    }

    /// Delays every lock and release by `latency`, standing in for a
    /// network round trip.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Makes subsequent locks fail with `reason`, or succeed again on `None`.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn set_lock_failure(&self, reason: Option<String>) -> SettlementResult<()> {
        self.write()?.fail_locks = reason;
        Ok(())
    }

    /// Makes subsequent releases fail with `reason`, or succeed again on
    /// `None`.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn set_release_failure(&self, reason: Option<String>) -> SettlementResult<()> {
        self.write()?.fail_releases = reason;
        Ok(())
    }

    /// Returns the amount held in escrow for `task_id`, if any.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn escrowed(&self, task_id: &TaskId) -> SettlementResult<Option<u128>> {
        let state = self
            .state
            .read()
            .map_err(|err| SettlementError::transport(std::io::Error::other(err.to_string())))?;
        Ok(state.escrow.get(task_id).map(|entry| entry.amount))
    }

    /// Returns every payout made so far, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn payouts(&self) -> SettlementResult<Vec<Payout>> {
        let state = self
            .state
            .read()
            .map_err(|err| SettlementError::transport(std::io::Error::other(err.to_string())))?;
        Ok(state.payouts.clone())
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn write(&self) -> SettlementResult<RwLockWriteGuard<'_, LedgerState>> {
        self.state
            .write()
            .map_err(|err| SettlementError::transport(std::io::Error::other(err.to_string())))
    }
}

#[async_trait]
impl SettlementGateway for InMemorySettlementGateway {
    async fn lock_bounty(
        &self,
        task_id: &TaskId,
        payer: &Address,
        bounty: &Bounty,
    ) -> SettlementResult<()> {
        self.simulate_latency().await;
        let mut state = self.write()?;
        if let Some(reason) = state.fail_locks.clone() {
            return Err(SettlementError::Rejected(reason));
        }
        if state.escrow.contains_key(task_id) {
            return Err(SettlementError::AlreadyEscrowed(task_id.clone()));
        }

        let initial_balance = self.initial_balance;
        let balance = state
            .balances
            .entry(payer.clone())
            .or_insert(initial_balance);
        let Some(remaining) = balance.checked_sub(bounty.amount()) else {
            return Err(SettlementError::Rejected(format!(
                "insufficient funds: {payer} holds {balance}, bounty is {}",
                bounty.amount()
            )));
        };
        *balance = remaining;
        state.escrow.insert(
            task_id.clone(),
            EscrowEntry {
                amount: bounty.amount(),
            },
        );
        tracing::debug!(
            task_id = %task_id,
            payer = %payer,
            bounty = %bounty,
            "Locked bounty in escrow"
        );
        Ok(())
    }

    async fn release_bounty(
        &self,
        task_id: &TaskId,
        payee: &Address,
        bounty: &Bounty,
    ) -> SettlementResult<()> {
        self.simulate_latency().await;
        let mut state = self.write()?;
        if let Some(reason) = state.fail_releases.clone() {
            return Err(SettlementError::Rejected(reason));
        }
        let entry = state
            .escrow
            .remove(task_id)
            .ok_or_else(|| SettlementError::NoEscrow(task_id.clone()))?;

        let initial_balance = self.initial_balance;
        let balance = state
            .balances
            .entry(payee.clone())
            .or_insert(initial_balance);
        *balance = balance.saturating_add(entry.amount);
        state.payouts.push(Payout {
            task_id: task_id.clone(),
            payee: payee.clone(),
            amount: entry.amount,
        });
        tracing::debug!(
            task_id = %task_id,
            payee = %payee,
            bounty = %bounty,
            "Released bounty from escrow"
        );
        Ok(())
    }

    async fn validate_address(&self, address: &str) -> bool {
        self.addresses.is_valid(address)
    }

    async fn balance(&self, address: &Address) -> SettlementResult<u128> {
        let state = self
            .state
            .read()
            .map_err(|err| SettlementError::transport(std::io::Error::other(err.to_string())))?;
        Ok(state
            .balances
            .get(address)
            .copied()
            .unwrap_or(self.initial_balance))
    }

    fn escrow_address(&self) -> String {
        IN_MEMORY_ESCROW_ADDRESS.to_owned()
    }
}

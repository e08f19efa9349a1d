//! Command surface consumed by an HTTP or CLI front end.
//!
//! [`BountyBoard`] owns every registry and service of one board instance.
//! Identities passed as `approver` or `requestor` are opaque address strings
//! asserted by the caller; the board does not authenticate them.

use crate::address::{Address, AddressRegistry};
use crate::admin::{AdminError, AdminRegistry};
use crate::config::{BoardConfig, SettlementBackend};
use crate::error::BountyError;
use crate::settlement::adapters::{InMemorySettlementGateway, RestSettlementGateway};
use crate::settlement::ports::SettlementGateway;
use crate::task::{
    adapters::memory::InMemoryTaskRepository,
    domain::{Task, TaskId, TaskStatus},
    services::{ClaimTaskRequest, CreateTaskRequest, TaskLifecycleError, TaskLifecycleService},
};
use mockable::DefaultClock;
use std::sync::Arc;

type BoardLifecycle =
    TaskLifecycleService<InMemoryTaskRepository, dyn SettlementGateway, DefaultClock>;

/// Result type for board commands.
pub type BoardResult<T> = Result<T, BountyError>;

/// One isolated bounty board.
pub struct BountyBoard {
    addresses: Arc<AddressRegistry>,
    admins: Arc<AdminRegistry>,
    admin_address: Address,
    gateway: Arc<dyn SettlementGateway>,
    lifecycle: BoardLifecycle,
}

impl BountyBoard {
    /// Creates a board with default configuration and an in-memory ledger.
    ///
    /// # Errors
    ///
    /// Returns [`BountyError::Address`] when the default admin seed cannot
    /// be derived.
    pub fn in_memory() -> BoardResult<Self> {
        Self::from_config(&BoardConfig::default())
    }

    /// Creates a board from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`BountyError::Address`] when the admin seed cannot be
    /// derived, or [`BountyError::Settlement`] when the REST client cannot
    /// be built.
    pub fn from_config(config: &BoardConfig) -> BoardResult<Self> {
        let addresses = Arc::new(AddressRegistry::new(config.address_policy));
        let gateway: Arc<dyn SettlementGateway> = match &config.settlement {
            SettlementBackend::InMemory => Arc::new(InMemorySettlementGateway::new(
                Arc::clone(&addresses),
                config.initial_balance,
            )),
            SettlementBackend::Rest(rest) => Arc::new(RestSettlementGateway::new(rest.clone())?),
        };
        Self::with_gateway(addresses, &config.admin_seed, gateway)
    }

    /// Creates a board around an existing address registry and gateway.
    ///
    /// The admin derived from `admin_seed` is the only initial admin.
    ///
    /// # Errors
    ///
    /// Returns [`BountyError::Address`] when `admin_seed` is empty.
    pub fn with_gateway(
        addresses: Arc<AddressRegistry>,
        admin_seed: &str,
        gateway: Arc<dyn SettlementGateway>,
    ) -> BoardResult<Self> {
        let admin_address = addresses.derive(admin_seed)?;
        let admins = Arc::new(AdminRegistry::seeded(admin_address.clone()));
        let lifecycle = TaskLifecycleService::new(
            Arc::new(InMemoryTaskRepository::new()),
            Arc::clone(&gateway),
            Arc::clone(&admins),
            Arc::new(DefaultClock),
        );
        Ok(Self {
            addresses,
            admins,
            admin_address,
            gateway,
            lifecycle,
        })
    }

    /// Posts a task and locks its bounty from `creator`.
    ///
    /// # Errors
    ///
    /// Fails with an invalid-input, invalid-address or settlement error; no
    /// task exists afterwards in any of those cases.
    pub async fn create_task(
        &self,
        title: &str,
        description: &str,
        creator: &str,
        bounty: &str,
    ) -> BoardResult<Task> {
        let request = CreateTaskRequest::new(title, creator, bounty).with_description(description);
        Ok(self.lifecycle.create_task(request).await?)
    }

    /// Claims an open task for `claimer`.
    ///
    /// # Errors
    ///
    /// Fails with a not-found, invalid-transition or invalid-address error.
    pub async fn claim_task(&self, task_id: &str, claimer: &str, proof: &str) -> BoardResult<Task> {
        let request = ClaimTaskRequest::new(TaskId::new(task_id), claimer).with_proof(proof);
        Ok(self.lifecycle.claim_task(request).await?)
    }

    /// Approves a claimed task and pays its bounty to the claimer.
    ///
    /// # Errors
    ///
    /// Fails with an unauthorized, not-found, invalid-transition or
    /// settlement error.
    pub async fn approve_task(&self, task_id: &str, approver: &str) -> BoardResult<Task> {
        Ok(self
            .lifecycle
            .approve_task(&TaskId::new(task_id), approver)
            .await?)
    }

    /// Lists tasks, optionally filtered by a status name such as `"OPEN"`.
    ///
    /// # Errors
    ///
    /// Returns [`BountyError::Status`] for an unknown status name.
    pub async fn list_tasks(&self, status: Option<&str>) -> BoardResult<Vec<Task>> {
        let filter = status.map(TaskStatus::try_from).transpose()?;
        Ok(self.lifecycle.list_tasks(filter).await?)
    }

    /// Returns one task.
    ///
    /// # Errors
    ///
    /// Returns a not-found error when no task has the identifier.
    pub async fn get_task(&self, task_id: &str) -> BoardResult<Task> {
        let id = TaskId::new(task_id);
        self.lifecycle
            .find_by_id(&id)
            .await?
            .ok_or_else(|| TaskLifecycleError::NotFound(id).into())
    }

    /// Adds `address` to the admin set on behalf of `requestor`.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Unauthorized`] when `requestor` is not an admin,
    /// or [`BountyError::InvalidAddress`] when `address` is not accepted.
    pub async fn add_admin(&self, address: &str, requestor: &str) -> BoardResult<()> {
        if !self.admins.is_admin(requestor) {
            tracing::warn!(requestor, "Rejected admin addition from non-admin");
            return Err(AdminError::Unauthorized(requestor.to_owned()).into());
        }
        let new_admin = self.accepted_address(address).await?;
        self.admins.add_admin(new_admin, requestor)?;
        Ok(())
    }

    /// Removes `address` from the admin set on behalf of `requestor`.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::Unauthorized`] or
    /// [`AdminError::LastAdminProtected`].
    pub fn remove_admin(&self, address: &str, requestor: &str) -> BoardResult<()> {
        Ok(self.admins.remove_admin(address, requestor)?)
    }

    /// Returns `true` when `address` is an admin.
    #[must_use]
    pub fn is_admin(&self, address: &str) -> bool {
        self.admins.is_admin(address)
    }

    /// Returns the sorted admin set.
    #[must_use]
    pub fn list_admins(&self) -> Vec<Address> {
        self.admins.admins()
    }

    /// Returns the admin seeded when the board was created.
    #[must_use]
    pub const fn admin_address(&self) -> &Address {
        &self.admin_address
    }

    /// Returns `true` when the settlement gateway accepts `address`.
    pub async fn validate_address(&self, address: &str) -> bool {
        self.gateway.validate_address(address).await
    }

    /// Derives the address for `seed` and remembers it.
    ///
    /// # Errors
    ///
    /// Returns [`BountyError::Address`] when `seed` is empty.
    pub fn derive_address(&self, seed: &str) -> BoardResult<Address> {
        Ok(self.addresses.derive(seed)?)
    }

    /// Returns every address derived or registered on this board.
    #[must_use]
    pub fn list_addresses(&self) -> Vec<Address> {
        self.addresses.addresses()
    }

    /// Returns the ledger balance of `address`.
    ///
    /// # Errors
    ///
    /// Returns [`BountyError::InvalidAddress`] for a blank address, or
    /// [`BountyError::Settlement`] when the ledger query fails.
    pub async fn balance(&self, address: &str) -> BoardResult<u128> {
        let account =
            Address::new(address).map_err(|_| BountyError::InvalidAddress(address.to_owned()))?;
        Ok(self.gateway.balance(&account).await?)
    }

    /// Returns the escrow account holding locked bounties.
    #[must_use]
    pub fn escrow_address(&self) -> String {
        self.gateway.escrow_address()
    }

    async fn accepted_address(&self, raw: &str) -> BoardResult<Address> {
        let address =
            Address::new(raw).map_err(|_| BountyError::InvalidAddress(raw.to_owned()))?;
        if !self.gateway.validate_address(address.as_str()).await {
            return Err(BountyError::InvalidAddress(raw.to_owned()));
        }
        Ok(address)
    }
}

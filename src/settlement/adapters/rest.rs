//! REST client for an external ledger.
//!
//! Lock and release requests are posted as JSON transfer messages; balances
//! are read from the bank module's balance endpoint. Signing and broadcast
//! are the ledger service's business, not this client's.

use crate::address::{Address, is_well_formed};
use crate::settlement::ports::{SettlementError, SettlementGateway, SettlementResult};
use crate::task::domain::{Bounty, TaskId};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings for [`RestSettlementGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestSettlementConfig {
    /// Base URL of the ledger REST API.
    pub endpoint: Url,
    /// Denomination used when a bounty carries none.
    pub denom: String,
    /// Escrow account receiving locked bounties.
    pub escrow_address: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Settlement gateway backed by a ledger REST API.
#[derive(Debug, Clone)]
pub struct RestSettlementGateway {
    client: Client,
    config: RestSettlementConfig,
}

#[derive(Debug, Serialize)]
struct TransferRequest<'a> {
    task_id: &'a str,
    from_address: &'a str,
    to_address: &'a str,
    amount: [Coin<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Coin<'a> {
    denom: &'a str,
    amount: String,
}

#[derive(Debug, Deserialize)]
struct BalancesResponse {
    balances: Vec<BalanceEntry>,
}

#[derive(Debug, Deserialize)]
struct BalanceEntry {
    denom: String,
    amount: String,
}

impl RestSettlementGateway {
    /// Creates a client for the configured ledger.
    ///
    /// # Errors
    ///
    /// Returns [`SettlementError::Rejected`] when the endpoint cannot serve
    /// as a base URL, or a transport error when the HTTP client cannot be
    /// built.
    pub fn new(config: RestSettlementConfig) -> SettlementResult<Self> {
        if config.endpoint.cannot_be_a_base() {
            return Err(SettlementError::Rejected(format!(
                "ledger endpoint {} cannot be used as a base URL",
                config.endpoint
            )));
        }
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(SettlementError::transport)?;
        Ok(Self { client, config })
    }

    /// Builds `{endpoint}/{segments…}`.
    fn url(&self, segments: &[&str]) -> SettlementResult<Url> {
        let mut url = self.config.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| {
                SettlementError::Rejected(format!(
                    "ledger endpoint {} cannot be used as a base URL",
                    self.config.endpoint
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn submit_transfer(
        &self,
        url: Url,
        request: &TransferRequest<'_>,
    ) -> SettlementResult<()> {
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(SettlementError::transport)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(SettlementError::Rejected(format!(
            "ledger answered {status}: {body}"
        )))
    }

    fn denom_for<'a>(&'a self, bounty: &'a Bounty) -> &'a str {
        bounty.denom().unwrap_or(&self.config.denom)
    }
}

/// Picks the amount held in `denom`, treating a missing entry as zero.
fn amount_in_denom(response: &BalancesResponse, denom: &str) -> SettlementResult<u128> {
    response
        .balances
        .iter()
        .find(|entry| entry.denom == denom)
        .map_or(Ok(0), |entry| {
            entry.amount.parse::<u128>().map_err(|err| {
                SettlementError::Rejected(format!(
                    "ledger reported unparsable amount '{}': {err}",
                    entry.amount
                ))
            })
        })
}

#[async_trait]
impl SettlementGateway for RestSettlementGateway {
    async fn lock_bounty(
        &self,
        task_id: &TaskId,
        payer: &Address,
        bounty: &Bounty,
    ) -> SettlementResult<()> {
        let request = TransferRequest {
            task_id: task_id.as_str(),
            from_address: payer.as_str(),
            to_address: &self.config.escrow_address,
            amount: [Coin {
                denom: self.denom_for(bounty),
                amount: bounty.amount().to_string(),
            }],
        };
        self.submit_transfer(self.url(&["escrow", "lock"])?, &request)
            .await?;
        tracing::info!(task_id = %task_id, payer = %payer, bounty = %bounty, "Ledger locked bounty");
        Ok(())
    }

    async fn release_bounty(
        &self,
        task_id: &TaskId,
        payee: &Address,
        bounty: &Bounty,
    ) -> SettlementResult<()> {
        let request = TransferRequest {
            task_id: task_id.as_str(),
            from_address: &self.config.escrow_address,
            to_address: payee.as_str(),
            amount: [Coin {
                denom: self.denom_for(bounty),
                amount: bounty.amount().to_string(),
            }],
        };
        self.submit_transfer(self.url(&["escrow", "release"])?, &request)
            .await?;
        tracing::info!(task_id = %task_id, payee = %payee, bounty = %bounty, "Ledger released bounty");
        Ok(())
    }

    async fn validate_address(&self, address: &str) -> bool {
        is_well_formed(address)
    }

    async fn balance(&self, address: &Address) -> SettlementResult<u128> {
        let url = self.url(&["cosmos", "bank", "v1beta1", "balances", address.as_str()])?;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(SettlementError::transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SettlementError::Rejected(format!(
                "balance query for {address} answered {status}"
            )));
        }
        let parsed: BalancesResponse = response.json().await.map_err(SettlementError::transport)?;
        amount_in_denom(&parsed, &self.config.denom)
    }

    fn escrow_address(&self) -> String {
        self.config.escrow_address.clone()
    }
}

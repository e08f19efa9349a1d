//! Board configuration.
//!
//! Configuration can be set via environment variables:
//! - `BOUNTY_ADMIN_SEED` - Optional. Seed of the admin present at startup. Defaults to `admin-1`.
//! - `BOUNTY_ADDRESS_POLICY` - Optional. `recognised` or `syntactic`. Defaults to `recognised`.
//! - `BOUNTY_SETTLEMENT` - Optional. `memory` or `rest`. Defaults to `memory`.
//! - `BOUNTY_REST_ENDPOINT` - Required when `BOUNTY_SETTLEMENT=rest`. Ledger REST base URL.
//! - `BOUNTY_ESCROW_ADDRESS` - Optional. Escrow account used by the REST ledger.
//! - `BOUNTY_DENOM` - Optional. Settlement denomination. Defaults to `microSERVDR`.
//! - `BOUNTY_INITIAL_BALANCE` - Optional. Starting balance of in-memory accounts. Defaults to `1000000`.
//! - `BOUNTY_REQUEST_TIMEOUT_SECS` - Optional. REST request timeout. Defaults to `30`.

use crate::address::AddressPolicy;
use crate::settlement::adapters::{IN_MEMORY_ESCROW_ADDRESS, RestSettlementConfig};
use reqwest::Url;
use std::time::Duration;
use thiserror::Error;

const ADMIN_SEED: &str = "BOUNTY_ADMIN_SEED";
const ADDRESS_POLICY: &str = "BOUNTY_ADDRESS_POLICY";
const SETTLEMENT: &str = "BOUNTY_SETTLEMENT";
const REST_ENDPOINT: &str = "BOUNTY_REST_ENDPOINT";
const ESCROW_ADDRESS: &str = "BOUNTY_ESCROW_ADDRESS";
const DENOM: &str = "BOUNTY_DENOM";
const INITIAL_BALANCE: &str = "BOUNTY_INITIAL_BALANCE";
const REQUEST_TIMEOUT_SECS: &str = "BOUNTY_REQUEST_TIMEOUT_SECS";

/// Default seed of the admin present at startup.
pub const DEFAULT_ADMIN_SEED: &str = "admin-1";
/// Default settlement denomination.
pub const DEFAULT_DENOM: &str = "microSERVDR";
/// Default starting balance of in-memory accounts.
pub const DEFAULT_INITIAL_BALANCE: u128 = 1_000_000;
/// Default REST request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors raised while reading configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A variable required by the selected options is not set.
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// A variable is set to an unusable value.
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Settlement gateway selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SettlementBackend {
    /// In-process escrow ledger.
    #[default]
    InMemory,
    /// External ledger reached over REST.
    Rest(RestSettlementConfig),
}

/// Configuration of a [`crate::board::BountyBoard`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// Seed of the admin present at startup.
    pub admin_seed: String,
    /// How addresses are validated by the in-memory ledger.
    pub address_policy: AddressPolicy,
    /// Settlement gateway to use.
    pub settlement: SettlementBackend,
    /// Starting balance of in-memory accounts.
    pub initial_balance: u128,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            admin_seed: DEFAULT_ADMIN_SEED.to_owned(),
            address_policy: AddressPolicy::default(),
            settlement: SettlementBackend::default(),
            initial_balance: DEFAULT_INITIAL_BALANCE,
        }
    }
}

impl BoardConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// See [`BoardConfig::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through `lookup`, which returns the value of a
    /// variable by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a variable cannot be
    /// parsed, or [`ConfigError::MissingEnvVar`] when the REST backend is
    /// selected without an endpoint.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let admin_seed = match lookup(ADMIN_SEED) {
            Some(seed) if seed.trim().is_empty() => {
                return Err(invalid(ADMIN_SEED, "seed must not be empty"));
            }
            Some(seed) => seed,
            None => DEFAULT_ADMIN_SEED.to_owned(),
        };

        let address_policy = lookup(ADDRESS_POLICY)
            .map(|raw| AddressPolicy::try_from(raw.as_str()))
            .transpose()
            .map_err(|err| invalid(ADDRESS_POLICY, err))?
            .unwrap_or_default();

        let initial_balance = lookup(INITIAL_BALANCE)
            .map(|raw| raw.trim().parse::<u128>())
            .transpose()
            .map_err(|err| invalid(INITIAL_BALANCE, err))?
            .unwrap_or(DEFAULT_INITIAL_BALANCE);

        let settlement = match lookup(SETTLEMENT)
            .as_deref()
            .map(str::trim)
            .map(str::to_ascii_lowercase)
            .as_deref()
        {
            None | Some("memory") => SettlementBackend::InMemory,
            Some("rest") => SettlementBackend::Rest(rest_config(&lookup)?),
            Some(other) => {
                return Err(invalid(
                    SETTLEMENT,
                    format!("unknown backend '{other}', expected memory or rest"),
                ));
            }
        };

        Ok(Self {
            admin_seed,
            address_policy,
            settlement,
            initial_balance,
        })
    }
}

fn rest_config(lookup: &impl Fn(&str) -> Option<String>) -> Result<RestSettlementConfig, ConfigError> {
    let raw_endpoint =
        lookup(REST_ENDPOINT).ok_or_else(|| ConfigError::MissingEnvVar(REST_ENDPOINT.to_owned()))?;
    let endpoint = Url::parse(raw_endpoint.trim()).map_err(|err| invalid(REST_ENDPOINT, err))?;

    let timeout = lookup(REQUEST_TIMEOUT_SECS)
        .map(|raw| raw.trim().parse::<u64>())
        .transpose()
        .map_err(|err| invalid(REQUEST_TIMEOUT_SECS, err))?
        .map_or(DEFAULT_REQUEST_TIMEOUT, Duration::from_secs);

    Ok(RestSettlementConfig {
        endpoint,
        denom: lookup(DENOM).unwrap_or_else(|| DEFAULT_DENOM.to_owned()),
        escrow_address: lookup(ESCROW_ADDRESS)
            .unwrap_or_else(|| IN_MEMORY_ESCROW_ADDRESS.to_owned()),
        timeout,
    })
}

fn invalid(name: &str, reason: impl ToString) -> ConfigError {
    ConfigError::InvalidValue(name.to_owned(), reason.to_string())
}

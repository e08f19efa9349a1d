//! Seed-based address derivation and recognition.

use super::{ADDRESS_PAYLOAD_LEN, Address, AddressError, value::is_well_formed};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::sync::{PoisonError, RwLock};
use thiserror::Error;

/// Rule deciding which addresses the registry accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AddressPolicy {
    /// Well-formed addresses that were derived or registered as fixtures.
    #[default]
    Recognised,
    /// Any well-formed address.
    Syntactic,
}

impl AddressPolicy {
    /// Returns the canonical configuration representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Recognised => "recognised",
            Self::Syntactic => "syntactic",
        }
    }
}

impl fmt::Display for AddressPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned while parsing an address policy.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown address policy: {0}")]
pub struct ParseAddressPolicyError(pub String);

impl TryFrom<&str> for AddressPolicy {
    type Error = ParseAddressPolicyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "recognised" | "recognized" => Ok(Self::Recognised),
            "syntactic" => Ok(Self::Syntactic),
            _ => Err(ParseAddressPolicyError(value.to_owned())),
        }
    }
}

/// Derives the address for a seed without recording it.
///
/// The seed is hashed into a 32-byte key and the key is hashed again; the
/// first 20 bytes of the second digest form the bech32 payload.
///
/// # Errors
///
/// Returns [`AddressError::EmptySeed`] when the seed is empty after trimming.
pub fn derive_address(seed: &str) -> Result<Address, AddressError> {
    if seed.trim().is_empty() {
        return Err(AddressError::EmptySeed);
    }
    let key = Sha256::digest(seed.as_bytes());
    let digest = Sha256::digest(key);
    let payload = digest
        .as_slice()
        .first_chunk::<ADDRESS_PAYLOAD_LEN>()
        .ok_or_else(|| AddressError::Encoding("digest shorter than payload".to_owned()))?;
    Address::encode(payload)
}

/// Registry of addresses this process recognises.
///
/// Stands in for a real chain: derived addresses remember their seed,
/// fixture addresses are recorded without one.
#[derive(Debug, Default)]
pub struct AddressRegistry {
    policy: AddressPolicy,
    known: RwLock<HashMap<Address, Option<String>>>,
}

impl AddressRegistry {
    /// Creates an empty registry with the given acceptance policy.
    #[must_use]
    pub fn new(policy: AddressPolicy) -> Self {
        Self {
            policy,
            known: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the acceptance policy.
    #[must_use]
    pub const fn policy(&self) -> AddressPolicy {
        self.policy
    }

    /// Derives the address for `seed` and records it as recognised.
    ///
    /// Deriving the same seed twice yields the same address.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::EmptySeed`] when the seed is empty.
    pub fn derive(&self, seed: &str) -> Result<Address, AddressError> {
        let address = derive_address(seed)?;
        let mut known = self.known.write().unwrap_or_else(PoisonError::into_inner);
        known.insert(address.clone(), Some(seed.to_owned()));
        tracing::debug!(address = %address, "Derived address from seed");
        Ok(address)
    }

    /// Records a well-formed address as recognised without a seed.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::Malformed`] when the address does not follow
    /// the `serv1…` format.
    pub fn register_fixture(&self, address: &str) -> Result<Address, AddressError> {
        let parsed = Address::new(address)?;
        if !parsed.is_well_formed() {
            return Err(AddressError::Malformed(address.to_owned()));
        }
        let mut known = self.known.write().unwrap_or_else(PoisonError::into_inner);
        known.entry(parsed.clone()).or_insert(None);
        Ok(parsed)
    }

    /// Returns `true` when the address was derived or registered here.
    #[must_use]
    pub fn is_recognised(&self, address: &str) -> bool {
        self.known
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(address)
    }

    /// Decides whether an address is usable under the registry policy.
    #[must_use]
    pub fn is_valid(&self, address: &str) -> bool {
        if !is_well_formed(address) {
            return false;
        }
        match self.policy {
            AddressPolicy::Syntactic => true,
            AddressPolicy::Recognised => self.is_recognised(address),
        }
    }

    /// Returns the seed an address was derived from, if any.
    #[must_use]
    pub fn seed_for(&self, address: &str) -> Option<String> {
        self.known
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(address)
            .cloned()
            .flatten()
    }

    /// Returns every recognised address in sorted order.
    #[must_use]
    pub fn addresses(&self) -> Vec<Address> {
        let mut addresses: Vec<Address> = self
            .known
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        addresses.sort();
        addresses
    }
}

//! The address value type and its wire format.

use super::AddressError;
use bech32::{Bech32, Hrp};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::RangeInclusive;

/// Prefix every well-formed address starts with.
pub const ADDRESS_PREFIX: &str = "serv1";

/// Accepted character length of a well-formed address.
pub const ADDRESS_LENGTH: RangeInclusive<usize> = 39..=44;

/// Human-readable part of the bech32 encoding.
const ADDRESS_HRP: &str = "serv";

/// Number of payload bytes carried by an address.
pub(crate) const ADDRESS_PAYLOAD_LEN: usize = 20;

/// Opaque settlement address.
///
/// Construction only rejects empty or whitespace-bearing strings. Whether an
/// address is usable in task operations is decided by the settlement
/// gateway, not by this type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Creates an address from caller-supplied text.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::EmptyAddress`] when the value is empty after
    /// trimming, or [`AddressError::Malformed`] when it contains interior
    /// whitespace.
    pub fn new(value: impl Into<String>) -> Result<Self, AddressError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(AddressError::EmptyAddress);
        }
        if normalized.chars().any(char::is_whitespace) {
            return Err(AddressError::Malformed(raw));
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Encodes a derived payload into a `serv1…` address.
    pub(crate) fn encode(payload: &[u8; ADDRESS_PAYLOAD_LEN]) -> Result<Self, AddressError> {
        let hrp = Hrp::parse(ADDRESS_HRP).map_err(|err| AddressError::Encoding(err.to_string()))?;
        let encoded = bech32::encode::<Bech32>(hrp, payload)
            .map_err(|err| AddressError::Encoding(err.to_string()))?;
        Ok(Self(encoded))
    }

    /// Returns `true` when the address follows the `serv1…` bech32 format.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        is_well_formed(&self.0)
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Checks the syntactic address format: `serv1` prefix, 39 to 44
/// characters, a valid bech32 checksum and a 20-byte payload.
#[must_use]
pub fn is_well_formed(address: &str) -> bool {
    if !address.starts_with(ADDRESS_PREFIX) || !ADDRESS_LENGTH.contains(&address.len()) {
        return false;
    }
    bech32::decode(address).is_ok_and(|(hrp, payload)| {
        hrp.as_str() == ADDRESS_HRP && payload.len() == ADDRESS_PAYLOAD_LEN
    })
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Borrow<str> for Address {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for Address {
    type Error = AddressError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

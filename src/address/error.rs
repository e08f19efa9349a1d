//! Error types for address derivation and parsing.

use thiserror::Error;

/// Errors returned while deriving or parsing settlement addresses.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressError {
    /// The derivation seed is empty after trimming.
    #[error("address seed must not be empty")]
    EmptySeed,

    /// The address is empty after trimming.
    #[error("address must not be empty")]
    EmptyAddress,

    /// The address does not follow the `serv1…` bech32 format.
    #[error("malformed address '{0}', expected a bech32 address starting with 'serv1'")]
    Malformed(String),

    /// Encoding the derived payload failed.
    #[error("failed to encode address: {0}")]
    Encoding(String),
}

//! Crate-level error taxonomy.
//!
//! Module errors stay specific; [`ErrorKind`] collapses them into the
//! categories an outer transport maps onto status codes.

use crate::address::AddressError;
use crate::admin::AdminError;
use crate::config::ConfigError;
use crate::settlement::ports::SettlementError;
use crate::task::domain::ParseTaskStatusError;
use crate::task::services::TaskLifecycleError;
use std::fmt;
use thiserror::Error;

/// Category of a failed command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or missing required fields.
    InvalidInput,
    /// The address failed validation.
    InvalidAddress,
    /// Unknown task identifier.
    NotFound,
    /// A state-machine guard failed, including lost races.
    InvalidTransition,
    /// A non-admin attempted a gated action.
    Unauthorized,
    /// The command would empty the admin set.
    LastAdminProtected,
    /// The settlement gateway failed.
    SettlementFailure,
    /// Storage or configuration failure outside the command's control.
    Internal,
}

impl ErrorKind {
    /// Returns the HTTP status code a transport should answer with.
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidInput | Self::InvalidAddress | Self::InvalidTransition => 400,
            Self::Unauthorized => 403,
            Self::NotFound => 404,
            Self::LastAdminProtected => 409,
            Self::SettlementFailure => 502,
            Self::Internal => 500,
        }
    }

    /// Returns a stable machine-readable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::InvalidAddress => "invalid_address",
            Self::NotFound => "not_found",
            Self::InvalidTransition => "invalid_transition",
            Self::Unauthorized => "unauthorized",
            Self::LastAdminProtected => "last_admin_protected",
            Self::SettlementFailure => "settlement_failure",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by the [`crate::board::BountyBoard`] command surface.
#[derive(Debug, Error)]
pub enum BountyError {
    /// Task lifecycle command failed.
    #[error(transparent)]
    Task(#[from] TaskLifecycleError),
    /// Admin governance command failed.
    #[error(transparent)]
    Admin(#[from] AdminError),
    /// Address derivation or parsing failed.
    #[error(transparent)]
    Address(#[from] AddressError),
    /// Settlement gateway call failed.
    #[error(transparent)]
    Settlement(#[from] SettlementError),
    /// Board configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A status filter could not be parsed.
    #[error(transparent)]
    Status(#[from] ParseTaskStatusError),
    /// The address is not accepted by the settlement gateway.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

impl BountyError {
    /// Returns the taxonomy category of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Task(err) => err.kind(),
            Self::Admin(AdminError::Unauthorized(_)) => ErrorKind::Unauthorized,
            Self::Admin(AdminError::LastAdminProtected(_)) => ErrorKind::LastAdminProtected,
            Self::Address(AddressError::EmptySeed) | Self::Status(_) => ErrorKind::InvalidInput,
            Self::Address(AddressError::EmptyAddress | AddressError::Malformed(_))
            | Self::InvalidAddress(_) => ErrorKind::InvalidAddress,
            Self::Address(AddressError::Encoding(_)) | Self::Config(_) => ErrorKind::Internal,
            Self::Settlement(_) => ErrorKind::SettlementFailure,
        }
    }
}

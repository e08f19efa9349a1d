//! Error types for admin-set governance.

use crate::address::Address;
use thiserror::Error;

/// Result type for admin registry operations.
pub type AdminResult<T> = Result<T, AdminError>;

/// Errors returned by admin registry mutations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AdminError {
    /// The requestor is not a member of the admin set.
    #[error("{0} is not an admin")]
    Unauthorized(String),

    /// Removing the target would leave the admin set empty.
    #[error("cannot remove {0}: it is the last remaining admin")]
    LastAdminProtected(Address),
}

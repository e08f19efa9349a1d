//! Admin-set governance.
//!
//! The [`AdminRegistry`] authorizes task approval and admin management. It
//! is seeded with exactly one admin at construction and refuses to remove
//! the last remaining member, so governance can never lock itself out.

mod error;
mod registry;

pub use error::{AdminError, AdminResult};
pub use registry::AdminRegistry;

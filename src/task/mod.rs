//! Bounty task lifecycle.
//!
//! Tasks are posted with a locked bounty, claimed by a contributor and
//! completed when an admin approves the claim and the bounty is released.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

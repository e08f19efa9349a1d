//! Adapter implementations for the settlement gateway port.

mod memory;
mod rest;

pub use memory::{IN_MEMORY_ESCROW_ADDRESS, InMemorySettlementGateway, Payout};
pub use rest::{RestSettlementConfig, RestSettlementGateway};

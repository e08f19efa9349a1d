//! Port contracts for bounty settlement.

pub mod gateway;

#[cfg(test)]
pub use gateway::MockSettlementGateway;
pub use gateway::{SettlementError, SettlementGateway, SettlementResult};

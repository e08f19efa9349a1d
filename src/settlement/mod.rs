//! Bounty settlement behind a pluggable ledger gateway.
//!
//! The lifecycle core only calls the [`ports::SettlementGateway`] port. The
//! in-memory adapter keeps an escrow ledger for local runs and tests; the
//! REST adapter forwards lock and release requests to a ledger API.

pub mod adapters;
pub mod ports;

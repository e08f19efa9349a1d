//! Bounty board: post tasks with escrowed bounties, claim them and pay out
//! on admin approval.
//!
//! A task moves strictly forward from `OPEN` to `CLAIMED` to `COMPLETED`.
//! Posting locks the bounty in escrow before the task is stored; approval
//! releases it to the claimer before the task is marked completed. A small
//! admin set, seeded with one admin at startup, gates approval.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory, REST)
//!
//! # Modules
//!
//! - [`address`]: Address derivation and validation
//! - [`admin`]: Lock-protected admin set
//! - [`task`]: Task state machine and lifecycle service
//! - [`settlement`]: Escrow gateway port and its adapters
//! - [`board`]: Command surface tying the pieces together
//! - [`config`]: Environment-driven configuration
//! - [`error`]: Crate-level error taxonomy

pub mod address;
pub mod admin;
pub mod board;
pub mod config;
pub mod error;
pub mod settlement;
pub mod task;

pub use board::{BoardResult, BountyBoard};
pub use error::{BountyError, ErrorKind};

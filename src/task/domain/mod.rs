//! Domain model for bounty tasks.
//!
//! The task domain models posting, claiming and completing a bounty-backed
//! unit of work. Transitions are validated here; authorization, settlement
//! and concurrency live in the service layer.

mod bounty;
mod error;
mod ids;
mod task;

pub use bounty::Bounty;
pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::{TaskId, TaskIdGenerator};
pub use task::{NewTask, Task, TaskClaim, TaskStatus};

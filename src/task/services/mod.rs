//! Application services for task lifecycle orchestration.

mod lifecycle;
mod locks;

pub use lifecycle::{
    ClaimTaskRequest, CreateTaskRequest, TaskLifecycleError, TaskLifecycleResult,
    TaskLifecycleService,
};

//! Shared world state for bounty task lifecycle BDD scenarios.

use bounty_board::address::Address;
use bounty_board::task::domain::Task;
use bounty_board::{BountyBoard, BountyError, ErrorKind};
use rstest::fixture;

/// Scenario world for bounty lifecycle behaviour tests.
pub struct BountyWorld {
    /// Board under test.
    pub board: BountyBoard,
    /// Task the scenario is working on.
    pub current_task: Option<Task>,
    /// Error kind of the last failed command.
    pub last_error: Option<ErrorKind>,
    /// Addresses produced by the last derivation step.
    pub derived: Vec<Address>,
}

impl BountyWorld {
    /// Creates a world around a fresh in-memory board.
    ///
    /// # Panics
    ///
    /// Panics if the default board cannot be built.
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: BountyBoard::in_memory().expect("default board should build"),
            current_task: None,
            last_error: None,
            derived: Vec::new(),
        }
    }

    /// Returns the recognised address for a named participant.
    ///
    /// # Errors
    ///
    /// Returns an error if the name cannot be derived.
    pub fn address(&self, name: &str) -> Result<Address, BountyError> {
        self.board.derive_address(name)
    }

    /// Returns the identifier of the current task.
    ///
    /// # Errors
    ///
    /// Returns an error if no task has been posted yet.
    pub fn task_id(&self) -> Result<String, eyre::Report> {
        self.current_task
            .as_ref()
            .map(|task| task.id().as_str().to_owned())
            .ok_or_else(|| eyre::eyre!("missing current task in scenario world"))
    }

    /// Records the outcome of a task command.
    pub fn record(&mut self, result: Result<Task, BountyError>) {
        match result {
            Ok(task) => {
                self.current_task = Some(task);
                self.last_error = None;
            }
            Err(err) => self.last_error = Some(err.kind()),
        }
    }
}

impl Default for BountyWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BountyWorld {
    BountyWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

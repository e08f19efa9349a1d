//! Shared fixtures for in-memory board integration tests.

use bounty_board::BountyBoard;
use bounty_board::address::{Address, AddressPolicy, AddressRegistry};
use bounty_board::settlement::adapters::InMemorySettlementGateway;
use rstest::fixture;
use std::sync::Arc;
use std::time::Duration;

/// Starting balance of every in-memory account.
pub const INITIAL_BALANCE: u128 = 1_000_000;

/// A board wired to an in-memory ledger the test can inspect.
pub struct BoardHarness {
    /// Board under test.
    pub board: Arc<BountyBoard>,
    /// Ledger backing the board.
    pub ledger: Arc<InMemorySettlementGateway>,
    /// Recognised address used to post tasks.
    pub creator: Address,
    /// Recognised address used to claim tasks.
    pub worker: Address,
}

impl BoardHarness {
    /// Builds a harness whose ledger sleeps for `latency` on every transfer.
    ///
    /// # Panics
    ///
    /// Panics if the fixed seeds cannot be derived.
    #[must_use]
    pub fn with_latency(latency: Option<Duration>) -> Self {
        let addresses = Arc::new(AddressRegistry::new(AddressPolicy::Recognised));
        let instant = InMemorySettlementGateway::new(Arc::clone(&addresses), INITIAL_BALANCE);
        let ledger = Arc::new(match latency {
            Some(delay) => instant.with_latency(delay),
            None => instant,
        });
        let board = BountyBoard::with_gateway(Arc::clone(&addresses), "admin-1", ledger.clone())
            .expect("board should build");
        let creator = board.derive_address("creator").expect("seed should derive");
        let worker = board.derive_address("worker").expect("seed should derive");
        Self {
            board: Arc::new(board),
            ledger,
            creator,
            worker,
        }
    }

    /// Returns the seeded admin address as a string.
    #[must_use]
    pub fn admin(&self) -> String {
        self.board.admin_address().as_str().to_owned()
    }

    /// Posts a 100-unit task from the harness creator.
    ///
    /// # Panics
    ///
    /// Panics if the task cannot be created.
    pub async fn post_task(&self, title: &str) -> String {
        self.board
            .create_task(title, "", self.creator.as_str(), "100")
            .await
            .expect("task creation should succeed")
            .id()
            .as_str()
            .to_owned()
    }
}

/// Provides a board with an instant in-memory ledger.
#[fixture]
pub fn harness() -> BoardHarness {
    BoardHarness::with_latency(None)
}

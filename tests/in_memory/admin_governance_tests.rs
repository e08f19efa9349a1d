//! In-memory integration tests for admin governance and address commands.

use super::helpers::{BoardHarness, harness};
use bounty_board::ErrorKind;
use bounty_board::address::{ADDRESS_PREFIX, derive_address};
use bounty_board::settlement::adapters::IN_MEMORY_ESCROW_ADDRESS;
use eyre::ensure;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn admin_can_add_and_remove_admins(harness: BoardHarness) -> eyre::Result<()> {
    let board = &harness.board;
    let admin = harness.admin();

    board.add_admin(harness.worker.as_str(), &admin).await?;
    board.add_admin(harness.worker.as_str(), &admin).await?;
    ensure!(board.is_admin(harness.worker.as_str()));
    ensure!(board.list_admins().len() == 2);

    board.remove_admin(&admin, harness.worker.as_str())?;
    ensure!(!board.is_admin(&admin));
    ensure!(board.list_admins() == vec![harness.worker.clone()]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn non_admin_cannot_manage_admins(harness: BoardHarness) -> eyre::Result<()> {
    let board = &harness.board;

    let added = board
        .add_admin(harness.worker.as_str(), harness.creator.as_str())
        .await;
    let removed = board.remove_admin(&harness.admin(), harness.creator.as_str());

    ensure!(added.map_err(|err| err.kind()).err() == Some(ErrorKind::Unauthorized));
    ensure!(removed.map_err(|err| err.kind()).err() == Some(ErrorKind::Unauthorized));
    ensure!(board.list_admins().len() == 1);
    Ok(())
}

#[rstest]
fn last_admin_cannot_be_removed(harness: BoardHarness) {
    let admin = harness.admin();

    let result = harness.board.remove_admin(&admin, &admin);

    assert_eq!(
        result.map_err(|err| err.kind()).err(),
        Some(ErrorKind::LastAdminProtected)
    );
    assert!(harness.board.is_admin(&admin));
}

#[rstest]
fn removing_a_non_member_is_a_no_op(harness: BoardHarness) {
    let admin = harness.admin();

    let result = harness
        .board
        .remove_admin(harness.worker.as_str(), &admin);

    assert!(result.is_ok());
    assert_eq!(harness.board.list_admins().len(), 1);
}

#[rstest]
#[case("")]
#[case("not-an-address")]
#[tokio::test(flavor = "multi_thread")]
async fn added_admin_must_be_a_valid_address(
    harness: BoardHarness,
    #[case] candidate: &str,
) -> eyre::Result<()> {
    let result = harness.board.add_admin(candidate, &harness.admin()).await;

    ensure!(result.map_err(|err| err.kind()).err() == Some(ErrorKind::InvalidAddress));
    ensure!(harness.board.list_admins().len() == 1);
    Ok(())
}

#[rstest]
fn derivation_is_deterministic(harness: BoardHarness) -> eyre::Result<()> {
    let first = harness.board.derive_address("admin-1")?;
    let second = harness.board.derive_address("admin-1")?;

    ensure!(first == second);
    ensure!(&first == harness.board.admin_address());
    ensure!(first.as_str().starts_with(ADDRESS_PREFIX));
    Ok(())
}

#[rstest]
fn empty_seed_is_rejected(harness: BoardHarness) {
    let result = harness.board.derive_address("");

    assert_eq!(
        result.map_err(|err| err.kind()).err(),
        Some(ErrorKind::InvalidInput)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn only_recognised_addresses_validate(harness: BoardHarness) -> eyre::Result<()> {
    let stranger = derive_address("stranger")?;

    ensure!(harness.board.validate_address(harness.worker.as_str()).await);
    ensure!(!harness.board.validate_address(stranger.as_str()).await);
    ensure!(!harness.board.validate_address("cosmos1xyz").await);

    harness.board.derive_address("stranger")?;
    ensure!(harness.board.validate_address(stranger.as_str()).await);
    ensure!(harness.board.list_addresses().contains(&stranger));
    Ok(())
}

#[rstest]
fn escrow_address_is_reported(harness: BoardHarness) {
    assert_eq!(harness.board.escrow_address(), IN_MEMORY_ESCROW_ADDRESS);
}

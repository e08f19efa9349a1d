//! In-memory integration tests for the task lifecycle command surface.

use super::helpers::{BoardHarness, INITIAL_BALANCE, harness};
use bounty_board::ErrorKind;
use bounty_board::task::domain::{TaskId, TaskStatus};
use eyre::ensure;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn posted_task_is_claimed_and_approved(harness: BoardHarness) -> eyre::Result<()> {
    let board = &harness.board;

    let created = board
        .create_task("Fix bug", "", harness.creator.as_str(), "100")
        .await?;
    ensure!(created.status() == TaskStatus::Open);
    ensure!(created.claimer().is_none());

    let claimed = board
        .claim_task(created.id().as_str(), harness.worker.as_str(), "pr-link")
        .await?;
    ensure!(claimed.status() == TaskStatus::Claimed);
    ensure!(claimed.claimer() == Some(&harness.worker));

    let rejected = board
        .approve_task(created.id().as_str(), harness.worker.as_str())
        .await;
    ensure!(rejected.map_err(|err| err.kind()).err() == Some(ErrorKind::Unauthorized));
    ensure!(board.get_task(created.id().as_str()).await?.status() == TaskStatus::Claimed);

    let approved = board
        .approve_task(created.id().as_str(), &harness.admin())
        .await?;
    ensure!(approved.status() == TaskStatus::Completed);

    let reclaimed = board
        .claim_task(created.id().as_str(), harness.worker.as_str(), "again")
        .await;
    ensure!(reclaimed.map_err(|err| err.kind()).err() == Some(ErrorKind::InvalidTransition));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bounty_moves_from_creator_to_claimer(harness: BoardHarness) -> eyre::Result<()> {
    let board = &harness.board;
    let task_id = harness.post_task("Write docs").await;

    ensure!(board.balance(harness.creator.as_str()).await? == INITIAL_BALANCE - 100);
    board
        .claim_task(&task_id, harness.worker.as_str(), "")
        .await?;
    board.approve_task(&task_id, &harness.admin()).await?;

    ensure!(board.balance(harness.worker.as_str()).await? == INITIAL_BALANCE + 100);
    ensure!(harness.ledger.escrowed(&TaskId::new(task_id))?.is_none());
    Ok(())
}

#[rstest]
#[case("", "100", ErrorKind::InvalidInput)]
#[case("Fix bug", "", ErrorKind::InvalidInput)]
#[case("Fix bug", "free", ErrorKind::InvalidInput)]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_posts_are_rejected(
    harness: BoardHarness,
    #[case] title: &str,
    #[case] bounty: &str,
    #[case] expected: ErrorKind,
) -> eyre::Result<()> {
    let result = harness
        .board
        .create_task(title, "", harness.creator.as_str(), bounty)
        .await;

    ensure!(result.map_err(|err| err.kind()).err() == Some(expected));
    ensure!(harness.board.list_tasks(None).await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unrecognised_creator_is_an_invalid_address(harness: BoardHarness) -> eyre::Result<()> {
    let stranger = bounty_board::address::derive_address("stranger")?;

    let result = harness
        .board
        .create_task("Fix bug", "", stranger.as_str(), "100")
        .await;

    ensure!(result.map_err(|err| err.kind()).err() == Some(ErrorKind::InvalidAddress));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_task_is_not_found(harness: BoardHarness) {
    let claim = harness
        .board
        .claim_task("task-0-0", harness.worker.as_str(), "")
        .await;
    let approve = harness.board.approve_task("task-0-0", &harness.admin()).await;
    let get = harness.board.get_task("task-0-0").await;

    for result in [claim, approve, get] {
        assert_eq!(
            result.map_err(|err| err.kind()).err(),
            Some(ErrorKind::NotFound)
        );
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn approving_an_open_task_is_an_invalid_transition(harness: BoardHarness) {
    let task_id = harness.post_task("Fix bug").await;

    let result = harness.board.approve_task(&task_id, &harness.admin()).await;

    assert_eq!(
        result.map_err(|err| err.kind()).err(),
        Some(ErrorKind::InvalidTransition)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_release_is_retryable(harness: BoardHarness) -> eyre::Result<()> {
    let task_id = harness.post_task("Fix bug").await;
    harness
        .board
        .claim_task(&task_id, harness.worker.as_str(), "pr")
        .await?;
    harness
        .ledger
        .set_release_failure(Some("ledger offline".to_owned()))?;

    let failed = harness.board.approve_task(&task_id, &harness.admin()).await;
    ensure!(failed.map_err(|err| err.kind()).err() == Some(ErrorKind::SettlementFailure));
    ensure!(harness.board.get_task(&task_id).await?.status() == TaskStatus::Claimed);

    harness.ledger.set_release_failure(None)?;
    let approved = harness.board.approve_task(&task_id, &harness.admin()).await?;
    ensure!(approved.status() == TaskStatus::Completed);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_are_listed_by_status_name(harness: BoardHarness) -> eyre::Result<()> {
    let open = harness.post_task("Open task").await;
    let claimed = harness.post_task("Claimed task").await;
    harness
        .board
        .claim_task(&claimed, harness.worker.as_str(), "")
        .await?;

    let open_tasks = harness.board.list_tasks(Some("open")).await?;
    let claimed_tasks = harness.board.list_tasks(Some("CLAIMED")).await?;
    let all = harness.board.list_tasks(None).await?;
    let bad_filter = harness.board.list_tasks(Some("DONE")).await;

    ensure!(open_tasks.len() == 1);
    ensure!(open_tasks.first().map(|task| task.id().as_str()) == Some(open.as_str()));
    ensure!(claimed_tasks.first().map(|task| task.id().as_str()) == Some(claimed.as_str()));
    ensure!(all.len() == 2);
    ensure!(bad_filter.map_err(|err| err.kind()).err() == Some(ErrorKind::InvalidInput));
    Ok(())
}

//! Then steps for bounty task lifecycle BDD scenarios.

use super::world::{BountyWorld, run_async};
use bounty_board::task::domain::TaskStatus;
use rstest_bdd_macros::then;

fn expected_status(status: &str) -> Result<TaskStatus, eyre::Report> {
    TaskStatus::try_from(status)
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))
}

#[then(r#"the task status is "{status}""#)]
fn task_status_is(world: &BountyWorld, status: String) -> Result<(), eyre::Report> {
    let expected = expected_status(&status)?;
    let task = world
        .current_task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing current task"))?;

    if let Some(kind) = world.last_error {
        return Err(eyre::eyre!("expected success, last command failed with {kind}"));
    }
    if task.status() != expected {
        return Err(eyre::eyre!(
            "expected status {}, found {}",
            expected.as_str(),
            task.status().as_str()
        ));
    }
    Ok(())
}

#[then(r#"the stored task status is "{status}""#)]
fn stored_task_status_is(world: &BountyWorld, status: String) -> Result<(), eyre::Report> {
    let expected = expected_status(&status)?;
    let task_id = world.task_id()?;
    let stored = run_async(world.board.get_task(&task_id))?;

    eyre::ensure!(
        stored.status() == expected,
        "expected stored status {expected}, found {}",
        stored.status()
    );
    Ok(())
}

#[then("the task has no claimer")]
fn task_has_no_claimer(world: &BountyWorld) -> Result<(), eyre::Report> {
    let task = world
        .current_task
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing current task"))?;
    eyre::ensure!(task.claimer().is_none(), "expected no claimer");
    Ok(())
}

#[then(r#"the task is claimed by "{claimer}""#)]
fn task_is_claimed_by(world: &BountyWorld, claimer: String) -> Result<(), eyre::Report> {
    let expected = world.address(&claimer)?;
    let task_id = world.task_id()?;
    let stored = run_async(world.board.get_task(&task_id))?;

    eyre::ensure!(
        stored.claimer() == Some(&expected),
        "expected claimer {expected}, found {:?}",
        stored.claimer()
    );
    Ok(())
}

#[then(r#""{payee}" has been paid the bounty"#)]
fn payee_has_been_paid(world: &BountyWorld, payee: String) -> Result<(), eyre::Report> {
    let address = world.address(&payee)?;
    let balance = run_async(world.board.balance(address.as_str()))?;

    eyre::ensure!(balance == 1_000_100, "unexpected balance {balance}");
    Ok(())
}

#[then(r#"the command fails with "{kind}""#)]
fn command_fails_with(world: &BountyWorld, kind: String) -> Result<(), eyre::Report> {
    match world.last_error {
        Some(actual) if actual.as_str() == kind => Ok(()),
        Some(actual) => Err(eyre::eyre!("expected {kind} error, got {actual}")),
        None => Err(eyre::eyre!("expected {kind} error, command succeeded")),
    }
}

#[then("the admin set has {count:usize} member")]
fn admin_set_has(world: &BountyWorld, count: usize) -> Result<(), eyre::Report> {
    let admins = world.board.list_admins();
    eyre::ensure!(admins.len() == count, "expected {count} admins, found {}", admins.len());
    Ok(())
}

#[then("both derivations equal the admin address")]
fn derivations_equal_admin(world: &BountyWorld) -> Result<(), eyre::Report> {
    let admin = world.board.admin_address();
    eyre::ensure!(world.derived.len() == 2, "expected two derivations");
    eyre::ensure!(
        world.derived.iter().all(|address| address == admin),
        "derivations differ from the admin address"
    );
    Ok(())
}

//! When steps for bounty task lifecycle BDD scenarios.

use super::world::{BountyWorld, run_async};
use rstest_bdd_macros::when;

#[when(r#""{creator}" posts "{title}" with bounty "{bounty}""#)]
fn post_task(
    world: &mut BountyWorld,
    creator: String,
    title: String,
    bounty: String,
) -> Result<(), eyre::Report> {
    let poster = world.address(&creator)?;
    let result = run_async(world.board.create_task(&title, "", poster.as_str(), &bounty));
    world.record(result);
    Ok(())
}

#[when(r#""{claimer}" claims the task with proof "{proof}""#)]
fn claim_task(world: &mut BountyWorld, claimer: String, proof: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let worker = world.address(&claimer)?;
    let result = run_async(world.board.claim_task(&task_id, worker.as_str(), &proof));
    world.record(result);
    Ok(())
}

#[when(r#""{approver}" approves the task"#)]
fn named_approval(world: &mut BountyWorld, approver: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let caller = world.address(&approver)?;
    let result = run_async(world.board.approve_task(&task_id, caller.as_str()));
    world.record(result);
    Ok(())
}

#[when("the admin approves the task")]
fn admin_approval(world: &mut BountyWorld) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let admin = world.board.admin_address().as_str().to_owned();
    let result = run_async(world.board.approve_task(&task_id, &admin));
    world.record(result);
    Ok(())
}

#[when("the admin removes itself")]
fn admin_removes_itself(world: &mut BountyWorld) {
    let admin = world.board.admin_address().as_str().to_owned();
    world.last_error = world.board.remove_admin(&admin, &admin).err().map(|err| err.kind());
}

#[when(r#"the seed "{seed}" is derived twice"#)]
fn derive_twice(world: &mut BountyWorld, seed: String) -> Result<(), eyre::Report> {
    world.derived = vec![world.address(&seed)?, world.address(&seed)?];
    Ok(())
}

//! Given steps for bounty task lifecycle BDD scenarios.

use super::world::{BountyWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given("a bounty board seeded with one admin")]
fn board_with_one_admin(world: &mut BountyWorld) -> Result<(), eyre::Report> {
    eyre::ensure!(world.board.list_admins().len() == 1);
    Ok(())
}

#[given(r#""{creator}" has posted "{title}" with bounty "{bounty}""#)]
fn task_posted(
    world: &mut BountyWorld,
    creator: String,
    title: String,
    bounty: String,
) -> Result<(), eyre::Report> {
    let poster = world.address(&creator)?;
    let created = run_async(world.board.create_task(&title, "", poster.as_str(), &bounty))
        .wrap_err("post task in scenario setup")?;
    world.current_task = Some(created);
    Ok(())
}

#[given(r#""{claimer}" has claimed the task"#)]
fn task_claimed(world: &mut BountyWorld, claimer: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let worker = world.address(&claimer)?;
    let claimed = run_async(world.board.claim_task(&task_id, worker.as_str(), "proof"))
        .wrap_err("claim task in scenario setup")?;
    world.current_task = Some(claimed);
    Ok(())
}

#[given("the admin has approved the task")]
fn task_approved(world: &mut BountyWorld) -> Result<(), eyre::Report> {
    let task_id = world.task_id()?;
    let admin = world.board.admin_address().as_str().to_owned();
    let approved = run_async(world.board.approve_task(&task_id, &admin))
        .wrap_err("approve task in scenario setup")?;
    world.current_task = Some(approved);
    Ok(())
}

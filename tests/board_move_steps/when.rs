//! When steps for board move BDD scenarios.

use std::sync::Arc;

use super::world::{BOARD, BoardMoveWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use tessera::board::{domain::TaskStatus, services::Reconciler};

#[when("the first backlog task is moved to in progress")]
fn move_first_backlog_task(world: &mut BoardMoveWorld) -> Result<(), eyre::Report> {
    let reconciler = world
        .reconciler
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing mounted reconciler in scenario world"))?;

    let result = run_async(reconciler.move_between_columns(
        TaskStatus::Backlog,
        TaskStatus::InProgress,
        0,
        0,
    ));
    world.last_move = Some(result);
    Ok(())
}

#[when("the backlog is reordered to put the second task first")]
fn reorder_backlog(world: &mut BoardMoveWorld) -> Result<(), eyre::Report> {
    let reconciler = world
        .reconciler
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing mounted reconciler in scenario world"))?;

    let result = reconciler.move_within_column(TaskStatus::Backlog, 1, 0);
    world.last_move = Some(result);
    Ok(())
}

#[when("the board is remounted from the cache")]
fn remount_board(world: &mut BoardMoveWorld) -> Result<(), eyre::Report> {
    let reconciler = Reconciler::new(BOARD, Arc::clone(&world.gateway), Arc::clone(&world.cache));
    run_async(reconciler.mount()).wrap_err("remount board")?;
    world.reconciler = Some(reconciler);
    Ok(())
}

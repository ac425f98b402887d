//! Then steps for board move BDD scenarios.

use super::world::BoardMoveWorld;
use eyre::WrapErr;
use rstest_bdd_macros::then;
use tessera::board::{
    domain::{BoardState, TaskStatus},
    services::{ReconcileError, Recovery},
};

fn parse_column(name: &str) -> Result<TaskStatus, eyre::Report> {
    match name {
        "backlog" => Ok(TaskStatus::Backlog),
        "in progress" => Ok(TaskStatus::InProgress),
        "done" => Ok(TaskStatus::Done),
        other => Err(eyre::eyre!("unknown column in scenario: {other}")),
    }
}

fn board_snapshot(world: &BoardMoveWorld) -> Result<BoardState, eyre::Report> {
    world
        .reconciler
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing mounted reconciler in scenario world"))?
        .snapshot()
        .wrap_err("snapshot board")
}

#[then("the move is reported as applied")]
fn move_reported_as_applied(world: &BoardMoveWorld) -> Result<(), eyre::Report> {
    match world.last_move.as_ref() {
        Some(Ok(true)) => Ok(()),
        other => Err(eyre::eyre!("expected an applied move, got {other:?}")),
    }
}

#[then("the move fails and the task is rolled back")]
fn move_fails_with_rollback(world: &BoardMoveWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_move
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing move result in scenario world"))?;

    if !matches!(
        result,
        Err(ReconcileError::StatusUpdateFailed {
            recovery: Recovery::RolledBack,
            ..
        })
    ) {
        return Err(eyre::eyre!(
            "expected a rolled-back status update failure, got {result:?}"
        ));
    }
    Ok(())
}

#[then(r#"the "{column}" column lists "{titles}""#)]
fn column_lists_titles(
    world: &BoardMoveWorld,
    column: String,
    titles: String,
) -> Result<(), eyre::Report> {
    let status = parse_column(&column)?;
    let snapshot = board_snapshot(world)?;
    let actual: Vec<&str> = snapshot
        .column(status)
        .iter()
        .map(|task| task.title().as_str())
        .collect();
    let expected: Vec<&str> = titles.split(", ").collect();

    if actual != expected {
        return Err(eyre::eyre!(
            "expected {column} column {expected:?}, found {actual:?}"
        ));
    }
    Ok(())
}

#[then(r#"the "{column}" column is empty"#)]
fn column_is_empty(world: &BoardMoveWorld, column: String) -> Result<(), eyre::Report> {
    let status = parse_column(&column)?;
    let snapshot = board_snapshot(world)?;

    if !snapshot.column(status).is_empty() {
        return Err(eyre::eyre!(
            "expected an empty {column} column, found {} tasks",
            snapshot.column(status).len()
        ));
    }
    Ok(())
}

#[then("no settlement is outstanding")]
fn no_settlement_outstanding(world: &BoardMoveWorld) -> Result<(), eyre::Report> {
    let pending = world
        .reconciler
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing mounted reconciler in scenario world"))?
        .pending_mutations()
        .wrap_err("count pending mutations")?;

    if pending != 0 {
        return Err(eyre::eyre!("expected no pending settlements, found {pending}"));
    }
    Ok(())
}

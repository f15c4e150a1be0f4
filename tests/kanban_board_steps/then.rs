//! Then steps for kanban board BDD scenarios.

use super::world::{KanbanWorld, run_async};
use kanban_store::board::{
    domain::WipLimit,
    ports::KanbanRepositoryError,
    services::KanbanServiceError,
};
use rstest_bdd_macros::then;

#[then(r"the add is rejected because the column is at its limit of {limit:u32}")]
fn add_rejected_at_limit(world: &KanbanWorld, limit: u32) -> Result<(), eyre::Report> {
    let result = world
        .last_add
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing add result"))?;

    match result {
        Err(KanbanServiceError::Repository(KanbanRepositoryError::CapacityExceeded(rejection)))
            if rejection.limit == WipLimit::new(limit) =>
        {
            Ok(())
        }
        other => Err(eyre::eyre!(
            "expected capacity rejection at limit {limit}, got {other:?}"
        )),
    }
}

#[then(r#"column "{column}" holds {count:usize} tasks"#)]
fn column_holds(world: &KanbanWorld, column: String, count: usize) -> Result<(), eyre::Report> {
    let column_id = world.column(&column)?;
    let tasks = run_async(world.service.get_column_tasks(column_id))?
        .ok_or_else(|| eyre::eyre!("column {column:?} missing"))?;

    eyre::ensure!(
        tasks.len() == count,
        "expected {count} tasks in {column:?}, found {}",
        tasks.len()
    );
    Ok(())
}

#[then(r#"task "{title}" is in column "{column}""#)]
fn task_in_column(world: &KanbanWorld, title: String, column: String) -> Result<(), eyre::Report> {
    let expected = world.column(&column)?;
    let task_id = world.task(&title)?.id();
    let stored = run_async(world.service.get_task(task_id))?
        .ok_or_else(|| eyre::eyre!("task {title:?} missing"))?;

    eyre::ensure!(
        stored.column_id() == expected,
        "task {title:?} is in {}, expected {column:?}",
        stored.column_id()
    );
    Ok(())
}

#[then(r#"task "{title}" has update reason "{reason}""#)]
fn task_has_reason(world: &KanbanWorld, title: String, reason: String) -> Result<(), eyre::Report> {
    let task_id = world.task(&title)?.id();
    let stored = run_async(world.service.get_task(task_id))?
        .ok_or_else(|| eyre::eyre!("task {title:?} missing"))?;

    eyre::ensure!(
        stored.update_reason() == Some(reason.as_str()),
        "expected reason {reason:?}, found {:?}",
        stored.update_reason()
    );
    Ok(())
}

#[then("the imported store matches the original")]
fn imported_matches(world: &KanbanWorld) -> Result<(), eyre::Report> {
    let (original, imported) = world
        .round_trip
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing round trip result"))?;

    eyre::ensure!(
        original == imported,
        "imported store differs from the original"
    );
    eyre::ensure!(!imported.is_empty(), "round trip produced an empty store");
    Ok(())
}

//! `SQLite` tests for WIP limits under concurrent writers.

use std::sync::Arc;

use kanban_store::board::services::{AddTaskRequest, ErrorKind, MoveTaskRequest};
use rstest::rstest;

use crate::sqlite::helpers::{BoxError, SqliteContext, context};
use crate::test_helpers::create_sprint_board;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn limit_holds_across_pooled_connections(
    context: Result<SqliteContext, BoxError>,
) -> Result<(), BoxError> {
    let context = context?;
    let sprint = create_sprint_board(&context.service, "Sprint 1").await?;
    for title in ["A", "B"] {
        context
            .service
            .add_task_to_column(sprint.in_progress, AddTaskRequest::new(title, ""))
            .await?;
    }
    let service = Arc::new(context.service);

    let handles: Vec<_> = (0..6)
        .map(|index| {
            let racer = Arc::clone(&service);
            tokio::spawn(async move {
                racer
                    .add_task_to_column(
                        sprint.in_progress,
                        AddTaskRequest::new(format!("Racer {index}"), ""),
                    )
                    .await
            })
        })
        .collect();
    let mut kinds = Vec::new();
    for handle in handles {
        kinds.push(handle.await?.map(|_| ()).map_err(|err| err.kind()));
    }

    let admitted = kinds.iter().filter(|outcome| outcome.is_ok()).count();
    let rejected = kinds
        .iter()
        .filter(|outcome| **outcome == Err(ErrorKind::CapacityExceeded))
        .count();
    assert_eq!(admitted, 1, "outcomes: {kinds:?}");
    assert_eq!(rejected, 5, "outcomes: {kinds:?}");
    let tasks = service
        .get_column_tasks(sprint.in_progress)
        .await?
        .unwrap_or_default();
    let positions: Vec<i64> = tasks.iter().map(|task| task.position()).collect();
    assert_eq!(positions, [0, 1, 2]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_moves_respect_limit(
    context: Result<SqliteContext, BoxError>,
) -> Result<(), BoxError> {
    let context = context?;
    let sprint = create_sprint_board(&context.service, "Sprint 1").await?;
    let mut waiting = Vec::new();
    for index in 0..5 {
        let task = context
            .service
            .add_task_to_column(sprint.to_do, AddTaskRequest::new(format!("Task {index}"), ""))
            .await?;
        waiting.push(task.id());
    }
    let service = Arc::new(context.service);

    let handles: Vec<_> = waiting
        .into_iter()
        .map(|task_id| {
            let racer = Arc::clone(&service);
            tokio::spawn(async move {
                racer
                    .move_task(MoveTaskRequest::new(task_id, sprint.in_progress))
                    .await
            })
        })
        .collect();
    let mut admitted = 0;
    for handle in handles {
        match handle.await? {
            Ok(_) => admitted += 1,
            Err(err) => assert_eq!(err.kind(), ErrorKind::CapacityExceeded),
        }
    }

    assert_eq!(admitted, 3);
    let in_progress = service
        .get_column_tasks(sprint.in_progress)
        .await?
        .unwrap_or_default();
    let to_do = service
        .get_column_tasks(sprint.to_do)
        .await?
        .unwrap_or_default();
    assert_eq!(in_progress.len(), 3);
    assert_eq!(to_do.len(), 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn same_column_move_ignores_full_limit(
    context: Result<SqliteContext, BoxError>,
) -> Result<(), BoxError> {
    let context = context?;
    let sprint = create_sprint_board(&context.service, "Sprint 1").await?;
    let mut last = None;
    for title in ["A", "B", "C"] {
        last = Some(
            context
                .service
                .add_task_to_column(sprint.in_progress, AddTaskRequest::new(title, ""))
                .await?,
        );
    }
    let task = last.ok_or("no task added")?;

    let moved = context
        .service
        .move_task(MoveTaskRequest::new(task.id(), sprint.in_progress).with_reason("still going"))
        .await?;

    assert_eq!(moved.column_id(), sprint.in_progress);
    assert_eq!(moved.position(), task.position());
    assert_eq!(moved.update_reason(), Some("still going"));
    Ok(())
}

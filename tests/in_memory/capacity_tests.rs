//! In-memory integration tests for WIP limit enforcement.

use std::sync::Arc;

use kanban_store::board::{
    domain::WipLimit,
    ports::KanbanRepositoryError,
    services::{AddTaskRequest, ErrorKind, KanbanServiceError, MoveTaskRequest},
};
use rstest::rstest;

use crate::in_memory::helpers::{InMemoryContext, context};
use crate::test_helpers::create_sprint_board;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn fourth_task_is_rejected_at_limit_three(context: InMemoryContext) -> eyre::Result<()> {
    let sprint = create_sprint_board(&context.service, "Sprint 1").await?;
    for title in ["A", "B", "C"] {
        context
            .service
            .add_task_to_column(sprint.in_progress, AddTaskRequest::new(title, ""))
            .await?;
    }

    let err = context
        .service
        .add_task_to_column(sprint.in_progress, AddTaskRequest::new("D", ""))
        .await
        .expect_err("column is full");

    assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
    assert!(matches!(
        err,
        KanbanServiceError::Repository(KanbanRepositoryError::CapacityExceeded(rejection))
            if rejection.limit == WipLimit::new(3) && rejection.column_id == sprint.in_progress
    ));
    let tasks = context
        .service
        .get_column_tasks(sprint.in_progress)
        .await?
        .unwrap_or_default();
    eyre::ensure!(tasks.len() == 3, "rejected add must not persist");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unlimited_column_accepts_any_number(context: InMemoryContext) -> eyre::Result<()> {
    let sprint = create_sprint_board(&context.service, "Sprint 1").await?;

    for index in 0..25 {
        context
            .service
            .add_task_to_column(sprint.on_hold, AddTaskRequest::new(format!("Task {index}"), ""))
            .await?;
    }

    let tasks = context
        .service
        .get_column_tasks(sprint.on_hold)
        .await?
        .unwrap_or_default();
    eyre::ensure!(tasks.len() == 25);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_adds_fill_only_the_last_slot(context: InMemoryContext) -> eyre::Result<()> {
    let sprint = create_sprint_board(&context.service, "Sprint 1").await?;
    for title in ["A", "B"] {
        context
            .service
            .add_task_to_column(sprint.in_progress, AddTaskRequest::new(title, ""))
            .await?;
    }
    let service = Arc::new(context.service);

    let handles: Vec<_> = (0..8)
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
    let mut admitted = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await? {
            Ok(_) => admitted += 1,
            Err(err) if err.kind() == ErrorKind::CapacityExceeded => rejected += 1,
            Err(err) => return Err(err.into()),
        }
    }

    eyre::ensure!(admitted == 1, "expected exactly one admitted add, got {admitted}");
    eyre::ensure!(rejected == 7, "expected seven rejections, got {rejected}");
    let tasks = service
        .get_column_tasks(sprint.in_progress)
        .await?
        .unwrap_or_default();
    eyre::ensure!(tasks.len() == 3);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn move_into_full_column_leaves_task_in_place(context: InMemoryContext) -> eyre::Result<()> {
    let sprint = create_sprint_board(&context.service, "Sprint 1").await?;
    for title in ["A", "B", "C"] {
        context
            .service
            .add_task_to_column(sprint.in_progress, AddTaskRequest::new(title, ""))
            .await?;
    }
    let waiting = context
        .service
        .add_task_to_column(sprint.to_do, AddTaskRequest::new("Waiting", ""))
        .await?;

    let err = context
        .service
        .move_task(MoveTaskRequest::new(waiting.id(), sprint.in_progress).with_reason("start"))
        .await
        .expect_err("target column is full");

    assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
    let stored = context
        .service
        .get_task(waiting.id())
        .await?
        .ok_or_else(|| eyre::eyre!("task vanished"))?;
    eyre::ensure!(stored == waiting, "rejected move must not change the task");
    Ok(())
}

//! In-memory integration tests for task moves and edits.

use kanban_store::board::{
    domain::{ColumnId, TaskId},
    services::{AddTaskRequest, ErrorKind, MoveTaskRequest, UpdateTaskRequest},
};
use rstest::rstest;

use crate::in_memory::helpers::{InMemoryContext, context};
use crate::test_helpers::create_sprint_board;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn moved_task_lands_at_end_of_target(context: InMemoryContext) -> eyre::Result<()> {
    let sprint = create_sprint_board(&context.service, "Sprint 1").await?;
    context
        .service
        .add_task_to_column(sprint.done, AddTaskRequest::new("Shipped", ""))
        .await?;
    let task = context
        .service
        .add_task_to_board(sprint.board_id, AddTaskRequest::new("Write docs", ""))
        .await?;

    let moved = context
        .service
        .move_task(MoveTaskRequest::new(task.id(), sprint.done).with_reason("completed"))
        .await?;

    eyre::ensure!(moved.column_id() == sprint.done);
    eyre::ensure!(moved.position() == 1, "expected position 1, got {}", moved.position());
    eyre::ensure!(moved.update_reason() == Some("completed"));
    eyre::ensure!(moved.updated_at() >= task.updated_at());
    eyre::ensure!(moved.created_at() == task.created_at());
    let remaining = context
        .service
        .get_column_tasks(sprint.to_do)
        .await?
        .unwrap_or_default();
    eyre::ensure!(remaining.is_empty(), "source column should be empty");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn later_move_without_reason_keeps_previous_one(
    context: InMemoryContext,
) -> eyre::Result<()> {
    let sprint = create_sprint_board(&context.service, "Sprint 1").await?;
    let task = context
        .service
        .add_task_to_board(sprint.board_id, AddTaskRequest::new("Write docs", ""))
        .await?;
    context
        .service
        .move_task(MoveTaskRequest::new(task.id(), sprint.in_progress).with_reason("picked up"))
        .await?;

    let moved = context
        .service
        .move_task(MoveTaskRequest::new(task.id(), sprint.done).with_reason("   "))
        .await?;

    eyre::ensure!(moved.column_id() == sprint.done);
    eyre::ensure!(moved.update_reason() == Some("picked up"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn edit_replaces_content_and_title(context: InMemoryContext) -> eyre::Result<()> {
    let sprint = create_sprint_board(&context.service, "Sprint 1").await?;
    let task = context
        .service
        .add_task_to_board(sprint.board_id, AddTaskRequest::new("Draft", "old"))
        .await?;

    let edited = context
        .service
        .update_task(
            task.id(),
            UpdateTaskRequest::new("## Notes\n\nnew body")
                .with_title("Final")
                .with_reason("clarified"),
        )
        .await?;

    eyre::ensure!(edited.title() == "Final");
    eyre::ensure!(edited.content() == "## Notes\n\nnew body");
    eyre::ensure!(edited.update_reason() == Some("clarified"));
    eyre::ensure!(edited.column_id() == task.column_id());
    eyre::ensure!(edited.position() == task.position());
    let stored = context.service.get_task(task.id()).await?;
    eyre::ensure!(stored.as_ref() == Some(&edited), "edit must persist");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_task_or_column_is_not_found(context: InMemoryContext) -> eyre::Result<()> {
    let sprint = create_sprint_board(&context.service, "Sprint 1").await?;
    let task = context
        .service
        .add_task_to_board(sprint.board_id, AddTaskRequest::new("Draft", ""))
        .await?;

    let unknown_task = context
        .service
        .move_task(MoveTaskRequest::new(TaskId::new(), sprint.done))
        .await
        .expect_err("unknown task");
    let unknown_column = context
        .service
        .move_task(MoveTaskRequest::new(task.id(), ColumnId::new()))
        .await
        .expect_err("unknown column");
    let unknown_edit = context
        .service
        .update_task(TaskId::new(), UpdateTaskRequest::new("body"))
        .await
        .expect_err("unknown task");

    assert_eq!(unknown_task.kind(), ErrorKind::NotFound);
    assert_eq!(unknown_column.kind(), ErrorKind::NotFound);
    assert_eq!(unknown_edit.kind(), ErrorKind::NotFound);
    Ok(())
}

//! `SQLite` tests for board and task deletion.

use kanban_store::board::{
    domain::BoardId,
    services::{AddTaskRequest, MoveTaskRequest},
};
use rstest::rstest;

use crate::sqlite::helpers::{BoxError, SqliteContext, context};
use crate::test_helpers::create_sprint_board;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn board_delete_cascades_to_columns_and_tasks(
    context: Result<SqliteContext, BoxError>,
) -> Result<(), BoxError> {
    let context = context?;
    let sprint = create_sprint_board(&context.service, "Sprint 1").await?;
    let survivor = create_sprint_board(&context.service, "Sprint 2").await?;
    let mut task_ids = Vec::new();
    for title in ["A", "B", "C"] {
        let task = context
            .service
            .add_task_to_board(sprint.board_id, AddTaskRequest::new(title, ""))
            .await?;
        task_ids.push(task.id());
    }
    let kept = context
        .service
        .add_task_to_board(survivor.board_id, AddTaskRequest::new("Keep", ""))
        .await?;

    let removed = context.service.delete_board(sprint.board_id).await?;

    assert_eq!(removed, 8);
    assert_eq!(context.service.get_board(sprint.board_id).await?, None);
    for column in [sprint.on_hold, sprint.to_do, sprint.in_progress, sprint.done] {
        assert_eq!(context.service.get_column(column).await?, None);
    }
    for task_id in task_ids {
        assert_eq!(context.service.get_task(task_id).await?, None);
    }
    assert_eq!(context.service.get_task(kept.id()).await?, Some(kept));
    assert_eq!(context.service.list_boards().await?.len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_missing_board_removes_nothing(
    context: Result<SqliteContext, BoxError>,
) -> Result<(), BoxError> {
    let context = context?;
    create_sprint_board(&context.service, "Sprint 1").await?;

    let removed = context.service.delete_board(BoardId::new()).await?;

    assert_eq!(removed, 0);
    assert_eq!(context.service.list_boards().await?.len(), 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_delete_frees_a_wip_slot(
    context: Result<SqliteContext, BoxError>,
) -> Result<(), BoxError> {
    let context = context?;
    let sprint = create_sprint_board(&context.service, "Sprint 1").await?;
    let mut in_progress = Vec::new();
    for title in ["A", "B", "C"] {
        in_progress.push(
            context
                .service
                .add_task_to_column(sprint.in_progress, AddTaskRequest::new(title, ""))
                .await?,
        );
    }
    let waiting = context
        .service
        .add_task_to_board(sprint.board_id, AddTaskRequest::new("Waiting", ""))
        .await?;
    let first = in_progress.first().ok_or("no task")?;

    assert_eq!(context.service.delete_task(first.id()).await?, 1);
    assert_eq!(context.service.delete_task(first.id()).await?, 0);
    let moved = context
        .service
        .move_task(MoveTaskRequest::new(waiting.id(), sprint.in_progress))
        .await?;

    assert_eq!(moved.column_id(), sprint.in_progress);
    assert_eq!(moved.position(), 3);
    Ok(())
}

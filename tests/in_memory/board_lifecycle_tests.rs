//! In-memory integration tests for board creation, lookup, and deletion.

use kanban_store::board::services::{AddTaskRequest, CreateBoardRequest, ErrorKind};
use rstest::rstest;

use crate::in_memory::helpers::{InMemoryContext, context};
use crate::test_helpers::create_sprint_board;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_board_reads_back_with_ordered_columns(
    context: InMemoryContext,
) -> eyre::Result<()> {
    let sprint = create_sprint_board(&context.service, "Sprint 1").await?;

    let view = context
        .service
        .get_board_view(sprint.board_id)
        .await?
        .ok_or_else(|| eyre::eyre!("missing board view"))?;

    let names: Vec<&str> = view.columns.iter().map(|entry| entry.column.name()).collect();
    eyre::ensure!(
        names == ["On Hold", "To Do", "In Progress", "Done"],
        "unexpected column order: {names:?}"
    );
    eyre::ensure!(view.board.landing_column_id() == Some(sprint.to_do));
    eyre::ensure!(view.board.name() == "Sprint 1");
    eyre::ensure!(view.task_count() == 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn listing_returns_every_board(context: InMemoryContext) -> eyre::Result<()> {
    let first = create_sprint_board(&context.service, "Sprint 1").await?;
    let second = create_sprint_board(&context.service, "Sprint 2").await?;

    let boards = context.service.list_boards().await?;

    eyre::ensure!(boards.len() == 2, "expected two boards, got {}", boards.len());
    for expected in [first.board_id, second.board_id] {
        eyre::ensure!(
            boards.iter().any(|board| board.id() == expected),
            "board {expected} not listed"
        );
    }
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn board_needs_at_least_one_column(context: InMemoryContext) {
    let err = context
        .service
        .create_board(CreateBoardRequest::new("Backlog", "Collect ideas"))
        .await
        .expect_err("a board without columns is rejected");

    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn imported_board_without_landing_column_rejects_board_adds(
    context: InMemoryContext,
) -> eyre::Result<()> {
    let sprint = create_sprint_board(&context.service, "Sprint 1").await?;
    let mut document = context.transfer.export_document().await?;
    for board in &mut document.boards {
        board.landing_column_id = None;
    }
    context.transfer.import_document(document).await?;

    let err = context
        .service
        .add_task_to_board(sprint.board_id, AddTaskRequest::new("Idea", ""))
        .await
        .expect_err("board has no landing column");

    assert_eq!(err.kind(), ErrorKind::Validation);
    let added = context
        .service
        .add_task_to_column(sprint.on_hold, AddTaskRequest::new("Idea", ""))
        .await?;
    eyre::ensure!(added.column_id() == sprint.on_hold);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn landing_adds_append_in_order(context: InMemoryContext) -> eyre::Result<()> {
    let sprint = create_sprint_board(&context.service, "Sprint 1").await?;

    for title in ["Plan", "Build", "Test"] {
        context
            .service
            .add_task_to_board(sprint.board_id, AddTaskRequest::new(title, "- [ ] notes"))
            .await?;
    }
    let tasks = context
        .service
        .get_column_tasks(sprint.to_do)
        .await?
        .ok_or_else(|| eyre::eyre!("landing column missing"))?;

    let titles: Vec<&str> = tasks.iter().map(|task| task.title()).collect();
    let positions: Vec<i64> = tasks.iter().map(|task| task.position()).collect();
    eyre::ensure!(titles == ["Plan", "Build", "Test"], "titles: {titles:?}");
    eyre::ensure!(positions == [0, 1, 2], "positions: {positions:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_board_removes_columns_and_tasks(context: InMemoryContext) -> eyre::Result<()> {
    let sprint = create_sprint_board(&context.service, "Sprint 1").await?;
    let keeper = create_sprint_board(&context.service, "Sprint 2").await?;
    let task = context
        .service
        .add_task_to_column(sprint.in_progress, AddTaskRequest::new("Review", ""))
        .await?;
    context
        .service
        .add_task_to_column(sprint.done, AddTaskRequest::new("Release", ""))
        .await?;

    let removed = context.service.delete_board(sprint.board_id).await?;

    eyre::ensure!(removed == 7, "expected 1 board, 4 columns, 2 tasks; got {removed}");
    eyre::ensure!(context.service.get_board(sprint.board_id).await?.is_none());
    eyre::ensure!(context.service.get_column(sprint.done).await?.is_none());
    eyre::ensure!(context.service.get_task(task.id()).await?.is_none());
    eyre::ensure!(context.service.get_board(keeper.board_id).await?.is_some());
    eyre::ensure!(context.service.delete_board(sprint.board_id).await? == 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn lookups_of_missing_records_return_none(context: InMemoryContext) -> eyre::Result<()> {
    use kanban_store::board::domain::{BoardId, ColumnId, TaskId};

    eyre::ensure!(context.service.get_board(BoardId::new()).await?.is_none());
    eyre::ensure!(context.service.get_board_view(BoardId::new()).await?.is_none());
    eyre::ensure!(context.service.get_column(ColumnId::new()).await?.is_none());
    eyre::ensure!(context.service.get_column_tasks(ColumnId::new()).await?.is_none());
    eyre::ensure!(context.service.get_task(TaskId::new()).await?.is_none());
    eyre::ensure!(context.service.delete_task(TaskId::new()).await? == 0);
    Ok(())
}

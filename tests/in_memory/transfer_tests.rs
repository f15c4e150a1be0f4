//! In-memory integration tests for whole-store export and import.

use kanban_store::board::{
    adapters::transfer::TransferDocument,
    ports::KanbanRepository,
    services::{AddTaskRequest, ErrorKind, MoveTaskRequest},
};
use rstest::rstest;

use crate::in_memory::helpers::{InMemoryContext, context};
use crate::test_helpers::create_sprint_board;

async fn seed(context: &InMemoryContext) -> eyre::Result<()> {
    let sprint = create_sprint_board(&context.service, "Sprint 1").await?;
    let task = context
        .service
        .add_task_to_board(sprint.board_id, AddTaskRequest::new("Write docs", "body"))
        .await?;
    context
        .service
        .move_task(MoveTaskRequest::new(task.id(), sprint.done).with_reason("completed"))
        .await?;
    context
        .service
        .add_task_to_column(sprint.in_progress, AddTaskRequest::new("Review", ""))
        .await?;
    create_sprint_board(&context.service, "Sprint 2").await?;
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn export_then_import_restores_identical_store(context: InMemoryContext) -> eyre::Result<()> {
    seed(&context).await?;
    let exported = context.transfer.export_json().await?;
    let restored = InMemoryContext::new();

    restored.transfer.import_json(&exported).await?;

    let before = context.transfer.export_database().await?;
    let after = restored.transfer.export_database().await?;
    eyre::ensure!(before == after, "round trip changed the store");
    eyre::ensure!(after.boards.len() == 2);
    eyre::ensure!(after.columns.len() == 8);
    eyre::ensure!(after.tasks.len() == 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn import_replaces_existing_contents(context: InMemoryContext) -> eyre::Result<()> {
    seed(&context).await?;
    let other = InMemoryContext::new();
    create_sprint_board(&other.service, "Replacement").await?;
    let document = other.transfer.export_document().await?;

    context.transfer.import_document(document).await?;

    let boards = context.service.list_boards().await?;
    let names: Vec<&str> = boards.iter().map(|board| board.name()).collect();
    eyre::ensure!(names == ["Replacement"], "unexpected boards: {names:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_import_leaves_store_untouched(context: InMemoryContext) -> eyre::Result<()> {
    seed(&context).await?;
    let before = context.repository.export_snapshot().await?;
    let mut document = TransferDocument::from(&before);
    document.columns.retain(|column| !column.is_done_column);

    let err = context
        .transfer
        .import_document(document)
        .await
        .expect_err("task in a dropped column dangles");

    assert_eq!(err.kind(), ErrorKind::Import);
    let after = context.repository.export_snapshot().await?;
    eyre::ensure!(before == after, "failed import must not change the store");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn empty_document_clears_the_store(context: InMemoryContext) -> eyre::Result<()> {
    seed(&context).await?;

    context.transfer.import_json("{}").await?;

    eyre::ensure!(context.transfer.export_database().await?.is_empty());
    Ok(())
}

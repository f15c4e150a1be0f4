//! Repository port for board, column, and task persistence.
//!
//! Every mutating method is a single transaction in the backing store. In
//! particular, the WIP capacity check and the write it gates are never
//! observably separated.

use crate::board::domain::{
    Board, BoardId, BoardLayout, BoardView, CapacityExceeded, Column, ColumnId, DatabaseSnapshot,
    ImportError, Task, TaskDraft, TaskEdit, TaskId, TaskTransition,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for kanban repository operations.
pub type KanbanRepositoryResult<T> = Result<T, KanbanRepositoryError>;

/// Kanban persistence contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KanbanRepository: Send + Sync {
    /// Stores a new board together with all of its columns.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanRepositoryError::DuplicateBoard`] when the board ID
    /// already exists.
    async fn create_board(&self, layout: &BoardLayout) -> KanbanRepositoryResult<()>;

    /// Finds a board by identifier.
    async fn find_board(&self, id: BoardId) -> KanbanRepositoryResult<Option<Board>>;

    /// Returns every board ordered by creation time, then identifier.
    async fn list_boards(&self) -> KanbanRepositoryResult<Vec<Board>>;

    /// Returns a board with its columns and their tasks, read consistently.
    async fn find_board_view(&self, id: BoardId) -> KanbanRepositoryResult<Option<BoardView>>;

    /// Finds a column by identifier.
    async fn find_column(&self, id: ColumnId) -> KanbanRepositoryResult<Option<Column>>;

    /// Returns the tasks of a column in position order, or `None` when the
    /// column does not exist.
    async fn list_column_tasks(&self, id: ColumnId) -> KanbanRepositoryResult<Option<Vec<Task>>>;

    /// Finds a task by identifier.
    async fn find_task(&self, id: TaskId) -> KanbanRepositoryResult<Option<Task>>;

    /// Places a drafted task at the end of a column.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanRepositoryError::ColumnNotFound`] for an unknown
    /// column or [`KanbanRepositoryError::CapacityExceeded`] when the column
    /// is full. Nothing is written in either case.
    async fn add_task(
        &self,
        column_id: ColumnId,
        draft: &TaskDraft,
    ) -> KanbanRepositoryResult<Task>;

    /// Places a drafted task at the end of a board's landing column.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanRepositoryError::BoardNotFound`],
    /// [`KanbanRepositoryError::NoLandingColumn`], or
    /// [`KanbanRepositoryError::CapacityExceeded`].
    async fn add_task_to_landing(
        &self,
        board_id: BoardId,
        draft: &TaskDraft,
    ) -> KanbanRepositoryResult<Task>;

    /// Applies an in-place edit to a task.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanRepositoryError::TaskNotFound`] when the task does not
    /// exist.
    async fn update_task(&self, id: TaskId, edit: &TaskEdit) -> KanbanRepositoryResult<Task>;

    /// Moves a task into another column.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanRepositoryError::TaskNotFound`],
    /// [`KanbanRepositoryError::ColumnNotFound`], or
    /// [`KanbanRepositoryError::CapacityExceeded`]; the task is unchanged on
    /// any error.
    async fn move_task(&self, transition: &TaskTransition) -> KanbanRepositoryResult<Task>;

    /// Deletes a task, returning the number of rows removed (zero when the
    /// task does not exist).
    async fn delete_task(&self, id: TaskId) -> KanbanRepositoryResult<u64>;

    /// Deletes a board with its columns and tasks, returning the total rows
    /// removed across all three (zero when the board does not exist).
    async fn delete_board(&self, id: BoardId) -> KanbanRepositoryResult<u64>;

    /// Reads every board, column, and task as one consistent snapshot.
    async fn export_snapshot(&self) -> KanbanRepositoryResult<DatabaseSnapshot>;

    /// Replaces the whole store with `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanRepositoryError::Import`] when the snapshot violates
    /// referential integrity or a WIP limit. The previous contents remain in
    /// place.
    async fn replace_all(&self, snapshot: &DatabaseSnapshot) -> KanbanRepositoryResult<()>;
}

/// Errors returned by kanban repository implementations.
#[derive(Debug, Clone, Error)]
pub enum KanbanRepositoryError {
    /// A board with the same identifier already exists.
    #[error("duplicate board identifier: {0}")]
    DuplicateBoard(BoardId),

    /// The board was not found.
    #[error("board not found: {0}")]
    BoardNotFound(BoardId),

    /// The column was not found.
    #[error("column not found: {0}")]
    ColumnNotFound(ColumnId),

    /// The task was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The board has no landing column.
    #[error("board {0} has no landing column")]
    NoLandingColumn(BoardId),

    /// The column's highest task position leaves no room for another task.
    #[error("column {0} has no task position left after its last task")]
    PositionsExhausted(ColumnId),

    /// The target column is at its WIP limit.
    #[error(transparent)]
    CapacityExceeded(#[from] CapacityExceeded),

    /// An import payload failed integrity validation.
    #[error("import rejected: {0}")]
    Import(#[from] ImportError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl KanbanRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }

    /// Returns `true` when a referenced board, column, or task is missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::BoardNotFound(_) | Self::ColumnNotFound(_) | Self::TaskNotFound(_)
        )
    }
}

//! Service layer for boards, columns, and task movement.

use super::error::{KanbanServiceError, KanbanServiceResult};
use crate::board::{
    domain::{
        Board, BoardGoal, BoardId, BoardLayout, BoardName, BoardView, Column, ColumnId, ColumnSpec,
        Task, TaskDraft, TaskEdit, TaskId, TaskTitle, TaskTransition, TransitionReason,
    },
    ports::{KanbanRepository, KanbanRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Request payload for creating a board with its initial columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateBoardRequest {
    name: String,
    goal: String,
    columns: Vec<ColumnSpec>,
    landing_index: usize,
}

impl CreateBoardRequest {
    /// Creates a request with no columns that lands new tasks in the first
    /// column.
    #[must_use]
    pub fn new(name: impl Into<String>, goal: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            goal: goal.into(),
            columns: Vec::new(),
            landing_index: 0,
        }
    }

    /// Appends a column.
    #[must_use]
    pub fn with_column(mut self, column: ColumnSpec) -> Self {
        self.columns.push(column);
        self
    }

    /// Appends several columns.
    #[must_use]
    pub fn with_columns(mut self, columns: impl IntoIterator<Item = ColumnSpec>) -> Self {
        self.columns.extend(columns);
        self
    }

    /// Sets which column, by index into the column list, receives new tasks.
    #[must_use]
    pub const fn with_landing_index(mut self, landing_index: usize) -> Self {
        self.landing_index = landing_index;
        self
    }
}

/// Request payload for adding a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddTaskRequest {
    title: String,
    content: String,
}

impl AddTaskRequest {
    /// Creates a request with a title and markdown content.
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Request payload for editing a task in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    content: String,
    title: Option<String>,
    reason: Option<String>,
}

impl UpdateTaskRequest {
    /// Creates a request replacing the task content.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            title: None,
            reason: None,
        }
    }

    /// Also replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Records a reason with the edit. A blank reason is ignored.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Request payload for moving a task into another column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveTaskRequest {
    task_id: TaskId,
    target_column_id: ColumnId,
    reason: Option<String>,
}

impl MoveTaskRequest {
    /// Creates a move request without a reason.
    #[must_use]
    pub const fn new(task_id: TaskId, target_column_id: ColumnId) -> Self {
        Self {
            task_id,
            target_column_id,
            reason: None,
        }
    }

    /// Records a reason with the move. A blank reason is ignored.
    #[must_use]
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// Board, column, and task orchestration service.
#[derive(Clone)]
pub struct KanbanService<R, C>
where
    R: KanbanRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> KanbanService<R, C>
where
    R: KanbanRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new kanban service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a board together with its columns.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanServiceError::Domain`] when the name, goal, column
    /// list, or landing index is invalid, or
    /// [`KanbanServiceError::Repository`] when persistence fails.
    pub async fn create_board(&self, request: CreateBoardRequest) -> KanbanServiceResult<BoardId> {
        let name = BoardName::new(request.name)?;
        let goal = BoardGoal::new(request.goal)?;
        let layout = BoardLayout::plan(
            name,
            goal,
            &request.columns,
            request.landing_index,
            &*self.clock,
        )?;

        self.repository.create_board(&layout).await?;
        let board = layout.board();
        info!(
            board_id = %board.id(),
            name = board.name(),
            columns = layout.columns().len(),
            "board created"
        );
        Ok(board.id())
    }

    /// Retrieves a board by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanServiceError::Repository`] when lookup fails.
    pub async fn get_board(&self, id: BoardId) -> KanbanServiceResult<Option<Board>> {
        Ok(self.repository.find_board(id).await?)
    }

    /// Lists every board ordered by creation time, then identifier.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanServiceError::Repository`] when lookup fails.
    pub async fn list_boards(&self) -> KanbanServiceResult<Vec<Board>> {
        Ok(self.repository.list_boards().await?)
    }

    /// Retrieves a board with its columns and tasks in position order.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanServiceError::Repository`] when lookup fails.
    pub async fn get_board_view(&self, id: BoardId) -> KanbanServiceResult<Option<BoardView>> {
        let view = self.repository.find_board_view(id).await?;
        if let Some(found) = &view {
            debug!(board_id = %id, tasks = found.task_count(), "board view loaded");
        }
        Ok(view)
    }

    /// Retrieves a column by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanServiceError::Repository`] when lookup fails.
    pub async fn get_column(&self, id: ColumnId) -> KanbanServiceResult<Option<Column>> {
        Ok(self.repository.find_column(id).await?)
    }

    /// Retrieves a column's tasks in position order, or `None` when the
    /// column does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanServiceError::Repository`] when lookup fails.
    pub async fn get_column_tasks(&self, id: ColumnId) -> KanbanServiceResult<Option<Vec<Task>>> {
        Ok(self.repository.list_column_tasks(id).await?)
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanServiceError::Repository`] when lookup fails.
    pub async fn get_task(&self, id: TaskId) -> KanbanServiceResult<Option<Task>> {
        Ok(self.repository.find_task(id).await?)
    }

    /// Adds a task at the end of a column.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanServiceError::Domain`] for a blank title, or
    /// [`KanbanServiceError::Repository`] when the column does not exist or
    /// is at its WIP limit.
    pub async fn add_task_to_column(
        &self,
        column_id: ColumnId,
        request: AddTaskRequest,
    ) -> KanbanServiceResult<Task> {
        let draft = TaskDraft::new(TaskTitle::new(request.title)?, request.content, &*self.clock);
        let task = self
            .repository
            .add_task(column_id, &draft)
            .await
            .inspect_err(log_rejection)?;
        info!(
            task_id = %task.id(),
            column_id = %column_id,
            position = task.position(),
            "task added"
        );
        Ok(task)
    }

    /// Adds a task at the end of a board's landing column.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanServiceError::Domain`] for a blank title, or
    /// [`KanbanServiceError::Repository`] when the board does not exist, has
    /// no landing column, or its landing column is full.
    pub async fn add_task_to_board(
        &self,
        board_id: BoardId,
        request: AddTaskRequest,
    ) -> KanbanServiceResult<Task> {
        let draft = TaskDraft::new(TaskTitle::new(request.title)?, request.content, &*self.clock);
        let task = self
            .repository
            .add_task_to_landing(board_id, &draft)
            .await
            .inspect_err(log_rejection)?;
        info!(
            task_id = %task.id(),
            board_id = %board_id,
            column_id = %task.column_id(),
            "task added to landing column"
        );
        Ok(task)
    }

    /// Edits a task's content, and optionally its title, in place.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanServiceError::Domain`] for a blank replacement title,
    /// or [`KanbanServiceError::Repository`] when the task does not exist.
    pub async fn update_task(
        &self,
        id: TaskId,
        request: UpdateTaskRequest,
    ) -> KanbanServiceResult<Task> {
        let mut edit = TaskEdit::new(request.content, &*self.clock)
            .with_reason(request.reason.and_then(TransitionReason::new));
        if let Some(title) = request.title {
            edit = edit.with_title(TaskTitle::new(title)?);
        }

        let task = self.repository.update_task(id, &edit).await?;
        info!(task_id = %id, "task updated");
        Ok(task)
    }

    /// Moves a task to the end of another column.
    ///
    /// Moving a task into the column it already occupies only refreshes its
    /// timestamp and reason.
    ///
    /// # Errors
    ///
    /// Returns [`KanbanServiceError::Repository`] when the task or target
    /// column does not exist, or the target column is at its WIP limit. The
    /// task is unchanged on any error.
    pub async fn move_task(&self, request: MoveTaskRequest) -> KanbanServiceResult<Task> {
        let transition = TaskTransition::new(
            request.task_id,
            request.target_column_id,
            request.reason.and_then(TransitionReason::new),
            &*self.clock,
        );
        let task = self
            .repository
            .move_task(&transition)
            .await
            .inspect_err(log_rejection)?;
        info!(
            task_id = %task.id(),
            column_id = %task.column_id(),
            position = task.position(),
            reason = task.update_reason(),
            "task moved"
        );
        Ok(task)
    }

    /// Deletes a task, returning the rows removed (zero when absent).
    ///
    /// # Errors
    ///
    /// Returns [`KanbanServiceError::Repository`] when persistence fails.
    pub async fn delete_task(&self, id: TaskId) -> KanbanServiceResult<u64> {
        let removed = self.repository.delete_task(id).await?;
        if removed == 0 {
            debug!(task_id = %id, "task already absent");
        } else {
            info!(task_id = %id, "task deleted");
        }
        Ok(removed)
    }

    /// Deletes a board with its columns and tasks, returning the total rows
    /// removed (zero when absent).
    ///
    /// # Errors
    ///
    /// Returns [`KanbanServiceError::Repository`] when persistence fails.
    pub async fn delete_board(&self, id: BoardId) -> KanbanServiceResult<u64> {
        let removed = self.repository.delete_board(id).await?;
        if removed == 0 {
            debug!(board_id = %id, "board already absent");
        } else {
            info!(board_id = %id, removed, "board deleted");
        }
        Ok(removed)
    }
}

fn log_rejection(err: &KanbanRepositoryError) {
    if let KanbanRepositoryError::CapacityExceeded(rejection) = err {
        warn!(
            column_id = %rejection.column_id,
            limit = rejection.limit.value(),
            "capacity check rejected task"
        );
    }
}


//! `SQLite` repository implementation for kanban storage.
//!
//! Mutations run inside `BEGIN IMMEDIATE` transactions, which take the
//! database write lock up front. A capacity check and the insert or update it
//! gates therefore can never interleave with another writer.

use super::{
    connection::KanbanSqlitePool,
    models::{BoardRow, ColumnRow},
    queries::{
        affected, clear_all, insert_snapshot, load_board, load_boards, load_column,
        load_columns_of, load_snapshot, load_task, load_tasks_in, next_task_position, occupancy,
        place_task, store_task,
    },
    schema::{board_columns, boards, tasks},
};
use crate::board::{
    domain::{
        Board, BoardId, BoardLayout, BoardView, Column, ColumnId, DatabaseSnapshot, Task,
        TaskDraft, TaskEdit, TaskId, TaskTransition,
    },
    ports::{KanbanRepository, KanbanRepositoryError, KanbanRepositoryResult},
};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel::sqlite::SqliteConnection;

impl From<DieselError> for KanbanRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

/// `SQLite`-backed kanban repository.
#[derive(Debug, Clone)]
pub struct SqliteKanbanRepository {
    pool: KanbanSqlitePool,
}

impl SqliteKanbanRepository {
    /// Creates a new repository from an `SQLite` connection pool.
    ///
    /// The pool should come from [`super::build_pool`] and have had
    /// [`super::apply_schema`] run against it.
    #[must_use]
    pub const fn new(pool: KanbanSqlitePool) -> Self {
        Self { pool }
    }

    /// Returns the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &KanbanSqlitePool {
        &self.pool
    }

    async fn run_blocking<F, T>(&self, f: F) -> KanbanRepositoryResult<T>
    where
        F: FnOnce(&mut SqliteConnection) -> KanbanRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(KanbanRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(KanbanRepositoryError::persistence)?
    }
}

#[async_trait]
impl KanbanRepository for SqliteKanbanRepository {
    async fn create_board(&self, layout: &BoardLayout) -> KanbanRepositoryResult<()> {
        let board_id = layout.board().id();
        let board_row = BoardRow::from(layout.board());
        let column_rows: Vec<ColumnRow> = layout.columns().iter().map(ColumnRow::from).collect();

        self.run_blocking(move |connection| {
            connection.immediate_transaction(|connection| {
                if load_board(connection, board_id)?.is_some() {
                    return Err(KanbanRepositoryError::DuplicateBoard(board_id));
                }

                diesel::insert_into(boards::table)
                    .values(&board_row)
                    .execute(connection)?;
                diesel::insert_into(board_columns::table)
                    .values(&column_rows)
                    .execute(connection)?;
                Ok(())
            })
        })
        .await
    }

    async fn find_board(&self, id: BoardId) -> KanbanRepositoryResult<Option<Board>> {
        self.run_blocking(move |connection| load_board(connection, id))
            .await
    }

    async fn list_boards(&self) -> KanbanRepositoryResult<Vec<Board>> {
        self.run_blocking(load_boards).await
    }

    async fn find_board_view(&self, id: BoardId) -> KanbanRepositoryResult<Option<BoardView>> {
        self.run_blocking(move |connection| {
            connection.transaction(|connection| {
                let Some(board) = load_board(connection, id)? else {
                    return Ok(None);
                };
                let columns = load_columns_of(connection, id)?;
                let column_ids: Vec<String> = columns
                    .iter()
                    .map(|column| column.id().to_string())
                    .collect();
                let tasks = load_tasks_in(connection, &column_ids)?;
                Ok(Some(BoardView::assemble(board, columns, tasks)))
            })
        })
        .await
    }

    async fn find_column(&self, id: ColumnId) -> KanbanRepositoryResult<Option<Column>> {
        self.run_blocking(move |connection| load_column(connection, id))
            .await
    }

    async fn list_column_tasks(&self, id: ColumnId) -> KanbanRepositoryResult<Option<Vec<Task>>> {
        self.run_blocking(move |connection| {
            connection.transaction(|connection| {
                if load_column(connection, id)?.is_none() {
                    return Ok(None);
                }
                load_tasks_in(connection, &[id.to_string()]).map(Some)
            })
        })
        .await
    }

    async fn find_task(&self, id: TaskId) -> KanbanRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| load_task(connection, id))
            .await
    }

    async fn add_task(
        &self,
        column_id: ColumnId,
        draft: &TaskDraft,
    ) -> KanbanRepositoryResult<Task> {
        let draft = draft.clone();
        self.run_blocking(move |connection| {
            connection
                .immediate_transaction(|connection| place_task(connection, column_id, &draft))
        })
        .await
    }

    async fn add_task_to_landing(
        &self,
        board_id: BoardId,
        draft: &TaskDraft,
    ) -> KanbanRepositoryResult<Task> {
        let draft = draft.clone();
        self.run_blocking(move |connection| {
            connection.immediate_transaction(|connection| {
                let board = load_board(connection, board_id)?
                    .ok_or(KanbanRepositoryError::BoardNotFound(board_id))?;
                let landing = board
                    .landing_column_id()
                    .ok_or(KanbanRepositoryError::NoLandingColumn(board_id))?;
                place_task(connection, landing, &draft)
            })
        })
        .await
    }

    async fn update_task(&self, id: TaskId, edit: &TaskEdit) -> KanbanRepositoryResult<Task> {
        let edit = edit.clone();
        self.run_blocking(move |connection| {
            connection.immediate_transaction(|connection| {
                let mut task =
                    load_task(connection, id)?.ok_or(KanbanRepositoryError::TaskNotFound(id))?;
                task.apply_edit(&edit);
                store_task(connection, &task)?;
                Ok(task)
            })
        })
        .await
    }

    async fn move_task(&self, transition: &TaskTransition) -> KanbanRepositoryResult<Task> {
        let transition = transition.clone();
        self.run_blocking(move |connection| {
            connection.immediate_transaction(|connection| {
                let task_id = transition.task_id();
                let target_id = transition.target_column_id();

                let mut task = load_task(connection, task_id)?
                    .ok_or(KanbanRepositoryError::TaskNotFound(task_id))?;
                let target = load_column(connection, target_id)?
                    .ok_or(KanbanRepositoryError::ColumnNotFound(target_id))?;

                let occupancy = occupancy(connection, target_id)?;
                let position = if task.column_id() == target_id {
                    task.position()
                } else {
                    next_task_position(connection, target_id)?
                };
                task.move_to(&target, occupancy, position, &transition)?;
                store_task(connection, &task)?;
                Ok(task)
            })
        })
        .await
    }

    async fn delete_task(&self, id: TaskId) -> KanbanRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            let removed = diesel::delete(tasks::table.filter(tasks::id.eq(id.to_string())))
                .execute(connection)?;
            affected(removed)
        })
        .await
    }

    async fn delete_board(&self, id: BoardId) -> KanbanRepositoryResult<u64> {
        self.run_blocking(move |connection| {
            connection.immediate_transaction(|connection| {
                let board_key = id.to_string();
                let column_ids: Vec<String> = board_columns::table
                    .filter(board_columns::board_id.eq(&board_key))
                    .select(board_columns::id)
                    .load::<String>(connection)?;

                let tasks_removed =
                    diesel::delete(tasks::table.filter(tasks::column_id.eq_any(&column_ids)))
                        .execute(connection)?;
                let columns_removed = diesel::delete(
                    board_columns::table.filter(board_columns::board_id.eq(&board_key)),
                )
                .execute(connection)?;
                let boards_removed =
                    diesel::delete(boards::table.filter(boards::id.eq(&board_key)))
                        .execute(connection)?;

                affected(boards_removed + columns_removed + tasks_removed)
            })
        })
        .await
    }

    async fn export_snapshot(&self) -> KanbanRepositoryResult<DatabaseSnapshot> {
        self.run_blocking(|connection| connection.transaction(load_snapshot))
            .await
    }

    async fn replace_all(&self, snapshot: &DatabaseSnapshot) -> KanbanRepositoryResult<()> {
        let snapshot = snapshot.clone();
        self.run_blocking(move |connection| {
            connection.immediate_transaction(|connection| {
                snapshot.validate()?;
                clear_all(connection)?;
                insert_snapshot(connection, &snapshot)
            })
        })
        .await
    }
}

//! In-memory kanban repository.
//!
//! All state sits behind one `RwLock`. Mutations hold the write guard for
//! their whole check-then-write sequence, which gives each the atomicity of
//! a serializable transaction; reads share the read guard and therefore
//! always see a committed state.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::board::{
    domain::{
        Board, BoardId, BoardLayout, BoardView, Column, ColumnId, DatabaseSnapshot, Task,
        TaskDraft, TaskEdit, TaskId, TaskTransition, next_position,
    },
    ports::{KanbanRepository, KanbanRepositoryError, KanbanRepositoryResult},
};

/// Thread-safe in-memory kanban repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryKanbanRepository {
    state: Arc<RwLock<InMemoryKanbanState>>,
}

#[derive(Debug, Default)]
struct InMemoryKanbanState {
    boards: HashMap<BoardId, Board>,
    columns: HashMap<ColumnId, Column>,
    tasks: HashMap<TaskId, Task>,
}

impl InMemoryKanbanRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> KanbanRepositoryResult<RwLockReadGuard<'_, InMemoryKanbanState>> {
        self.state.read().map_err(|err| {
            KanbanRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> KanbanRepositoryResult<RwLockWriteGuard<'_, InMemoryKanbanState>> {
        self.state.write().map_err(|err| {
            KanbanRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

impl InMemoryKanbanState {
    fn tasks_in(&self, column_id: ColumnId) -> impl Iterator<Item = &Task> {
        self.tasks
            .values()
            .filter(move |task| task.column_id() == column_id)
    }

    fn occupancy(&self, column_id: ColumnId) -> usize {
        self.tasks_in(column_id).count()
    }

    fn next_position(&self, column_id: ColumnId) -> KanbanRepositoryResult<i64> {
        next_position(self.tasks_in(column_id).map(Task::position))
            .ok_or(KanbanRepositoryError::PositionsExhausted(column_id))
    }

    fn columns_of(&self, board_id: BoardId) -> Vec<Column> {
        self.columns
            .values()
            .filter(|column| column.board_id() == board_id)
            .cloned()
            .collect()
    }

    fn sorted_tasks_in(&self, column_id: ColumnId) -> Vec<Task> {
        let mut tasks: Vec<Task> = self.tasks_in(column_id).cloned().collect();
        tasks.sort_by_key(Task::position);
        tasks
    }

    fn place(&mut self, column_id: ColumnId, draft: &TaskDraft) -> KanbanRepositoryResult<Task> {
        let column = self
            .columns
            .get(&column_id)
            .ok_or(KanbanRepositoryError::ColumnNotFound(column_id))?;
        column.admit(self.occupancy(column_id))?;

        let task = draft.place(column_id, self.next_position(column_id)?);
        self.tasks.insert(task.id(), task.clone());
        Ok(task)
    }

    fn snapshot(&self) -> DatabaseSnapshot {
        let mut boards: Vec<Board> = self.boards.values().cloned().collect();
        boards.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(&b.id()))
        });

        let mut columns: Vec<Column> = self.columns.values().cloned().collect();
        columns.sort_by_key(|column| (column.board_id(), column.position()));

        let mut tasks: Vec<Task> = self.tasks.values().cloned().collect();
        tasks.sort_by_key(|task| (task.column_id(), task.position()));

        DatabaseSnapshot {
            boards,
            columns,
            tasks,
        }
    }
}

#[async_trait]
impl KanbanRepository for InMemoryKanbanRepository {
    async fn create_board(&self, layout: &BoardLayout) -> KanbanRepositoryResult<()> {
        let mut state = self.write()?;
        let board = layout.board();
        if state.boards.contains_key(&board.id()) {
            return Err(KanbanRepositoryError::DuplicateBoard(board.id()));
        }

        state.boards.insert(board.id(), board.clone());
        for column in layout.columns() {
            state.columns.insert(column.id(), column.clone());
        }
        Ok(())
    }

    async fn find_board(&self, id: BoardId) -> KanbanRepositoryResult<Option<Board>> {
        let state = self.read()?;
        Ok(state.boards.get(&id).cloned())
    }

    async fn list_boards(&self) -> KanbanRepositoryResult<Vec<Board>> {
        let state = self.read()?;
        Ok(state.snapshot().boards)
    }

    async fn find_board_view(&self, id: BoardId) -> KanbanRepositoryResult<Option<BoardView>> {
        let state = self.read()?;
        let Some(board) = state.boards.get(&id).cloned() else {
            return Ok(None);
        };
        let columns = state.columns_of(id);
        let tasks = columns
            .iter()
            .flat_map(|column| state.tasks_in(column.id()).cloned())
            .collect();
        Ok(Some(BoardView::assemble(board, columns, tasks)))
    }

    async fn find_column(&self, id: ColumnId) -> KanbanRepositoryResult<Option<Column>> {
        let state = self.read()?;
        Ok(state.columns.get(&id).cloned())
    }

    async fn list_column_tasks(&self, id: ColumnId) -> KanbanRepositoryResult<Option<Vec<Task>>> {
        let state = self.read()?;
        if !state.columns.contains_key(&id) {
            return Ok(None);
        }
        Ok(Some(state.sorted_tasks_in(id)))
    }

    async fn find_task(&self, id: TaskId) -> KanbanRepositoryResult<Option<Task>> {
        let state = self.read()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn add_task(
        &self,
        column_id: ColumnId,
        draft: &TaskDraft,
    ) -> KanbanRepositoryResult<Task> {
        let mut state = self.write()?;
        state.place(column_id, draft)
    }

    async fn add_task_to_landing(
        &self,
        board_id: BoardId,
        draft: &TaskDraft,
    ) -> KanbanRepositoryResult<Task> {
        let mut state = self.write()?;
        let board = state
            .boards
            .get(&board_id)
            .ok_or(KanbanRepositoryError::BoardNotFound(board_id))?;
        let landing = board
            .landing_column_id()
            .ok_or(KanbanRepositoryError::NoLandingColumn(board_id))?;
        state.place(landing, draft)
    }

    async fn update_task(&self, id: TaskId, edit: &TaskEdit) -> KanbanRepositoryResult<Task> {
        let mut state = self.write()?;
        let task = state
            .tasks
            .get_mut(&id)
            .ok_or(KanbanRepositoryError::TaskNotFound(id))?;
        task.apply_edit(edit);
        Ok(task.clone())
    }

    async fn move_task(&self, transition: &TaskTransition) -> KanbanRepositoryResult<Task> {
        let mut state = self.write()?;
        let task_id = transition.task_id();
        let target_id = transition.target_column_id();

        let mut task = state
            .tasks
            .get(&task_id)
            .cloned()
            .ok_or(KanbanRepositoryError::TaskNotFound(task_id))?;
        let target = state
            .columns
            .get(&target_id)
            .ok_or(KanbanRepositoryError::ColumnNotFound(target_id))?;

        let position = if task.column_id() == target_id {
            task.position()
        } else {
            state.next_position(target_id)?
        };
        task.move_to(target, state.occupancy(target_id), position, transition)?;
        state.tasks.insert(task_id, task.clone());
        Ok(task)
    }

    async fn delete_task(&self, id: TaskId) -> KanbanRepositoryResult<u64> {
        let mut state = self.write()?;
        Ok(u64::from(state.tasks.remove(&id).is_some()))
    }

    async fn delete_board(&self, id: BoardId) -> KanbanRepositoryResult<u64> {
        let mut state = self.write()?;
        if state.boards.remove(&id).is_none() {
            return Ok(0);
        }

        let column_ids: Vec<ColumnId> = state
            .columns_of(id)
            .iter()
            .map(Column::id)
            .collect();
        let tasks_before = state.tasks.len();
        state
            .tasks
            .retain(|_, task| !column_ids.contains(&task.column_id()));
        let tasks_removed = tasks_before - state.tasks.len();
        for column_id in &column_ids {
            state.columns.remove(column_id);
        }

        let removed = 1 + column_ids.len() + tasks_removed;
        u64::try_from(removed).map_err(KanbanRepositoryError::persistence)
    }

    async fn export_snapshot(&self) -> KanbanRepositoryResult<DatabaseSnapshot> {
        let state = self.read()?;
        Ok(state.snapshot())
    }

    async fn replace_all(&self, snapshot: &DatabaseSnapshot) -> KanbanRepositoryResult<()> {
        let mut state = self.write()?;
        snapshot.validate()?;

        *state = InMemoryKanbanState {
            boards: snapshot
                .boards
                .iter()
                .map(|board| (board.id(), board.clone()))
                .collect(),
            columns: snapshot
                .columns
                .iter()
                .map(|column| (column.id(), column.clone()))
                .collect(),
            tasks: snapshot
                .tasks
                .iter()
                .map(|task| (task.id(), task.clone()))
                .collect(),
        };
        Ok(())
    }
}

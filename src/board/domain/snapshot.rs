//! Whole-store snapshots and the integrity rules an import must satisfy.

use super::{Board, BoardId, Column, ColumnId, Task, TaskId, WipLimit};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Every board, column, and task in a store at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSnapshot {
    /// Boards ordered by creation time, then identifier.
    pub boards: Vec<Board>,
    /// Columns ordered by board, then position.
    pub columns: Vec<Column>,
    /// Tasks ordered by column, then position.
    pub tasks: Vec<Task>,
}

/// Integrity violation found in an import payload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImportError {
    /// Two boards share an identifier.
    #[error("duplicate board identifier: {0}")]
    DuplicateBoard(BoardId),

    /// Two columns share an identifier.
    #[error("duplicate column identifier: {0}")]
    DuplicateColumn(ColumnId),

    /// Two tasks share an identifier.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// A column references a board missing from the payload.
    #[error("column {column_id} references unknown board {board_id}")]
    DanglingColumn {
        /// The offending column.
        column_id: ColumnId,
        /// The unresolved board reference.
        board_id: BoardId,
    },

    /// A task references a column missing from the payload.
    #[error("task {task_id} references unknown column {column_id}")]
    DanglingTask {
        /// The offending task.
        task_id: TaskId,
        /// The unresolved column reference.
        column_id: ColumnId,
    },

    /// A board's landing column is missing or belongs to another board.
    #[error("board {board_id} lands on column {column_id}, which is not one of its columns")]
    ForeignLandingColumn {
        /// The offending board.
        board_id: BoardId,
        /// The landing column reference.
        column_id: ColumnId,
    },

    /// Two columns of one board share a position.
    #[error("board {board_id} has more than one column at position {position}")]
    DuplicateColumnPosition {
        /// The board holding the columns.
        board_id: BoardId,
        /// The repeated position.
        position: i64,
    },

    /// Two tasks of one column share a position.
    #[error("column {column_id} has more than one task at position {position}")]
    DuplicateTaskPosition {
        /// The column holding the tasks.
        column_id: ColumnId,
        /// The repeated position.
        position: i64,
    },

    /// The payload places more tasks in a column than its WIP limit allows.
    #[error("column {column_id} would hold {count} tasks, above its WIP limit of {limit}")]
    CapacityExceeded {
        /// The overfull column.
        column_id: ColumnId,
        /// The configured limit.
        limit: WipLimit,
        /// Tasks the payload places in the column.
        count: usize,
    },
}

impl DatabaseSnapshot {
    /// Returns `true` when the snapshot holds no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boards.is_empty() && self.columns.is_empty() && self.tasks.is_empty()
    }

    /// Checks that the snapshot could be installed as a complete store.
    ///
    /// References are resolved against the snapshot itself, since an import
    /// replaces every existing row.
    ///
    /// # Errors
    ///
    /// Returns the first [`ImportError`] found.
    pub fn validate(&self) -> Result<(), ImportError> {
        let board_ids = self.board_ids()?;
        let columns = self.index_columns(&board_ids)?;
        self.check_landing_columns(&columns)?;
        self.check_tasks(&columns)
    }

    fn board_ids(&self) -> Result<HashSet<BoardId>, ImportError> {
        let mut ids = HashSet::with_capacity(self.boards.len());
        for board in &self.boards {
            if !ids.insert(board.id()) {
                return Err(ImportError::DuplicateBoard(board.id()));
            }
        }
        Ok(ids)
    }

    fn index_columns(
        &self,
        board_ids: &HashSet<BoardId>,
    ) -> Result<HashMap<ColumnId, &Column>, ImportError> {
        let mut columns = HashMap::with_capacity(self.columns.len());
        let mut positions = HashSet::with_capacity(self.columns.len());
        for column in &self.columns {
            if !board_ids.contains(&column.board_id()) {
                return Err(ImportError::DanglingColumn {
                    column_id: column.id(),
                    board_id: column.board_id(),
                });
            }
            if columns.insert(column.id(), column).is_some() {
                return Err(ImportError::DuplicateColumn(column.id()));
            }
            if !positions.insert((column.board_id(), column.position())) {
                return Err(ImportError::DuplicateColumnPosition {
                    board_id: column.board_id(),
                    position: column.position(),
                });
            }
        }
        Ok(columns)
    }

    fn check_landing_columns(
        &self,
        columns: &HashMap<ColumnId, &Column>,
    ) -> Result<(), ImportError> {
        for board in &self.boards {
            let Some(landing) = board.landing_column_id() else {
                continue;
            };
            let owned = columns
                .get(&landing)
                .is_some_and(|column| column.board_id() == board.id());
            if !owned {
                return Err(ImportError::ForeignLandingColumn {
                    board_id: board.id(),
                    column_id: landing,
                });
            }
        }
        Ok(())
    }

    fn check_tasks(&self, columns: &HashMap<ColumnId, &Column>) -> Result<(), ImportError> {
        let mut ids = HashSet::with_capacity(self.tasks.len());
        let mut positions = HashSet::with_capacity(self.tasks.len());
        let mut occupancy: HashMap<ColumnId, usize> = HashMap::new();
        for task in &self.tasks {
            if !ids.insert(task.id()) {
                return Err(ImportError::DuplicateTask(task.id()));
            }
            if !columns.contains_key(&task.column_id()) {
                return Err(ImportError::DanglingTask {
                    task_id: task.id(),
                    column_id: task.column_id(),
                });
            }
            if !positions.insert((task.column_id(), task.position())) {
                return Err(ImportError::DuplicateTaskPosition {
                    column_id: task.column_id(),
                    position: task.position(),
                });
            }
            *occupancy.entry(task.column_id()).or_default() += 1;
        }

        for (column_id, count) in occupancy {
            let Some(column) = columns.get(&column_id) else {
                continue;
            };
            if !column.wip_limit().holds(count) {
                return Err(ImportError::CapacityExceeded {
                    column_id,
                    limit: column.wip_limit(),
                    count,
                });
            }
        }
        Ok(())
    }
}

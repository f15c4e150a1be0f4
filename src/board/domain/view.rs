//! Read projection of a board with its columns and their tasks.

use super::{Board, Column, Task};
use serde::{Deserialize, Serialize};

/// A column populated with its tasks in position order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnView {
    /// The column itself.
    #[serde(flatten)]
    pub column: Column,
    /// Tasks in the column, ordered by position.
    pub tasks: Vec<Task>,
}

/// A board populated with its columns in position order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    /// The board itself.
    pub board: Board,
    /// Columns of the board, ordered by position.
    pub columns: Vec<ColumnView>,
}

impl BoardView {
    /// Groups `tasks` under `columns` and orders both by position.
    ///
    /// Tasks whose column is not among `columns` are dropped.
    #[must_use]
    pub fn assemble(board: Board, mut columns: Vec<Column>, mut tasks: Vec<Task>) -> Self {
        columns.sort_by_key(Column::position);
        tasks.sort_by_key(Task::position);

        let columns = columns
            .into_iter()
            .map(|column| {
                let (owned, rest): (Vec<Task>, Vec<Task>) = tasks
                    .drain(..)
                    .partition(|task| task.column_id() == column.id());
                tasks = rest;
                ColumnView {
                    column,
                    tasks: owned,
                }
            })
            .collect();

        Self { board, columns }
    }

    /// Returns the total number of tasks on the board.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.columns.iter().map(|column| column.tasks.len()).sum()
    }
}

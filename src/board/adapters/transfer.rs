//! Snake_case transfer records for whole-store export and import.
//!
//! The in-process entities serialize with camelCase field names. Snapshot
//! files exchanged with other tools use the record shapes below instead:
//!
//! | Entity field       | Record field        |
//! |--------------------|---------------------|
//! | `boardId`          | `board_id`          |
//! | `landingColumnId`  | `landing_column_id` |
//! | `wipLimit`         | `wip_limit`         |
//! | `isDoneColumn`     | `is_done_column`    |
//! | `columnId`         | `column_id`         |
//! | `createdAt`        | `created_at`        |
//! | `updatedAt`        | `updated_at`        |
//! | `updateReason`     | `update_reason`     |
//!
//! Imported records may omit their timestamps, `wip_limit`,
//! `is_done_column`, `content`, and `update_reason`. Missing timestamps take
//! the import time.

use crate::board::domain::{
    Board, BoardId, Column, ColumnId, DatabaseSnapshot, PersistedBoardData, PersistedColumnData,
    PersistedTaskData, Task, TaskId, WipLimit,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A complete store as exchanged in snapshot files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferDocument {
    /// Board records.
    #[serde(default)]
    pub boards: Vec<BoardRecord>,
    /// Column records.
    #[serde(default)]
    pub columns: Vec<ColumnRecord>,
    /// Task records.
    #[serde(default)]
    pub tasks: Vec<TaskRecord>,
}

/// Board record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardRecord {
    /// Board identifier.
    pub id: BoardId,
    /// Board name.
    pub name: String,
    /// Free-text goal.
    pub goal: String,
    /// Landing column identifier.
    #[serde(default)]
    pub landing_column_id: Option<ColumnId>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Column record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRecord {
    /// Column identifier.
    pub id: ColumnId,
    /// Owning board identifier.
    pub board_id: BoardId,
    /// Column name.
    pub name: String,
    /// Ordering key within the board.
    pub position: i64,
    /// WIP limit; zero means unlimited.
    #[serde(default)]
    pub wip_limit: u32,
    /// Whether the column holds completed work.
    #[serde(default)]
    pub is_done_column: bool,
}

/// Task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Task identifier.
    pub id: TaskId,
    /// Column identifier.
    pub column_id: ColumnId,
    /// Task title.
    pub title: String,
    /// Markdown content.
    #[serde(default)]
    pub content: String,
    /// Ordering key within the column.
    pub position: i64,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Reason recorded with the latest move or edit.
    #[serde(default)]
    pub update_reason: Option<String>,
}

impl From<&Board> for BoardRecord {
    fn from(board: &Board) -> Self {
        Self {
            id: board.id(),
            name: board.name().to_owned(),
            goal: board.goal().to_owned(),
            landing_column_id: board.landing_column_id(),
            created_at: Some(board.created_at()),
            updated_at: Some(board.updated_at()),
        }
    }
}

impl From<&Column> for ColumnRecord {
    fn from(column: &Column) -> Self {
        Self {
            id: column.id(),
            board_id: column.board_id(),
            name: column.name().to_owned(),
            position: column.position(),
            wip_limit: column.wip_limit().value(),
            is_done_column: column.is_done_column(),
        }
    }
}

impl From<&Task> for TaskRecord {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id(),
            column_id: task.column_id(),
            title: task.title().to_owned(),
            content: task.content().to_owned(),
            position: task.position(),
            created_at: Some(task.created_at()),
            updated_at: Some(task.updated_at()),
            update_reason: task.update_reason().map(str::to_owned),
        }
    }
}

impl BoardRecord {
    fn into_board(self, now: DateTime<Utc>) -> Board {
        let created_at = self.created_at.unwrap_or(now);
        Board::from_persisted(PersistedBoardData {
            id: self.id,
            name: self.name,
            goal: self.goal,
            landing_column_id: self.landing_column_id,
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
        })
    }
}

impl From<ColumnRecord> for Column {
    fn from(record: ColumnRecord) -> Self {
        Self::from_persisted(PersistedColumnData {
            id: record.id,
            board_id: record.board_id,
            name: record.name,
            position: record.position,
            wip_limit: WipLimit::new(record.wip_limit),
            is_done_column: record.is_done_column,
        })
    }
}

impl TaskRecord {
    fn into_task(self, now: DateTime<Utc>) -> Task {
        let created_at = self.created_at.unwrap_or(now);
        Task::from_persisted(PersistedTaskData {
            id: self.id,
            column_id: self.column_id,
            title: self.title,
            content: self.content,
            position: self.position,
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
            update_reason: self.update_reason,
        })
    }
}

impl From<&DatabaseSnapshot> for TransferDocument {
    fn from(snapshot: &DatabaseSnapshot) -> Self {
        Self {
            boards: snapshot.boards.iter().map(BoardRecord::from).collect(),
            columns: snapshot.columns.iter().map(ColumnRecord::from).collect(),
            tasks: snapshot.tasks.iter().map(TaskRecord::from).collect(),
        }
    }
}

impl TransferDocument {
    /// Converts the records into domain entities.
    ///
    /// A missing `created_at` becomes `now`; a missing `updated_at` becomes
    /// the record's creation time. Integrity is not checked here; see
    /// [`DatabaseSnapshot::validate`].
    #[must_use]
    pub fn into_snapshot(self, now: DateTime<Utc>) -> DatabaseSnapshot {
        DatabaseSnapshot {
            boards: self
                .boards
                .into_iter()
                .map(|record| record.into_board(now))
                .collect(),
            columns: self.columns.into_iter().map(Column::from).collect(),
            tasks: self
                .tasks
                .into_iter()
                .map(|record| record.into_task(now))
                .collect(),
        }
    }
}

//! Diesel row models and their conversions to domain entities.

use super::schema::{board_columns, boards, tasks};
use crate::board::{
    domain::{
        Board, BoardId, Column, ColumnId, PersistedBoardData, PersistedColumnData,
        PersistedTaskData, Task, TaskId, WipLimit,
    },
    ports::{KanbanRepositoryError, KanbanRepositoryResult},
};
use chrono::{DateTime, SecondsFormat, Utc};
use diesel::prelude::*;
use uuid::Uuid;

/// Board row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = boards)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BoardRow {
    /// Board identifier.
    pub id: String,
    /// Board name.
    pub name: String,
    /// Free-text goal.
    pub goal: String,
    /// Landing column identifier.
    pub landing_column_id: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

/// Column row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = board_columns)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ColumnRow {
    /// Column identifier.
    pub id: String,
    /// Owning board identifier.
    pub board_id: String,
    /// Column name.
    pub name: String,
    /// Ordering key within the board.
    pub position: i64,
    /// WIP limit; zero means unlimited.
    pub wip_limit: i64,
    /// Whether the column holds completed work.
    pub is_done_column: bool,
}

/// Task row.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TaskRow {
    /// Task identifier.
    pub id: String,
    /// Column identifier.
    pub column_id: String,
    /// Task title.
    pub title: String,
    /// Markdown content.
    pub content: String,
    /// Ordering key within the column.
    pub position: i64,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
    /// Reason recorded with the latest move or edit.
    pub update_reason: Option<String>,
}

/// Formats a timestamp so that text order matches time order.
pub fn encode_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn decode_timestamp(raw: &str) -> KanbanRepositoryResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .map_err(KanbanRepositoryError::persistence)
}

fn decode_uuid(raw: &str) -> KanbanRepositoryResult<Uuid> {
    Uuid::parse_str(raw).map_err(KanbanRepositoryError::persistence)
}

impl From<&Board> for BoardRow {
    fn from(board: &Board) -> Self {
        Self {
            id: board.id().to_string(),
            name: board.name().to_owned(),
            goal: board.goal().to_owned(),
            landing_column_id: board.landing_column_id().map(|id| id.to_string()),
            created_at: encode_timestamp(board.created_at()),
            updated_at: encode_timestamp(board.updated_at()),
        }
    }
}

impl From<&Column> for ColumnRow {
    fn from(column: &Column) -> Self {
        Self {
            id: column.id().to_string(),
            board_id: column.board_id().to_string(),
            name: column.name().to_owned(),
            position: column.position(),
            wip_limit: i64::from(column.wip_limit().value()),
            is_done_column: column.is_done_column(),
        }
    }
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id().to_string(),
            column_id: task.column_id().to_string(),
            title: task.title().to_owned(),
            content: task.content().to_owned(),
            position: task.position(),
            created_at: encode_timestamp(task.created_at()),
            updated_at: encode_timestamp(task.updated_at()),
            update_reason: task.update_reason().map(str::to_owned),
        }
    }
}

/// Converts a stored board row into the domain entity.
pub fn row_to_board(row: BoardRow) -> KanbanRepositoryResult<Board> {
    let landing_column_id = row
        .landing_column_id
        .as_deref()
        .map(decode_uuid)
        .transpose()?
        .map(ColumnId::from_uuid);

    Ok(Board::from_persisted(PersistedBoardData {
        id: BoardId::from_uuid(decode_uuid(&row.id)?),
        name: row.name,
        goal: row.goal,
        landing_column_id,
        created_at: decode_timestamp(&row.created_at)?,
        updated_at: decode_timestamp(&row.updated_at)?,
    }))
}

/// Converts a stored column row into the domain entity.
pub fn row_to_column(row: ColumnRow) -> KanbanRepositoryResult<Column> {
    let wip_limit = u32::try_from(row.wip_limit).map_err(KanbanRepositoryError::persistence)?;

    Ok(Column::from_persisted(PersistedColumnData {
        id: ColumnId::from_uuid(decode_uuid(&row.id)?),
        board_id: BoardId::from_uuid(decode_uuid(&row.board_id)?),
        name: row.name,
        position: row.position,
        wip_limit: WipLimit::new(wip_limit),
        is_done_column: row.is_done_column,
    }))
}

/// Converts a stored task row into the domain entity.
pub fn row_to_task(row: TaskRow) -> KanbanRepositoryResult<Task> {
    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(decode_uuid(&row.id)?),
        column_id: ColumnId::from_uuid(decode_uuid(&row.column_id)?),
        title: row.title,
        content: row.content,
        position: row.position,
        created_at: decode_timestamp(&row.created_at)?,
        updated_at: decode_timestamp(&row.updated_at)?,
        update_reason: row.update_reason,
    }))
}

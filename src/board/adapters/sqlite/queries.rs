//! Synchronous query helpers shared by repository operations.
//!
//! Each helper runs on a connection the caller already holds, usually inside
//! a transaction, so that a sequence of helpers observes one state.

use super::{
    models::{BoardRow, ColumnRow, TaskRow, row_to_board, row_to_column, row_to_task},
    schema::{board_columns, boards, tasks},
};
use crate::board::{
    domain::{
        Board, BoardId, Column, ColumnId, DatabaseSnapshot, Task, TaskDraft, TaskId, next_position,
    },
    ports::{KanbanRepositoryError, KanbanRepositoryResult},
};
use diesel::dsl::max;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

// Keeps multi-row inserts well under SQLite's bound-parameter limit.
const INSERT_CHUNK: usize = 500;

pub(super) fn load_board(
    connection: &mut SqliteConnection,
    id: BoardId,
) -> KanbanRepositoryResult<Option<Board>> {
    let row = boards::table
        .filter(boards::id.eq(id.to_string()))
        .select(BoardRow::as_select())
        .first::<BoardRow>(connection)
        .optional()?;
    row.map(row_to_board).transpose()
}

pub(super) fn load_boards(connection: &mut SqliteConnection) -> KanbanRepositoryResult<Vec<Board>> {
    boards::table
        .order_by((boards::created_at.asc(), boards::id.asc()))
        .select(BoardRow::as_select())
        .load::<BoardRow>(connection)?
        .into_iter()
        .map(row_to_board)
        .collect()
}

pub(super) fn load_column(
    connection: &mut SqliteConnection,
    id: ColumnId,
) -> KanbanRepositoryResult<Option<Column>> {
    let row = board_columns::table
        .filter(board_columns::id.eq(id.to_string()))
        .select(ColumnRow::as_select())
        .first::<ColumnRow>(connection)
        .optional()?;
    row.map(row_to_column).transpose()
}

pub(super) fn load_columns_of(
    connection: &mut SqliteConnection,
    board_id: BoardId,
) -> KanbanRepositoryResult<Vec<Column>> {
    board_columns::table
        .filter(board_columns::board_id.eq(board_id.to_string()))
        .order_by(board_columns::position.asc())
        .select(ColumnRow::as_select())
        .load::<ColumnRow>(connection)?
        .into_iter()
        .map(row_to_column)
        .collect()
}

pub(super) fn load_task(
    connection: &mut SqliteConnection,
    id: TaskId,
) -> KanbanRepositoryResult<Option<Task>> {
    let row = tasks::table
        .filter(tasks::id.eq(id.to_string()))
        .select(TaskRow::as_select())
        .first::<TaskRow>(connection)
        .optional()?;
    row.map(row_to_task).transpose()
}

pub(super) fn load_tasks_in(
    connection: &mut SqliteConnection,
    column_ids: &[String],
) -> KanbanRepositoryResult<Vec<Task>> {
    tasks::table
        .filter(tasks::column_id.eq_any(column_ids))
        .order_by((tasks::column_id.asc(), tasks::position.asc()))
        .select(TaskRow::as_select())
        .load::<TaskRow>(connection)?
        .into_iter()
        .map(row_to_task)
        .collect()
}

pub(super) fn occupancy(
    connection: &mut SqliteConnection,
    column_id: ColumnId,
) -> KanbanRepositoryResult<usize> {
    let count = tasks::table
        .filter(tasks::column_id.eq(column_id.to_string()))
        .count()
        .get_result::<i64>(connection)?;
    usize::try_from(count).map_err(KanbanRepositoryError::persistence)
}

pub(super) fn next_task_position(
    connection: &mut SqliteConnection,
    column_id: ColumnId,
) -> KanbanRepositoryResult<i64> {
    let highest = tasks::table
        .filter(tasks::column_id.eq(column_id.to_string()))
        .select(max(tasks::position))
        .first::<Option<i64>>(connection)?;
    next_position(highest).ok_or(KanbanRepositoryError::PositionsExhausted(column_id))
}

/// Admits and inserts a drafted task at the end of `column_id`.
pub(super) fn place_task(
    connection: &mut SqliteConnection,
    column_id: ColumnId,
    draft: &TaskDraft,
) -> KanbanRepositoryResult<Task> {
    let column = load_column(connection, column_id)?
        .ok_or(KanbanRepositoryError::ColumnNotFound(column_id))?;
    column.admit(occupancy(connection, column_id)?)?;

    let task = draft.place(column_id, next_task_position(connection, column_id)?);
    diesel::insert_into(tasks::table)
        .values(&TaskRow::from(&task))
        .execute(connection)?;
    Ok(task)
}

/// Writes every mutable task field back to its row.
pub(super) fn store_task(
    connection: &mut SqliteConnection,
    task: &Task,
) -> KanbanRepositoryResult<()> {
    let row = TaskRow::from(task);
    diesel::update(tasks::table.filter(tasks::id.eq(&row.id)))
        .set((
            tasks::column_id.eq(&row.column_id),
            tasks::title.eq(&row.title),
            tasks::content.eq(&row.content),
            tasks::position.eq(row.position),
            tasks::updated_at.eq(&row.updated_at),
            tasks::update_reason.eq(&row.update_reason),
        ))
        .execute(connection)?;
    Ok(())
}

pub(super) fn load_snapshot(
    connection: &mut SqliteConnection,
) -> KanbanRepositoryResult<DatabaseSnapshot> {
    let boards = load_boards(connection)?;
    let columns = board_columns::table
        .order_by((board_columns::board_id.asc(), board_columns::position.asc()))
        .select(ColumnRow::as_select())
        .load::<ColumnRow>(connection)?
        .into_iter()
        .map(row_to_column)
        .collect::<KanbanRepositoryResult<Vec<_>>>()?;
    let tasks = tasks::table
        .order_by((tasks::column_id.asc(), tasks::position.asc()))
        .select(TaskRow::as_select())
        .load::<TaskRow>(connection)?
        .into_iter()
        .map(row_to_task)
        .collect::<KanbanRepositoryResult<Vec<_>>>()?;

    Ok(DatabaseSnapshot {
        boards,
        columns,
        tasks,
    })
}

/// Removes every task, column, and board, children first.
pub(super) fn clear_all(connection: &mut SqliteConnection) -> KanbanRepositoryResult<()> {
    diesel::delete(tasks::table).execute(connection)?;
    diesel::delete(board_columns::table).execute(connection)?;
    diesel::delete(boards::table).execute(connection)?;
    Ok(())
}

/// Inserts a snapshot's rows, parents first.
pub(super) fn insert_snapshot(
    connection: &mut SqliteConnection,
    snapshot: &DatabaseSnapshot,
) -> KanbanRepositoryResult<()> {
    let board_rows: Vec<BoardRow> = snapshot.boards.iter().map(BoardRow::from).collect();
    for chunk in board_rows.chunks(INSERT_CHUNK) {
        diesel::insert_into(boards::table)
            .values(chunk)
            .execute(connection)?;
    }

    let column_rows: Vec<ColumnRow> = snapshot.columns.iter().map(ColumnRow::from).collect();
    for chunk in column_rows.chunks(INSERT_CHUNK) {
        diesel::insert_into(board_columns::table)
            .values(chunk)
            .execute(connection)?;
    }

    let task_rows: Vec<TaskRow> = snapshot.tasks.iter().map(TaskRow::from).collect();
    for chunk in task_rows.chunks(INSERT_CHUNK) {
        diesel::insert_into(tasks::table)
            .values(chunk)
            .execute(connection)?;
    }
    Ok(())
}

pub(super) fn affected(rows: usize) -> KanbanRepositoryResult<u64> {
    u64::try_from(rows).map_err(KanbanRepositoryError::persistence)
}

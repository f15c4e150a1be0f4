//! Domain model for boards, columns, and tasks.
//!
//! The domain owns entity shapes, input validation, the WIP capacity check,
//! task transitions, and snapshot integrity rules. Persistence adapters call
//! into it from inside their transactions so that every adapter enforces the
//! same invariants.

mod board;
mod capacity;
mod column;
mod error;
mod ids;
mod snapshot;
mod task;
mod view;

pub use board::{Board, BoardGoal, BoardLayout, BoardName, PersistedBoardData};
pub use capacity::{CapacityExceeded, WipLimit, check_capacity};
pub use column::{Column, ColumnSpec, PersistedColumnData};
pub use error::BoardDomainError;
pub use ids::{BoardId, ColumnId, TaskId};
pub use snapshot::{DatabaseSnapshot, ImportError};
pub use task::{
    PersistedTaskData, Task, TaskDraft, TaskEdit, TaskTitle, TaskTransition, TransitionReason,
};
pub use view::{BoardView, ColumnView};

/// Returns the position following the highest of `positions`, or `0` when
/// there are none.
///
/// Returns `None` when the highest position is already `i64::MAX`.
#[must_use]
pub fn next_position(positions: impl IntoIterator<Item = i64>) -> Option<i64> {
    positions
        .into_iter()
        .max()
        .map_or(Some(0), |highest| highest.checked_add(1))
}

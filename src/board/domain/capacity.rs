//! Work-in-progress admission control for column membership.
//!
//! Every write that adds a task to a column (creation, a move from another
//! column, an import) must pass [`check_capacity`] against the column's
//! occupancy as observed inside the same transaction as the write.

use super::ColumnId;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Maximum number of tasks a column may hold; zero means unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WipLimit(u32);

impl WipLimit {
    /// A limit that admits any number of tasks.
    pub const UNLIMITED: Self = Self(0);

    /// Creates a limit; `0` means unlimited.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the configured limit.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns `true` when the column has no limit.
    #[must_use]
    pub const fn is_unlimited(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` when one more task may join a column already holding
    /// `occupancy` tasks.
    #[must_use]
    pub fn admits(self, occupancy: usize) -> bool {
        self.is_unlimited() || occupancy < self.0 as usize
    }

    /// Returns `true` when `occupancy` tasks fit within the limit.
    #[must_use]
    pub fn holds(self, occupancy: usize) -> bool {
        self.is_unlimited() || occupancy <= self.0 as usize
    }
}

impl fmt::Display for WipLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rejection raised when a column is already at its WIP limit.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("column {column_id} is at its WIP limit of {limit}")]
pub struct CapacityExceeded {
    /// The column that rejected the task.
    pub column_id: ColumnId,
    /// The configured limit.
    pub limit: WipLimit,
}

/// Decides whether one more task may join `column_id`.
///
/// # Errors
///
/// Returns [`CapacityExceeded`] when `limit` is non-zero and `occupancy` has
/// already reached it.
pub fn check_capacity(
    column_id: ColumnId,
    limit: WipLimit,
    occupancy: usize,
) -> Result<(), CapacityExceeded> {
    if limit.admits(occupancy) {
        Ok(())
    } else {
        Err(CapacityExceeded { column_id, limit })
    }
}

//! Board column entity and the specification used to create it.

use super::{BoardId, CapacityExceeded, ColumnId, WipLimit, check_capacity};
use serde::{Deserialize, Serialize};

/// Caller-supplied description of one column in a new board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSpec {
    name: String,
    position: i64,
    #[serde(default)]
    wip_limit: WipLimit,
    #[serde(default)]
    is_done_column: bool,
}

impl ColumnSpec {
    /// Creates an unlimited, not-done column specification.
    #[must_use]
    pub fn new(name: impl Into<String>, position: i64) -> Self {
        Self {
            name: name.into(),
            position,
            wip_limit: WipLimit::UNLIMITED,
            is_done_column: false,
        }
    }

    /// Sets the WIP limit; `0` means unlimited.
    #[must_use]
    pub const fn with_wip_limit(mut self, limit: u32) -> Self {
        self.wip_limit = WipLimit::new(limit);
        self
    }

    /// Flags the column as holding completed work.
    #[must_use]
    pub const fn done(mut self) -> Self {
        self.is_done_column = true;
        self
    }

    /// Returns the requested column name, untrimmed.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the requested position.
    #[must_use]
    pub const fn position(&self) -> i64 {
        self.position
    }

    /// Returns the requested WIP limit.
    #[must_use]
    pub const fn wip_limit(&self) -> WipLimit {
        self.wip_limit
    }

    /// Returns `true` when the column is a done column.
    #[must_use]
    pub const fn is_done_column(&self) -> bool {
        self.is_done_column
    }
}

/// A column on a board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    id: ColumnId,
    board_id: BoardId,
    name: String,
    position: i64,
    wip_limit: WipLimit,
    is_done_column: bool,
}

/// Parameter object for reconstructing a persisted column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedColumnData {
    /// Persisted column identifier.
    pub id: ColumnId,
    /// Owning board.
    pub board_id: BoardId,
    /// Column name.
    pub name: String,
    /// Ordering key within the board.
    pub position: i64,
    /// WIP limit; zero means unlimited.
    pub wip_limit: WipLimit,
    /// Whether the column holds completed work.
    pub is_done_column: bool,
}

impl Column {
    /// Creates a column on `board_id` from a specification whose name has
    /// already been validated.
    #[must_use]
    pub(crate) fn from_spec(board_id: BoardId, spec: &ColumnSpec) -> Self {
        Self {
            id: ColumnId::new(),
            board_id,
            name: spec.name.trim().to_owned(),
            position: spec.position,
            wip_limit: spec.wip_limit,
            is_done_column: spec.is_done_column,
        }
    }

    /// Reconstructs a column from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedColumnData) -> Self {
        Self {
            id: data.id,
            board_id: data.board_id,
            name: data.name,
            position: data.position,
            wip_limit: data.wip_limit,
            is_done_column: data.is_done_column,
        }
    }

    /// Returns the column identifier.
    #[must_use]
    pub const fn id(&self) -> ColumnId {
        self.id
    }

    /// Returns the owning board identifier.
    #[must_use]
    pub const fn board_id(&self) -> BoardId {
        self.board_id
    }

    /// Returns the column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the ordering key within the board.
    #[must_use]
    pub const fn position(&self) -> i64 {
        self.position
    }

    /// Returns the WIP limit.
    #[must_use]
    pub const fn wip_limit(&self) -> WipLimit {
        self.wip_limit
    }

    /// Returns `true` when the column holds completed work.
    #[must_use]
    pub const fn is_done_column(&self) -> bool {
        self.is_done_column
    }

    /// Admits one more task into a column currently holding `occupancy`
    /// tasks.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityExceeded`] when the column is full.
    pub fn admit(&self, occupancy: usize) -> Result<(), CapacityExceeded> {
        check_capacity(self.id, self.wip_limit, occupancy)
    }
}

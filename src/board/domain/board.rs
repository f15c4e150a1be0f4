//! Board aggregate root and the layout planned when a board is created.

use super::{BoardDomainError, BoardId, Column, ColumnId, ColumnSpec};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Board name, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardName(String);

impl BoardName {
    /// Creates a validated board name.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyBoardName`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BoardDomainError::EmptyBoardName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BoardName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Free-text board goal, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardGoal(String);

impl BoardGoal {
    /// Creates a validated board goal.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError::EmptyBoardGoal`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, BoardDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BoardDomainError::EmptyBoardGoal);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the goal as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Board aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    id: BoardId,
    name: String,
    goal: String,
    landing_column_id: Option<ColumnId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedBoardData {
    /// Persisted board identifier.
    pub id: BoardId,
    /// Board name.
    pub name: String,
    /// Board goal.
    pub goal: String,
    /// Column new tasks are routed into by default.
    pub landing_column_id: Option<ColumnId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Board {
    /// Reconstructs a board from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedBoardData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            goal: data.goal,
            landing_column_id: data.landing_column_id,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the board identifier.
    #[must_use]
    pub const fn id(&self) -> BoardId {
        self.id
    }

    /// Returns the board name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the board goal.
    #[must_use]
    pub fn goal(&self) -> &str {
        &self.goal
    }

    /// Returns the landing column, if any.
    #[must_use]
    pub const fn landing_column_id(&self) -> Option<ColumnId> {
        self.landing_column_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// A new board together with its initial columns, written in one
/// transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardLayout {
    board: Board,
    columns: Vec<Column>,
}

impl BoardLayout {
    /// Plans a board and its columns from caller-supplied specifications.
    ///
    /// The column at `landing_index` becomes the board's landing column.
    ///
    /// # Errors
    ///
    /// Returns [`BoardDomainError`] when `specs` is empty, `landing_index` is
    /// out of range, a column name is blank, or two columns share a
    /// position.
    pub fn plan(
        name: BoardName,
        goal: BoardGoal,
        specs: &[ColumnSpec],
        landing_index: usize,
        clock: &impl Clock,
    ) -> Result<Self, BoardDomainError> {
        if specs.is_empty() {
            return Err(BoardDomainError::NoColumns);
        }
        if landing_index >= specs.len() {
            return Err(BoardDomainError::LandingIndexOutOfRange {
                index: landing_index,
                column_count: specs.len(),
            });
        }

        let mut positions = HashSet::with_capacity(specs.len());
        for (index, spec) in specs.iter().enumerate() {
            if spec.name().trim().is_empty() {
                return Err(BoardDomainError::EmptyColumnName { index });
            }
            if !positions.insert(spec.position()) {
                return Err(BoardDomainError::DuplicateColumnPosition(spec.position()));
            }
        }

        let board_id = BoardId::new();
        let columns: Vec<Column> = specs
            .iter()
            .map(|spec| Column::from_spec(board_id, spec))
            .collect();
        let landing_column_id = columns.get(landing_index).map(Column::id);
        let timestamp = clock.utc();

        let board = Board {
            id: board_id,
            name: name.as_str().to_owned(),
            goal: goal.as_str().to_owned(),
            landing_column_id,
            created_at: timestamp,
            updated_at: timestamp,
        };
        Ok(Self { board, columns })
    }

    /// Returns the planned board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the planned columns in specification order.
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }
}

//! Error types for board domain validation.

use thiserror::Error;

/// Errors returned while constructing board, column, and task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// The board name is empty after trimming.
    #[error("board name must not be empty")]
    EmptyBoardName,

    /// The board goal is empty after trimming.
    #[error("board goal must not be empty")]
    EmptyBoardGoal,

    /// A board must be created with at least one column.
    #[error("a board requires at least one column")]
    NoColumns,

    /// The landing index does not designate one of the supplied columns.
    #[error("landing index {index} is out of range for {column_count} columns")]
    LandingIndexOutOfRange {
        /// The requested landing index.
        index: usize,
        /// Number of columns supplied.
        column_count: usize,
    },

    /// A column specification has an empty name.
    #[error("column at index {index} must have a name")]
    EmptyColumnName {
        /// Index of the offending column specification.
        index: usize,
    },

    /// Two column specifications share a position.
    #[error("column position {0} is used more than once")]
    DuplicateColumnPosition(i64),

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTaskTitle,
}

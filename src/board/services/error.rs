//! Service-level errors and their coarse classification.

use crate::board::{domain::BoardDomainError, ports::KanbanRepositoryError};
use thiserror::Error;

/// Coarse error category for mapping failures onto an outer protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A referenced board, column, or task does not exist.
    NotFound,
    /// A column is at its WIP limit.
    CapacityExceeded,
    /// The request was malformed.
    Validation,
    /// An import payload was rejected.
    Import,
    /// Storage or serialization failed.
    Internal,
}

impl KanbanRepositoryError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::BoardNotFound(_) | Self::ColumnNotFound(_) | Self::TaskNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::CapacityExceeded(_) => ErrorKind::CapacityExceeded,
            Self::NoLandingColumn(_) | Self::PositionsExhausted(_) => ErrorKind::Validation,
            Self::Import(_) => ErrorKind::Import,
            Self::DuplicateBoard(_) | Self::Persistence(_) => ErrorKind::Internal,
        }
    }
}

/// Service-level errors for board, column, and task operations.
#[derive(Debug, Error)]
pub enum KanbanServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] BoardDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] KanbanRepositoryError),
}

impl KanbanServiceError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(_) => ErrorKind::Validation,
            Self::Repository(err) => err.kind(),
        }
    }
}

/// Result type for kanban service operations.
pub type KanbanServiceResult<T> = Result<T, KanbanServiceError>;

/// Service-level errors for export and import.
#[derive(Debug, Error)]
pub enum TransferServiceError {
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] KanbanRepositoryError),
    /// A snapshot document could not be encoded or decoded.
    #[error("malformed snapshot document: {0}")]
    Document(#[from] serde_json::Error),
}

impl TransferServiceError {
    /// Classifies the error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Repository(err) => err.kind(),
            Self::Document(err) if err.is_data() || err.is_syntax() || err.is_eof() => {
                ErrorKind::Validation
            }
            Self::Document(_) => ErrorKind::Internal,
        }
    }
}

/// Result type for transfer service operations.
pub type TransferServiceResult<T> = Result<T, TransferServiceError>;

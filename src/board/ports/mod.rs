//! Port contracts for the kanban store.
//!
//! Ports define infrastructure-agnostic interfaces used by board services.

pub mod repository;

pub use repository::{KanbanRepository, KanbanRepositoryError, KanbanRepositoryResult};

//! Embedded `SQLite` adapters for kanban persistence.

mod connection;
mod models;
mod queries;
mod repository;
mod schema;

pub use connection::{KanbanSqlitePool, SqliteSetupError, apply_schema, build_pool};
pub use repository::SqliteKanbanRepository;

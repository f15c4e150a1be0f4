//! Adapter implementations for the kanban store.
//!
//! # Available Adapters
//!
//! - [`memory::InMemoryKanbanRepository`]: thread-safe in-memory storage
//! - [`sqlite::SqliteKanbanRepository`]: embedded `SQLite` persistence using
//!   Diesel ORM
//! - [`transfer`]: the snake_case document format used to export and import
//!   whole stores

pub mod memory;
pub mod sqlite;
pub mod transfer;

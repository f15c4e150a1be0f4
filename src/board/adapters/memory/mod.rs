//! In-memory adapter implementation.
//!
//! Suitable for unit and integration tests, and for embedding the engine in
//! a process that does not need durable storage.

mod store;

pub use store::InMemoryKanbanRepository;

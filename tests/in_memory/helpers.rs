//! Shared fixtures for in-memory integration tests.

use std::sync::Arc;

use kanban_store::board::{
    adapters::memory::InMemoryKanbanRepository,
    services::{KanbanService, TransferService},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type exercised by the in-memory tests.
pub type TestService = KanbanService<InMemoryKanbanRepository, DefaultClock>;

/// Kanban and transfer services sharing one in-memory repository.
pub struct InMemoryContext {
    pub repository: Arc<InMemoryKanbanRepository>,
    pub service: TestService,
    pub transfer: TransferService<InMemoryKanbanRepository, DefaultClock>,
}

impl InMemoryContext {
    /// Builds services over a fresh, empty repository.
    #[must_use]
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryKanbanRepository::new());
        let clock = Arc::new(DefaultClock);
        Self {
            service: KanbanService::new(Arc::clone(&repository), Arc::clone(&clock)),
            transfer: TransferService::new(Arc::clone(&repository), clock),
            repository,
        }
    }
}

/// Provides a fresh context for each test.
#[fixture]
pub fn context() -> InMemoryContext {
    InMemoryContext::new()
}

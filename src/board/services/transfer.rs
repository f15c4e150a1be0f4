//! Service layer for whole-store export and import.

use super::error::TransferServiceResult;
use crate::board::{
    adapters::transfer::TransferDocument,
    domain::DatabaseSnapshot,
    ports::{KanbanRepository, KanbanRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{info, warn};

/// Export and import orchestration service.
#[derive(Clone)]
pub struct TransferService<R, C>
where
    R: KanbanRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TransferService<R, C>
where
    R: KanbanRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new transfer service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Reads every board, column, and task as one consistent snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`super::TransferServiceError::Repository`] when the read
    /// fails.
    pub async fn export_database(&self) -> TransferServiceResult<DatabaseSnapshot> {
        let snapshot = self.repository.export_snapshot().await?;
        info!(
            boards = snapshot.boards.len(),
            columns = snapshot.columns.len(),
            tasks = snapshot.tasks.len(),
            "store exported"
        );
        Ok(snapshot)
    }

    /// Replaces the whole store with `snapshot`.
    ///
    /// Either every row is replaced or, on any error, nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`super::TransferServiceError::Repository`] wrapping
    /// [`KanbanRepositoryError::Import`] when the snapshot breaks an integrity
    /// rule, or another repository error when the write fails.
    pub async fn import_database(&self, snapshot: &DatabaseSnapshot) -> TransferServiceResult<()> {
        self.repository
            .replace_all(snapshot)
            .await
            .inspect_err(|err| {
                if let KanbanRepositoryError::Import(rejection) = err {
                    warn!(%rejection, "import rejected");
                }
            })?;
        info!(
            boards = snapshot.boards.len(),
            columns = snapshot.columns.len(),
            tasks = snapshot.tasks.len(),
            "store replaced by import"
        );
        Ok(())
    }

    /// Exports the store as snake_case transfer records.
    ///
    /// # Errors
    ///
    /// See [`Self::export_database`].
    pub async fn export_document(&self) -> TransferServiceResult<TransferDocument> {
        let snapshot = self.export_database().await?;
        Ok(TransferDocument::from(&snapshot))
    }

    /// Imports snake_case transfer records, stamping missing timestamps with
    /// the current clock time.
    ///
    /// # Errors
    ///
    /// See [`Self::import_database`].
    pub async fn import_document(&self, document: TransferDocument) -> TransferServiceResult<()> {
        let snapshot = document.into_snapshot(self.clock.utc());
        self.import_database(&snapshot).await
    }

    /// Exports the store as a pretty-printed JSON snapshot document.
    ///
    /// # Errors
    ///
    /// Returns [`super::TransferServiceError`] when the read or encoding
    /// fails.
    pub async fn export_json(&self) -> TransferServiceResult<String> {
        let document = self.export_document().await?;
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Imports a JSON snapshot document.
    ///
    /// # Errors
    ///
    /// Returns [`super::TransferServiceError::Document`] when `json` is not a
    /// valid snapshot document, otherwise as [`Self::import_database`].
    pub async fn import_json(&self, json: &str) -> TransferServiceResult<()> {
        let document: TransferDocument = serde_json::from_str(json)?;
        self.import_document(document).await
    }
}

//! Connection pooling and schema setup for the `SQLite` adapter.
//!
//! Every pooled connection enables foreign keys and a busy timeout on
//! acquisition. The busy timeout lets concurrent `BEGIN IMMEDIATE` writers
//! queue behind one another instead of failing with `SQLITE_BUSY`.

use std::time::Duration;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PoolError};
use diesel::sqlite::SqliteConnection;
use thiserror::Error;
use tracing::debug;

/// `SQLite` connection pool type used by kanban adapters.
pub type KanbanSqlitePool = Pool<ConnectionManager<SqliteConnection>>;

const SCHEMA_SQL: &str =
    include_str!("../../../../migrations/2026-10-01-000000_create_kanban_tables/up.sql");

/// Errors raised while opening the store.
#[derive(Debug, Error)]
pub enum SqliteSetupError {
    /// The URL names an in-memory database, which each pooled connection
    /// would open separately.
    #[error("in-memory database URL {0:?} cannot back a connection pool")]
    InMemoryDatabase(String),

    /// The connection pool could not be built.
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] PoolError),

    /// The schema could not be applied.
    #[error("failed to apply schema: {0}")]
    Schema(#[from] diesel::result::Error),
}

#[derive(Debug, Clone, Copy)]
struct ConnectionPragmas {
    busy_timeout: Duration,
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionPragmas {
    fn on_acquire(&self, connection: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        let pragmas = format!(
            "PRAGMA busy_timeout = {}; PRAGMA foreign_keys = ON; PRAGMA synchronous = NORMAL;",
            self.busy_timeout.as_millis()
        );
        connection
            .batch_execute(&pragmas)
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Builds a connection pool for the database at `database_url`.
///
/// `database_url` is a file path. Pooled `:memory:` connections would each
/// see a separate database, so in-memory use should go through
/// [`crate::board::adapters::memory::InMemoryKanbanRepository`] instead.
///
/// # Errors
///
/// Returns [`SqliteSetupError::InMemoryDatabase`] for an in-memory URL, or
/// [`SqliteSetupError::Pool`] when no connection can be opened.
pub fn build_pool(
    database_url: &str,
    max_connections: u32,
    busy_timeout: Duration,
) -> Result<KanbanSqlitePool, SqliteSetupError> {
    if is_in_memory(database_url) {
        return Err(SqliteSetupError::InMemoryDatabase(database_url.to_owned()));
    }
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let pool = Pool::builder()
        .max_size(max_connections.max(1))
        .connection_customizer(Box::new(ConnectionPragmas { busy_timeout }))
        .build(manager)?;
    debug!(database_url, max_connections, "sqlite pool ready");
    Ok(pool)
}

fn is_in_memory(database_url: &str) -> bool {
    let url = database_url.trim();
    if url == ":memory:" {
        return true;
    }
    url.strip_prefix("file:").is_some_and(|rest| {
        let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
        path == ":memory:" || query.split('&').any(|param| param == "mode=memory")
    })
}

/// Creates the kanban tables if they do not exist yet.
///
/// Safe to run on every start. Also switches the database to WAL journaling
/// so readers never block the single writer.
///
/// # Errors
///
/// Returns [`SqliteSetupError`] when a connection cannot be acquired or a
/// statement fails.
pub fn apply_schema(pool: &KanbanSqlitePool) -> Result<(), SqliteSetupError> {
    let mut connection = pool.get()?;
    connection.batch_execute("PRAGMA journal_mode = WAL;")?;
    connection.batch_execute(SCHEMA_SQL)?;
    debug!("kanban schema applied");
    Ok(())
}

//! Exports a kanban store to a JSON snapshot file, or replaces a store with
//! the contents of one.
//!
//! Usage:
//!
//! ```text
//! kanban_transfer export <snapshot-path>
//! kanban_transfer import <snapshot-path>
//! ```
//!
//! The store is located through an optional JSON configuration file named by
//! `KANBAN_CONFIG`, then the `KANBAN_DATABASE_URL`, `KANBAN_MAX_CONNECTIONS`,
//! and `KANBAN_BUSY_TIMEOUT_MS` overrides. Snapshot files use snake_case
//! records, for example:
//!
//! ```json
//! {
//!   "boards": [{ "id": "…", "name": "Sprint 1", "goal": "Ship", "landing_column_id": "…" }],
//!   "columns": [{ "id": "…", "board_id": "…", "name": "To Do", "position": 1, "wip_limit": 0 }],
//!   "tasks": [{ "id": "…", "column_id": "…", "title": "Write docs", "position": 0 }]
//! }
//! ```
//!
//! An import either replaces everything or leaves the store untouched.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir};
use kanban_store::{board::services::TransferService, config::StoreConfig};
use mockable::DefaultClock;
use std::env;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

const CONFIG_PATH_ENV: &str = "KANBAN_CONFIG";

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by the transfer tool itself.
#[derive(Debug, Error)]
enum TransferToolError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error("failed to read {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Operation {
    Export,
    Import,
}

impl Operation {
    fn parse(arg: &str) -> Result<Self, TransferToolError> {
        match arg {
            "export" => Ok(Self::Export),
            "import" => Ok(Self::Import),
            other => Err(TransferToolError::InvalidArgs(format!(
                "unknown operation '{other}'; expected export or import"
            ))),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    init_tracing();
    let (operation, snapshot_path) = parse_args(collect_args()?.into_iter())?;

    let config_path = env::var(CONFIG_PATH_ENV).ok().map(Utf8PathBuf::from);
    let config = StoreConfig::load(config_path.as_deref())?;
    let repository = Arc::new(config.connect()?);
    let service = TransferService::new(repository, Arc::new(DefaultClock));

    match operation {
        Operation::Export => {
            let json = service.export_json().await?;
            write_snapshot(&snapshot_path, &json)?;
            info!(path = %snapshot_path, database = %config.database_url, "snapshot written");
        }
        Operation::Import => {
            let json = read_snapshot(&snapshot_path)?;
            service.import_json(&json).await?;
            info!(path = %snapshot_path, database = %config.database_url, "snapshot imported");
        }
    }
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn collect_args() -> Result<Vec<String>, TransferToolError> {
    env::args_os()
        .map(|arg_os| {
            arg_os
                .into_string()
                .map_err(|_| TransferToolError::InvalidArgs("argument is not valid UTF-8".into()))
        })
        .collect()
}

fn parse_args(
    mut args: impl Iterator<Item = String>,
) -> Result<(Operation, Utf8PathBuf), TransferToolError> {
    let _program = args.next();
    let operation = args
        .next()
        .ok_or_else(|| TransferToolError::InvalidArgs("missing operation argument".into()))
        .and_then(|arg| Operation::parse(&arg))?;
    let snapshot_path = args
        .next()
        .map(Utf8PathBuf::from)
        .ok_or_else(|| TransferToolError::InvalidArgs("missing snapshot path argument".into()))?;
    if let Some(extra) = args.next() {
        return Err(TransferToolError::InvalidArgs(format!(
            "unexpected extra argument: {extra}"
        )));
    }
    Ok((operation, snapshot_path))
}

fn ambient_dir_and_name(path: &Utf8Path) -> std::io::Result<(Dir, &str)> {
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let name = path.file_name().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name")
    })?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, name))
}

fn read_snapshot(path: &Utf8Path) -> Result<String, TransferToolError> {
    let read_error = |source| TransferToolError::Read {
        path: path.to_owned(),
        source,
    };
    let (dir, name) = ambient_dir_and_name(path).map_err(read_error)?;
    dir.read_to_string(name).map_err(read_error)
}

fn write_snapshot(path: &Utf8Path, contents: &str) -> Result<(), TransferToolError> {
    let write_error = |source| TransferToolError::Write {
        path: path.to_owned(),
        source,
    };
    let (dir, name) = ambient_dir_and_name(path).map_err(write_error)?;
    dir.write(name, contents).map_err(write_error)
}

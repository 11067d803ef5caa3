//! Store selection shared by every subcommand.

use std::sync::Arc;

use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use pinpoint_core::{CoordinateStore, QueryEngine};
use pinpoint_data::JsonFileCoordinateStore;

use crate::CliError;

/// Database used when no `--database` is configured.
pub(crate) const DEFAULT_DATABASE: &str = "coordinates.db";

/// Resolve the configured database path, falling back to [`DEFAULT_DATABASE`].
pub(crate) fn database_or_default(database: Option<Utf8PathBuf>) -> Utf8PathBuf {
    database.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE))
}

/// Whether `path` selects the JSON flat-file backend.
pub(crate) fn is_json_store(path: &Utf8Path) -> bool {
    path.extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"))
}

/// Open the store at `path`, choosing the backend by file extension.
pub(crate) fn open_store(path: &Utf8Path) -> Result<Arc<dyn CoordinateStore>, CliError> {
    pinpoint_fs::ensure_parent_dir(path).map_err(|source| CliError::PrepareDatabase {
        path: path.to_path_buf(),
        source,
    })?;
    if is_json_store(path) {
        debug!("opening JSON coordinate store at {path}");
        let store = JsonFileCoordinateStore::open(path).map_err(|source| CliError::OpenStore {
            path: path.to_path_buf(),
            source,
        })?;
        return Ok(Arc::new(store));
    }
    open_sqlite(path)
}

/// Open the store at `path` and wrap it in a [`QueryEngine`].
pub(crate) fn open_engine(path: &Utf8Path) -> Result<QueryEngine, CliError> {
    Ok(QueryEngine::new(open_store(path)?))
}

#[cfg(feature = "store-sqlite")]
fn open_sqlite(path: &Utf8Path) -> Result<Arc<dyn CoordinateStore>, CliError> {
    debug!("opening SQLite coordinate store at {path}");
    let store = pinpoint_core::SqliteCoordinateStore::open(path).map_err(|source| {
        CliError::OpenStore {
            path: path.to_path_buf(),
            source,
        }
    })?;
    Ok(Arc::new(store))
}

#[cfg(not(feature = "store-sqlite"))]
fn open_sqlite(_path: &Utf8Path) -> Result<Arc<dyn CoordinateStore>, CliError> {
    Err(CliError::MissingFeature {
        feature: "store-sqlite",
        action: "opening a SQLite database",
    })
}

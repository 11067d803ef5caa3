use std::path::PathBuf;

use thiserror::Error;

/// Failure of the persistence medium behind a [`super::CoordinateStore`].
///
/// Store errors are never retried by the engine; callers surface them as a
/// server-side failure distinct from bad input.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Opening the backing database failed.
    #[cfg(feature = "store-sqlite")]
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// A schema migration step failed.
    #[cfg(feature = "store-sqlite")]
    #[error("failed to execute migration step '{step}'")]
    Migration {
        /// Human-readable name of the failing step.
        step: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// The database was created by an incompatible schema version.
    #[error(
        "expected coordinate schema version {expected} but found {found}; apply migrations before retrying"
    )]
    VersionMismatch {
        /// Version this build understands.
        expected: i64,
        /// Version recorded in the database.
        found: i64,
    },
    /// Generic SQLite error when reading or writing rows.
    #[cfg(feature = "store-sqlite")]
    #[error(transparent)]
    Database(#[from] rusqlite::Error),
    /// Reading or writing a file-backed store failed.
    #[error("failed to access coordinate file at {path}: {source}")]
    Io {
        /// Location of the backing file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A file-backed store could not be encoded or decoded.
    #[error("failed to encode or decode coordinate file at {path}: {message}")]
    Encoding {
        /// Location of the backing file.
        path: PathBuf,
        /// Description of the encoding failure.
        message: String,
    },
    /// A persisted row could not be turned back into a coordinate.
    #[error("coordinate {id} is corrupt: {reason}")]
    CorruptRecord {
        /// Identifier of the offending row.
        id: i64,
        /// What was wrong with it.
        reason: String,
    },
    /// The identifier sequence cannot grow any further.
    #[error("coordinate identifier space is exhausted")]
    IdExhausted,
    /// Another thread panicked while holding the store lock.
    #[error("coordinate store lock was poisoned")]
    Poisoned,
}

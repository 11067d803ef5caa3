//! SQLite-backed coordinate store.
//!
//! Identifiers come from an `AUTOINCREMENT` primary key, so SQLite's
//! `sqlite_sequence` table keeps the sequence monotonic across deletions,
//! clears and process restarts.

use std::{
    fmt,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
    time::Duration,
};

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use geo::Rect;
use rusqlite::{Connection, OptionalExtension, Params, Row, Transaction, params};

use super::{CoordinateStore, StoreError};
use crate::{Coordinate, NewCoordinate};

/// Schema version written to `coordinate_schema_version`.
pub const SCHEMA_VERSION: i64 = 1;

/// How long a connection waits on a lock held by another process.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Timestamps are persisted with microsecond precision.
const TIMESTAMP_DIGITS: u16 = 6;

const SELECT_COLUMNS: &str = "SELECT id, x, y, z, raw, origin_timestamp, created_at_us FROM coordinates";

/// Read-write coordinate store backed by a single SQLite connection.
///
/// The connection sits behind a mutex, so every operation is serialised
/// within the process; SQLite's own locking covers other processes.
pub struct SqliteCoordinateStore {
    connection: Mutex<Connection>,
}

impl fmt::Debug for SqliteCoordinateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteCoordinateStore")
            .finish_non_exhaustive()
    }
}

impl SqliteCoordinateStore {
    /// Open (or create) the database at `path` and initialise its schema.
    pub fn open<P>(path: P) -> Result<Self, StoreError>
    where
        P: AsRef<Path>,
    {
        let db_path = path.as_ref();
        let connection = Connection::open(db_path).map_err(|source| StoreError::OpenDatabase {
            path: db_path.to_path_buf(),
            source,
        })?;
        Self::from_connection(connection)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let connection =
            Connection::open_in_memory().map_err(|source| StoreError::OpenDatabase {
                path: PathBuf::from(":memory:"),
                source,
            })?;
        Self::from_connection(connection)
    }

    fn from_connection(mut connection: Connection) -> Result<Self, StoreError> {
        connection.busy_timeout(BUSY_TIMEOUT)?;
        initialise_schema(&mut connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.connection.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl CoordinateStore for SqliteCoordinateStore {
    fn insert(&self, coordinate: NewCoordinate) -> Result<Coordinate, StoreError> {
        let created_at = Utc::now().trunc_subsecs(TIMESTAMP_DIGITS);
        let origin_timestamp = coordinate.origin_timestamp.trunc_subsecs(TIMESTAMP_DIGITS);
        let connection = self.lock()?;
        connection.execute(
            "INSERT INTO coordinates (x, y, z, raw, origin_timestamp, created_at_us)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                coordinate.x,
                coordinate.y,
                coordinate.z,
                coordinate.raw.as_str(),
                format_timestamp(origin_timestamp),
                created_at.timestamp_micros(),
            ],
        )?;
        let rowid = connection.last_insert_rowid();
        let id = u64::try_from(rowid).map_err(|_| StoreError::CorruptRecord {
            id: rowid,
            reason: "negative identifier".to_owned(),
        })?;
        Ok(NewCoordinate {
            origin_timestamp,
            ..coordinate
        }
        .into_coordinate(id, created_at))
    }

    fn get(&self, id: u64) -> Result<Option<Coordinate>, StoreError> {
        let Ok(row_id) = i64::try_from(id) else {
            return Ok(None);
        };
        let connection = self.lock()?;
        let row = connection
            .query_row(&format!("{SELECT_COLUMNS} WHERE id = ?1"), [row_id], read_row)
            .optional()?;
        row.map(CoordinateRow::into_coordinate).transpose()
    }

    fn delete(&self, id: u64) -> Result<bool, StoreError> {
        let Ok(row_id) = i64::try_from(id) else {
            return Ok(false);
        };
        let removed = self
            .lock()?
            .execute("DELETE FROM coordinates WHERE id = ?1", [row_id])?;
        Ok(removed > 0)
    }

    fn clear(&self) -> Result<u64, StoreError> {
        let removed = self.lock()?.execute("DELETE FROM coordinates", [])?;
        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }

    fn count(&self) -> Result<u64, StoreError> {
        let total: i64 =
            self.lock()?
                .query_row("SELECT COUNT(*) FROM coordinates", [], |row| row.get(0))?;
        Ok(u64::try_from(total).unwrap_or_default())
    }

    fn list_recent(&self, limit: usize) -> Result<Vec<Coordinate>, StoreError> {
        self.list_all(Some(limit))
    }

    fn list_all(&self, limit: Option<usize>) -> Result<Vec<Coordinate>, StoreError> {
        // SQLite treats a negative LIMIT as "no limit".
        let sql_limit = limit.map_or(-1, |value| i64::try_from(value).unwrap_or(i64::MAX));
        let connection = self.lock()?;
        query_coordinates(
            &connection,
            &format!("{SELECT_COLUMNS} ORDER BY created_at_us DESC, id DESC LIMIT ?1"),
            [sql_limit],
        )
    }

    fn within_bounds(&self, bounds: &Rect<i64>) -> Result<Vec<Coordinate>, StoreError> {
        let (min, max) = (bounds.min(), bounds.max());
        let connection = self.lock()?;
        query_coordinates(
            &connection,
            &format!(
                "{SELECT_COLUMNS} WHERE x BETWEEN ?1 AND ?2 AND z BETWEEN ?3 AND ?4 ORDER BY id"
            ),
            [min.x, max.x, min.y, max.y],
        )
    }
}

struct CoordinateRow {
    id: i64,
    x: i64,
    y: i64,
    z: i64,
    raw: String,
    origin_timestamp: String,
    created_at_us: i64,
}

impl CoordinateRow {
    fn into_coordinate(self) -> Result<Coordinate, StoreError> {
        let corrupt = |reason: String| StoreError::CorruptRecord {
            id: self.id,
            reason,
        };
        let id = u64::try_from(self.id).map_err(|_| corrupt("negative identifier".to_owned()))?;
        let origin_timestamp = DateTime::parse_from_rfc3339(&self.origin_timestamp)
            .map_err(|err| corrupt(format!("invalid origin timestamp: {err}")))?
            .with_timezone(&Utc);
        let created_at = DateTime::<Utc>::from_timestamp_micros(self.created_at_us)
            .ok_or_else(|| corrupt(format!("creation time {} out of range", self.created_at_us)))?;
        Ok(Coordinate {
            id,
            x: self.x,
            y: self.y,
            z: self.z,
            raw: self.raw,
            origin_timestamp,
            created_at,
        })
    }
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<CoordinateRow> {
    Ok(CoordinateRow {
        id: row.get(0)?,
        x: row.get(1)?,
        y: row.get(2)?,
        z: row.get(3)?,
        raw: row.get(4)?,
        origin_timestamp: row.get(5)?,
        created_at_us: row.get(6)?,
    })
}

fn query_coordinates<P: Params>(
    connection: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<Coordinate>, StoreError> {
    let mut statement = connection.prepare(sql)?;
    let rows = statement.query_map(params, read_row)?;
    rows.map(|row| row?.into_coordinate()).collect()
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Create the coordinate tables and record the schema version.
///
/// Existing databases must already match [`SCHEMA_VERSION`]; mismatches are
/// rejected so migrations can be applied explicitly.
fn initialise_schema(connection: &mut Connection) -> Result<(), StoreError> {
    let transaction = connection
        .transaction()
        .map_err(|source| StoreError::Migration {
            step: "begin schema transaction",
            source,
        })?;

    run_migration_step(
        &transaction,
        "create coordinates",
        "CREATE TABLE IF NOT EXISTS coordinates (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            x INTEGER NOT NULL,
            y INTEGER NOT NULL,
            z INTEGER NOT NULL,
            raw TEXT NOT NULL,
            origin_timestamp TEXT NOT NULL,
            created_at_us INTEGER NOT NULL
        )",
    )?;
    run_migration_step(
        &transaction,
        "index coordinates by recency",
        "CREATE INDEX IF NOT EXISTS idx_coordinates_recent
            ON coordinates(created_at_us DESC, id DESC)",
    )?;
    run_migration_step(
        &transaction,
        "index coordinates by horizontal position",
        "CREATE INDEX IF NOT EXISTS idx_coordinates_horizontal ON coordinates(x, z)",
    )?;
    ensure_schema_version(&transaction)?;

    transaction
        .commit()
        .map_err(|source| StoreError::Migration {
            step: "commit schema transaction",
            source,
        })
}

fn ensure_schema_version(transaction: &Transaction<'_>) -> Result<(), StoreError> {
    run_migration_step(
        transaction,
        "create schema version table",
        "CREATE TABLE IF NOT EXISTS coordinate_schema_version (
            version INTEGER PRIMARY KEY CHECK (version > 0),
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ', 'now'))
        ) WITHOUT ROWID",
    )?;

    let existing_version: Option<i64> = transaction
        .query_row(
            "SELECT version FROM coordinate_schema_version LIMIT 1",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(|source| StoreError::Migration {
            step: "read schema version",
            source,
        })?;

    match existing_version {
        Some(version) if version == SCHEMA_VERSION => Ok(()),
        Some(found) => Err(StoreError::VersionMismatch {
            expected: SCHEMA_VERSION,
            found,
        }),
        None => transaction
            .execute(
                "INSERT INTO coordinate_schema_version (version) VALUES (?1)",
                [SCHEMA_VERSION],
            )
            .map(|_| ())
            .map_err(|source| StoreError::Migration {
                step: "record schema version",
                source,
            }),
    }
}

fn run_migration_step(
    transaction: &Transaction<'_>,
    step: &'static str,
    sql: &str,
) -> Result<(), StoreError> {
    transaction
        .execute(sql, [])
        .map(|_| ())
        .map_err(|source| StoreError::Migration { step, source })
}

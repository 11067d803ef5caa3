//! Flat-file JSON coordinate store.
//!
//! The whole collection lives in one JSON document,
//! `{"next_id": N, "coordinates": [...]}`, rewritten atomically on every
//! mutation. Files written by earlier deployments as a bare array of
//! `{id, x, y, z, timestamp, raw}` objects are read transparently and
//! upgraded on the next write.
//!
//! Several processes may share one file (a running server and the management
//! commands). Every operation re-reads the document under an advisory lock:
//! shared for queries, exclusive for read-modify-write cycles.

use std::sync::{Mutex, MutexGuard};

use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use geo::{Intersects, Rect};
use log::{debug, info};
use pinpoint_core::{
    Coordinate, CoordinateStore, NewCoordinate, StoreError, store::sort_newest_first,
};
use pinpoint_fs::StateLock;

mod format;

use format::StoredDocument;

/// [`CoordinateStore`] persisted as a single JSON file.
///
/// Every mutation writes a complete copy of the collection next to the target
/// file and renames it into place, so readers of the file never observe a
/// partial write. A failed write leaves the file unchanged.
#[derive(Debug)]
pub struct JsonFileCoordinateStore {
    path: Utf8PathBuf,
    /// In-process threads share one lock file handle, so the mutex orders
    /// them before the file lock orders processes.
    lock: Mutex<StateLock>,
}

/// Result of a mutation and whether the document must be written back.
struct Edit<T> {
    outcome: T,
    changed: bool,
}

impl<T> Edit<T> {
    const fn changed(outcome: T) -> Self {
        Self {
            outcome,
            changed: true,
        }
    }

    const fn unchanged(outcome: T) -> Self {
        Self {
            outcome,
            changed: false,
        }
    }
}

impl JsonFileCoordinateStore {
    /// Open the store at `path`, starting empty when the file is absent.
    ///
    /// The lock file beside `path` and any missing parent directories are
    /// created; the document itself is only written by the first mutation.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the file or its lock cannot be
    /// accessed and [`StoreError::Encoding`] when the file holds neither the
    /// current nor the legacy layout.
    pub fn open(location: impl Into<Utf8PathBuf>) -> Result<Self, StoreError> {
        let path = location.into();
        let lock = StateLock::open(&path).map_err(|source| StoreError::Io {
            path: path.clone().into_std_path_buf(),
            source,
        })?;
        let store = Self {
            path,
            lock: Mutex::new(lock),
        };
        let records = store.read(|document| document.coordinates.len())?;
        info!(
            "opened JSON coordinate store at {} with {records} records",
            store.path
        );
        Ok(store)
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone().into_std_path_buf(),
            source,
        }
    }

    fn guard(&self) -> Result<MutexGuard<'_, StateLock>, StoreError> {
        self.lock.lock().map_err(|_| StoreError::Poisoned)
    }

    /// Read the current document from disk. The caller holds the file lock.
    fn load(&self) -> Result<StoredDocument, StoreError> {
        match pinpoint_fs::read_optional(&self.path) {
            Ok(Some(text)) => StoredDocument::parse(&text).map_err(|err| StoreError::Encoding {
                path: self.path.clone().into_std_path_buf(),
                message: err.to_string(),
            }),
            Ok(None) => Ok(StoredDocument::default()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    /// Run `view` over a fresh copy of the document under a shared lock.
    fn read<T>(&self, view: impl FnOnce(StoredDocument) -> T) -> Result<T, StoreError> {
        let lock = self.guard()?;
        let _reading = lock.shared().map_err(|source| self.io_error(source))?;
        Ok(view(self.load()?))
    }

    /// Reload the document under an exclusive lock, apply `change` and write
    /// the result back when `change` reports a modification.
    fn mutate<T>(
        &self,
        change: impl FnOnce(&mut StoredDocument) -> Result<Edit<T>, StoreError>,
    ) -> Result<T, StoreError> {
        let mut lock = self.guard()?;
        let _writing = lock.exclusive().map_err(|source| self.io_error(source))?;
        let mut document = self.load()?;
        let edit = change(&mut document)?;
        if edit.changed {
            self.persist(&document)?;
        } else {
            debug!("{} unchanged; skipping write", self.path);
        }
        Ok(edit.outcome)
    }

    fn persist(&self, document: &StoredDocument) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(document).map_err(|err| StoreError::Encoding {
            path: self.path.clone().into_std_path_buf(),
            message: err.to_string(),
        })?;
        pinpoint_fs::write_atomic(&self.path, &bytes).map_err(|source| self.io_error(source))
    }
}

impl CoordinateStore for JsonFileCoordinateStore {
    fn insert(&self, coordinate: NewCoordinate) -> Result<Coordinate, StoreError> {
        self.mutate(|document| {
            let id = document.next_id;
            document.next_id = id.checked_add(1).ok_or(StoreError::IdExhausted)?;
            let record = coordinate.into_coordinate(id, Utc::now());
            document.coordinates.push(record.clone());
            Ok(Edit::changed(record))
        })
    }

    fn get(&self, id: u64) -> Result<Option<Coordinate>, StoreError> {
        self.read(|document| {
            document
                .coordinates
                .into_iter()
                .find(|record| record.id == id)
        })
    }

    fn delete(&self, id: u64) -> Result<bool, StoreError> {
        self.mutate(|document| {
            let before = document.coordinates.len();
            document.coordinates.retain(|record| record.id != id);
            if document.coordinates.len() < before {
                Ok(Edit::changed(true))
            } else {
                Ok(Edit::unchanged(false))
            }
        })
    }

    fn clear(&self) -> Result<u64, StoreError> {
        self.mutate(|document| {
            let removed = u64::try_from(document.coordinates.len()).unwrap_or(u64::MAX);
            if removed == 0 {
                return Ok(Edit::unchanged(0));
            }
            document.coordinates.clear();
            Ok(Edit::changed(removed))
        })
    }

    fn count(&self) -> Result<u64, StoreError> {
        self.read(|document| u64::try_from(document.coordinates.len()).unwrap_or(u64::MAX))
    }

    fn list_recent(&self, limit: usize) -> Result<Vec<Coordinate>, StoreError> {
        self.list_all(Some(limit))
    }

    fn list_all(&self, limit: Option<usize>) -> Result<Vec<Coordinate>, StoreError> {
        let mut records = self.read(|document| document.coordinates)?;
        sort_newest_first(&mut records);
        if let Some(cap) = limit {
            records.truncate(cap);
        }
        Ok(records)
    }

    fn within_bounds(&self, bounds: &Rect<i64>) -> Result<Vec<Coordinate>, StoreError> {
        let mut found: Vec<Coordinate> = self.read(|document| {
            document
                .coordinates
                .into_iter()
                .filter(|record| bounds.intersects(&record.horizontal()))
                .collect()
        })?;
        found.sort_unstable_by_key(|record| record.id);
        Ok(found)
    }
}

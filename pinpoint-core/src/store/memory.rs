//! Mutex-guarded in-memory coordinate store.

use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

use chrono::Utc;
use geo::{Intersects, Rect};

use super::{CoordinateStore, StoreError, sort_newest_first};
use crate::{Coordinate, NewCoordinate};

/// In-memory [`CoordinateStore`].
///
/// Records live for the lifetime of the value. Identifiers come from a
/// private counter so they stay monotonic across deletions and clears.
#[derive(Debug)]
pub struct MemoryCoordinateStore {
    state: Mutex<MemoryState>,
}

#[derive(Debug)]
struct MemoryState {
    next_id: u64,
    records: BTreeMap<u64, Coordinate>,
}

impl Default for MemoryCoordinateStore {
    fn default() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                next_id: 1,
                records: BTreeMap::new(),
            }),
        }
    }
}

impl MemoryCoordinateStore {
    /// Create a store pre-populated with `records`.
    ///
    /// The next identifier continues after the largest supplied id, so
    /// seeded identifiers are never handed out again.
    #[must_use]
    pub fn with_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let by_id: BTreeMap<u64, Coordinate> = records
            .into_iter()
            .map(|record| (record.id, record))
            .collect();
        let next_id = by_id
            .keys()
            .next_back()
            .map_or(1, |max| max.saturating_add(1));
        Self {
            state: Mutex::new(MemoryState {
                next_id,
                records: by_id,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StoreError> {
        self.state.lock().map_err(|_| StoreError::Poisoned)
    }
}

impl CoordinateStore for MemoryCoordinateStore {
    fn insert(&self, coordinate: NewCoordinate) -> Result<Coordinate, StoreError> {
        let mut state = self.lock()?;
        let id = state.next_id;
        state.next_id = id.checked_add(1).ok_or(StoreError::IdExhausted)?;
        let record = coordinate.into_coordinate(id, Utc::now());
        state.records.insert(id, record.clone());
        Ok(record)
    }

    fn get(&self, id: u64) -> Result<Option<Coordinate>, StoreError> {
        Ok(self.lock()?.records.get(&id).cloned())
    }

    fn delete(&self, id: u64) -> Result<bool, StoreError> {
        Ok(self.lock()?.records.remove(&id).is_some())
    }

    fn clear(&self) -> Result<u64, StoreError> {
        let mut state = self.lock()?;
        let removed = state.records.len();
        state.records.clear();
        Ok(u64::try_from(removed).unwrap_or(u64::MAX))
    }

    fn count(&self) -> Result<u64, StoreError> {
        let len = self.lock()?.records.len();
        Ok(u64::try_from(len).unwrap_or(u64::MAX))
    }

    fn list_recent(&self, limit: usize) -> Result<Vec<Coordinate>, StoreError> {
        self.list_all(Some(limit))
    }

    fn list_all(&self, limit: Option<usize>) -> Result<Vec<Coordinate>, StoreError> {
        let mut records: Vec<Coordinate> = self.lock()?.records.values().cloned().collect();
        sort_newest_first(&mut records);
        if let Some(cap) = limit {
            records.truncate(cap);
        }
        Ok(records)
    }

    fn within_bounds(&self, bounds: &Rect<i64>) -> Result<Vec<Coordinate>, StoreError> {
        Ok(self
            .lock()?
            .records
            .values()
            // `Intersects` treats boundary points as inside the rectangle.
            .filter(|record| bounds.intersects(&record.horizontal()))
            .cloned()
            .collect())
    }
}

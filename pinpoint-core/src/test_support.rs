//! Test doubles for stores and notification sinks, shared by unit and
//! behaviour tests.

use std::{
    panic,
    sync::{Arc, Mutex},
    thread,
};

use chrono::Utc;
use geo::Rect;

use crate::{
    Coordinate, CoordinateStore, NewCoordinate, NotificationError, NotificationSink, StoreError,
};

/// Store whose every operation fails with [`StoreError::Poisoned`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingStore;

impl CoordinateStore for FailingStore {
    fn insert(&self, _coordinate: NewCoordinate) -> Result<Coordinate, StoreError> {
        Err(StoreError::Poisoned)
    }

    fn get(&self, _id: u64) -> Result<Option<Coordinate>, StoreError> {
        Err(StoreError::Poisoned)
    }

    fn delete(&self, _id: u64) -> Result<bool, StoreError> {
        Err(StoreError::Poisoned)
    }

    fn clear(&self) -> Result<u64, StoreError> {
        Err(StoreError::Poisoned)
    }

    fn count(&self) -> Result<u64, StoreError> {
        Err(StoreError::Poisoned)
    }

    fn list_recent(&self, _limit: usize) -> Result<Vec<Coordinate>, StoreError> {
        Err(StoreError::Poisoned)
    }

    fn list_all(&self, _limit: Option<usize>) -> Result<Vec<Coordinate>, StoreError> {
        Err(StoreError::Poisoned)
    }

    fn within_bounds(&self, _bounds: &Rect<i64>) -> Result<Vec<Coordinate>, StoreError> {
        Err(StoreError::Poisoned)
    }
}

/// Sink that remembers every coordinate it was asked to deliver.
#[derive(Debug, Default)]
pub struct RecordingSink {
    delivered: Mutex<Vec<Coordinate>>,
}

impl RecordingSink {
    /// Coordinates delivered so far, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if a previous delivery panicked while holding the lock.
    #[must_use]
    #[expect(clippy::expect_used, reason = "test helper; poisoning is a test bug")]
    pub fn delivered(&self) -> Vec<Coordinate> {
        self.delivered
            .lock()
            .expect("recording sink lock poisoned")
            .clone()
    }
}

impl NotificationSink for RecordingSink {
    fn deliver(&self, coordinate: &Coordinate) -> Result<(), NotificationError> {
        self.delivered
            .lock()
            .map_err(|_| NotificationError::Unavailable {
                reason: "recording sink lock poisoned".to_owned(),
            })?
            .push(coordinate.clone());
        Ok(())
    }
}

/// Sink that rejects every delivery.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingSink;

impl NotificationSink for FailingSink {
    fn deliver(&self, _coordinate: &Coordinate) -> Result<(), NotificationError> {
        Err(NotificationError::Unavailable {
            reason: "test sink always fails".to_owned(),
        })
    }
}

/// Insert `per_thread` records from each of `threads` threads, handing the
/// threads out across `stores` in turn, and return every assigned id.
///
/// A panic in a worker is re-raised on the calling thread.
///
/// # Errors
///
/// Returns the first [`StoreError`] any worker reports.
pub fn insert_from_threads(
    stores: &[Arc<dyn CoordinateStore>],
    threads: usize,
    per_thread: usize,
) -> Result<Vec<u64>, StoreError> {
    thread::scope(|scope| {
        let workers: Vec<_> = stores
            .iter()
            .cycle()
            .take(threads)
            .map(|store| {
                scope.spawn(move || {
                    (0..per_thread)
                        .map(|step| {
                            let value = i64::try_from(step).unwrap_or(i64::MAX);
                            let raw = format!("X: {value} Y: 0 Z: {value}");
                            store
                                .insert(NewCoordinate::new(value, 0, value, raw, Utc::now()))
                                .map(|record| record.id)
                        })
                        .collect::<Result<Vec<u64>, StoreError>>()
                })
            })
            .collect();
        let mut ids = Vec::new();
        for worker in workers {
            let assigned = worker
                .join()
                .unwrap_or_else(|payload| panic::resume_unwind(payload))?;
            ids.extend(assigned);
        }
        Ok(ids)
    })
}

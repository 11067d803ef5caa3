//! Data access traits for stored coordinates.
//!
//! The [`CoordinateStore`] trait is the single synchronisation point for
//! coordinate records. Every operation is atomic with respect to the others,
//! identifiers are assigned by the store and never reused, and reads are
//! recomputed per call.

use geo::Rect;

use crate::{Coordinate, NewCoordinate};

mod error;
mod memory;
#[cfg(feature = "store-sqlite")]
mod sqlite;

pub use error::StoreError;
pub use memory::MemoryCoordinateStore;
#[cfg(feature = "store-sqlite")]
pub use sqlite::{SCHEMA_VERSION, SqliteCoordinateStore};

/// Durable collection of coordinate records.
///
/// Implementations must serialise mutations so concurrent inserts never
/// collide on an identifier and readers never observe a torn record.
///
/// # Examples
///
/// ```rust
/// use chrono::Utc;
/// use pinpoint_core::{CoordinateStore, MemoryCoordinateStore, NewCoordinate};
///
/// let store = MemoryCoordinateStore::default();
/// let first = store.insert(NewCoordinate::new(1, 2, 3, "X: 1 Y: 2 Z: 3", Utc::now()))?;
/// let second = store.insert(NewCoordinate::new(4, 5, 6, "X: 4 Y: 5 Z: 6", Utc::now()))?;
///
/// assert!(second.id > first.id);
/// assert_eq!(store.count()?, 2);
/// assert_eq!(store.list_recent(1)?, vec![second]);
/// # Ok::<(), pinpoint_core::StoreError>(())
/// ```
pub trait CoordinateStore: Send + Sync {
    /// Persist a new record, assigning the next identifier and `created_at`.
    fn insert(&self, coordinate: NewCoordinate) -> Result<Coordinate, StoreError>;

    /// Look up a record by identifier.
    fn get(&self, id: u64) -> Result<Option<Coordinate>, StoreError>;

    /// Remove a record. Returns `false` when no record carried `id`.
    fn delete(&self, id: u64) -> Result<bool, StoreError>;

    /// Remove every record and return how many were removed.
    ///
    /// The identifier sequence is not reset.
    fn clear(&self) -> Result<u64, StoreError>;

    /// Number of stored records.
    fn count(&self) -> Result<u64, StoreError>;

    /// Most recently created records first, at most `limit` of them.
    fn list_recent(&self, limit: usize) -> Result<Vec<Coordinate>, StoreError>;

    /// Every record, most recently created first, optionally capped.
    fn list_all(&self, limit: Option<usize>) -> Result<Vec<Coordinate>, StoreError>;

    /// Records whose horizontal projection lies inside `bounds`.
    ///
    /// The rectangle lives on the horizontal plane: its `x` axis is the
    /// coordinate `x` and its `y` axis is the coordinate `z`. Containment
    /// includes boundary points. Results are ordered by identifier.
    fn within_bounds(&self, bounds: &Rect<i64>) -> Result<Vec<Coordinate>, StoreError>;
}

/// Order records newest first, breaking `created_at` ties by identifier.
///
/// Every [`CoordinateStore::list_recent`] implementation must agree with
/// this ordering.
pub fn sort_newest_first(records: &mut [Coordinate]) {
    records.sort_unstable_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

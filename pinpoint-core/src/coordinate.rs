use std::fmt;

use chrono::{DateTime, Utc};
use geo::Coord;

/// A stored coordinate ping.
///
/// Records are created by a [`crate::CoordinateStore`] and never mutated
/// afterwards. `created_at` drives every "most recent" ordering.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use pinpoint_core::{CoordinateStore, MemoryCoordinateStore, NewCoordinate};
///
/// let store = MemoryCoordinateStore::default();
/// let stored = store
///     .insert(NewCoordinate::new(10, 64, -20, "X: 10 Y: 64 Z: -20", Utc::now()))
///     .expect("memory store insert");
///
/// assert_eq!(stored.triple(), (10, 64, -20));
/// assert_eq!(stored.to_string(), "10, 64, -20");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    /// Store-assigned identifier, unique and never reused.
    pub id: u64,
    /// East/west position.
    pub x: i64,
    /// Vertical position.
    pub y: i64,
    /// North/south position.
    pub z: i64,
    /// Description text the triple was extracted from.
    pub raw: String,
    /// Timestamp reported by the ingesting source.
    pub origin_timestamp: DateTime<Utc>,
    /// Timestamp assigned by the store at insert time.
    pub created_at: DateTime<Utc>,
}

impl Coordinate {
    /// Return the `(x, y, z)` triple.
    #[must_use]
    pub const fn triple(&self) -> (i64, i64, i64) {
        (self.x, self.y, self.z)
    }

    /// Project onto the horizontal plane used by radius searches.
    ///
    /// The vertical axis is dropped on purpose: proximity is judged on the
    /// ground plane, so `x` maps to the planar `x` and `z` to the planar `y`.
    #[must_use]
    pub const fn horizontal(&self) -> Coord<i64> {
        Coord {
            x: self.x,
            y: self.z,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}, {}", self.x, self.y, self.z)
    }
}

/// Insert payload accepted by [`crate::CoordinateStore::insert`].
///
/// Callers never choose identifiers or creation timestamps; both are the
/// store's responsibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCoordinate {
    /// East/west position.
    pub x: i64,
    /// Vertical position.
    pub y: i64,
    /// North/south position.
    pub z: i64,
    /// Verbatim description text.
    pub raw: String,
    /// Timestamp reported by the ingesting source.
    pub origin_timestamp: DateTime<Utc>,
}

impl NewCoordinate {
    /// Build an insert payload.
    #[must_use]
    pub fn new(
        x: i64,
        y: i64,
        z: i64,
        raw: impl Into<String>,
        origin_timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            x,
            y,
            z,
            raw: raw.into(),
            origin_timestamp,
        }
    }

    /// Attach store-assigned fields to produce the persisted record.
    #[must_use]
    pub fn into_coordinate(self, id: u64, created_at: DateTime<Utc>) -> Coordinate {
        Coordinate {
            id,
            x: self.x,
            y: self.y,
            z: self.z,
            raw: self.raw,
            origin_timestamp: self.origin_timestamp,
            created_at,
        }
    }
}

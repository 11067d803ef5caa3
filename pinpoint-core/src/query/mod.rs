//! Read and management operations over a [`CoordinateStore`].
//!
//! The engine holds no state of its own beyond its limits: every answer is
//! recomputed from the store on each call.

use std::{fmt, sync::Arc};

use geo::Coord;
use log::info;

use crate::{Coordinate, CoordinateStore};

mod error;
mod export;
mod limits;
mod search;

pub use error::QueryError;
pub use export::Export;
pub use limits::QueryLimits;
pub use search::{RankedCoordinate, SearchOutcome};

/// Aggregate figures about the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stats {
    /// Number of stored records.
    pub total: u64,
    /// Most recently created record, if any.
    pub latest: Option<Coordinate>,
}

/// Result of a deletion request. A missing id is not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The record existed and was removed.
    Deleted(u64),
    /// No record carried the identifier.
    NotFound(u64),
}

impl DeleteOutcome {
    /// Identifier the request named.
    #[must_use]
    pub const fn id(self) -> u64 {
        match self {
            Self::Deleted(id) | Self::NotFound(id) => id,
        }
    }

    /// Whether a record was removed.
    #[must_use]
    pub const fn is_deleted(self) -> bool {
        matches!(self, Self::Deleted(_))
    }
}

/// Read-only liveness probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    /// Number of stored records.
    pub coordinates: u64,
}

/// Query engine answering command requests against a store.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use chrono::Utc;
/// use pinpoint_core::{CoordinateStore, MemoryCoordinateStore, NewCoordinate, QueryEngine};
///
/// let store = Arc::new(MemoryCoordinateStore::default());
/// for (x, z) in [(10, -20), (1000, -20), (5000, 5000)] {
///     store.insert(NewCoordinate::new(x, 64, z, "fixture", Utc::now()))?;
/// }
///
/// let engine = QueryEngine::new(store);
/// let outcome = engine.search(0, 0, None)?;
/// let found: Vec<_> = outcome.matches().iter().map(|m| m.coordinate.x).collect();
/// assert_eq!(found, vec![10, 1000]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone)]
pub struct QueryEngine {
    store: Arc<dyn CoordinateStore>,
    limits: QueryLimits,
}

impl fmt::Debug for QueryEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryEngine")
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

impl QueryEngine {
    /// Create an engine with default [`QueryLimits`].
    #[must_use]
    pub fn new(store: Arc<dyn CoordinateStore>) -> Self {
        Self {
            store,
            limits: QueryLimits::default(),
        }
    }

    /// Replace the engine's limits.
    #[must_use]
    pub const fn with_limits(mut self, limits: QueryLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Limits the engine enforces.
    #[must_use]
    pub const fn limits(&self) -> &QueryLimits {
        &self.limits
    }

    /// The most recently created records, newest first.
    ///
    /// `None` lists [`QueryLimits::recent_default`] records.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::CountOutOfRange`] when `count` lies outside
    /// `recent_min..=recent_max`, or [`QueryError::Store`] on store failure.
    pub fn recent(&self, count: Option<u32>) -> Result<Vec<Coordinate>, QueryError> {
        let requested = count.unwrap_or(self.limits.recent_default);
        let QueryLimits {
            recent_min: min,
            recent_max: max,
            ..
        } = self.limits;
        if !(min..=max).contains(&requested) {
            return Err(QueryError::CountOutOfRange {
                requested,
                min,
                max,
            });
        }
        let limit = usize::try_from(requested).unwrap_or(usize::MAX);
        Ok(self.store.list_recent(limit)?)
    }

    /// Records within `radius` of `(x, z)` on both horizontal axes, nearest
    /// first.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidRadius`] for a radius that is not
    /// positive, or [`QueryError::Store`] on store failure.
    pub fn search(&self, x: i64, z: i64, radius: Option<i64>) -> Result<SearchOutcome, QueryError> {
        let chosen = radius.unwrap_or(self.limits.search_radius_default);
        if chosen <= 0 {
            return Err(QueryError::InvalidRadius { radius: chosen });
        }
        let centre = Coord { x, y: z };
        let candidates = self
            .store
            .within_bounds(&search::search_bounds(centre, chosen))?;
        Ok(SearchOutcome::new(centre, chosen, candidates))
    }

    /// Total count and most recent record.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Store`] on store failure.
    pub fn stats(&self) -> Result<Stats, QueryError> {
        let total = self.store.count()?;
        let latest = self.store.list_recent(1)?.into_iter().next();
        Ok(Stats { total, latest })
    }

    /// Remove the record carrying `id`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Store`] on store failure.
    pub fn delete(&self, id: u64) -> Result<DeleteOutcome, QueryError> {
        if self.store.delete(id)? {
            info!("deleted coordinate #{id}");
            Ok(DeleteOutcome::Deleted(id))
        } else {
            Ok(DeleteOutcome::NotFound(id))
        }
    }

    /// Remove every record and return how many were removed.
    ///
    /// Confirmation is the caller's responsibility.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Store`] on store failure.
    pub fn clear_all(&self) -> Result<u64, QueryError> {
        let removed = self.store.clear()?;
        info!("cleared {removed} coordinates");
        Ok(removed)
    }

    /// Newest-first text export bounded by the export cap and byte limit.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Store`] on store failure.
    pub fn export(&self) -> Result<Export, QueryError> {
        let total = self.store.count()?;
        let records = self.store.list_all(Some(self.limits.export_cap))?;
        Ok(export::render_export(
            &records,
            total,
            self.limits.export_max_bytes,
        ))
    }

    /// Liveness probe reporting the current record count.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::Store`] on store failure.
    pub fn health(&self) -> Result<Health, QueryError> {
        Ok(Health {
            coordinates: self.store.count()?,
        })
    }
}

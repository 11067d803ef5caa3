//! Extraction, storage and notification of a single ping.

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::{Coordinate, CoordinateStore, NewCoordinate, extract_coordinates};

mod error;
mod notify;

pub use error::IngestError;
pub use notify::{NoopSink, NotificationError, NotificationSink};

/// Turns raw ping descriptions into stored coordinates.
///
/// A rejected description never touches the store. Notification happens
/// only after the record is durable and its failure is logged, not returned.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use pinpoint_core::{IngestionPipeline, MemoryCoordinateStore, NoopSink};
///
/// let pipeline = IngestionPipeline::new(
///     Arc::new(MemoryCoordinateStore::default()),
///     Arc::new(NoopSink),
/// );
/// let stored = pipeline.ingest("Coords: X: -187677, Y: -47, Z: 159415", None)?;
/// assert_eq!(stored.triple(), (-187_677, -47, 159_415));
/// assert!(pipeline.ingest("nothing useful", None).is_err());
/// # Ok::<(), pinpoint_core::IngestError>(())
/// ```
#[derive(Clone)]
pub struct IngestionPipeline {
    store: Arc<dyn CoordinateStore>,
    sink: Arc<dyn NotificationSink>,
}

impl fmt::Debug for IngestionPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionPipeline").finish_non_exhaustive()
    }
}

impl IngestionPipeline {
    /// Build a pipeline writing to `store` and announcing through `sink`.
    #[must_use]
    pub fn new(store: Arc<dyn CoordinateStore>, sink: Arc<dyn NotificationSink>) -> Self {
        Self { store, sink }
    }

    /// Store the triple found in `raw`.
    ///
    /// `origin_timestamp` defaults to the ingestion time when absent.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Rejected`] when `raw` has no ordered triple and
    /// [`IngestError::StorageFailed`] when the store fails.
    pub fn ingest(
        &self,
        raw: &str,
        origin_timestamp: Option<DateTime<Utc>>,
    ) -> Result<Coordinate, IngestError> {
        let (x, y, z) = extract_coordinates(raw).inspect_err(|err| {
            warn!("rejected ping: {err}");
        })?;
        let origin = origin_timestamp.unwrap_or_else(Utc::now);
        let stored = self
            .store
            .insert(NewCoordinate::new(x, y, z, raw, origin))?;
        info!("logged coordinate #{}: {stored}", stored.id);

        if let Err(err) = self.sink.deliver(&stored) {
            warn!("notification for coordinate #{} failed: {err}", stored.id);
        }
        Ok(stored)
    }
}

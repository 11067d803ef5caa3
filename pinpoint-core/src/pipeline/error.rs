use thiserror::Error;

use crate::{ExtractionError, StoreError};

/// Terminal failures of [`super::IngestionPipeline::ingest`].
#[derive(Debug, Error)]
pub enum IngestError {
    /// The text carried no usable triple. Nothing was stored.
    #[error("could not parse coordinates: {0}")]
    Rejected(#[from] ExtractionError),
    /// The triple was valid but the store failed to persist it.
    #[error("failed to store coordinates: {0}")]
    StorageFailed(#[from] StoreError),
}

impl IngestError {
    /// Whether the failure lies with the caller's input.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

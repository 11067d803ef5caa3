use thiserror::Error;

use crate::StoreError;

/// Errors returned by [`super::QueryEngine`] operations.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The requested listing size lies outside the configured bounds.
    #[error("count must be between {min} and {max}, got {requested}")]
    CountOutOfRange {
        /// Count supplied by the caller.
        requested: u32,
        /// Smallest accepted count.
        min: u32,
        /// Largest accepted count.
        max: u32,
    },
    /// The search radius was zero or negative.
    #[error("search radius must be positive, got {radius}")]
    InvalidRadius {
        /// Radius supplied by the caller.
        radius: i64,
    },
    /// The backing store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

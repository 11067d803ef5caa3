//! Best-effort delivery of stored coordinates to an outside channel.

use thiserror::Error;

use crate::Coordinate;

/// Failure reported by a [`NotificationSink`].
///
/// The pipeline logs these and carries on; they never affect an ingestion
/// outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    /// The channel is not reachable or not configured.
    #[error("notification channel unavailable: {reason}")]
    Unavailable {
        /// Why the channel could not be used.
        reason: String,
    },
    /// The channel answered with a non-success status.
    #[error("notification rejected with status {status}: {body}")]
    Rejected {
        /// HTTP status returned by the channel.
        status: u16,
        /// Response body, verbatim.
        body: String,
    },
    /// The request could not be sent.
    #[error("notification transport failed: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },
}

/// Receiver of freshly stored coordinates.
///
/// Implementations must not block the caller for long; slow transports
/// should hand the work off and return.
pub trait NotificationSink: Send + Sync {
    /// Announce `coordinate`.
    ///
    /// # Errors
    ///
    /// Returns a [`NotificationError`] when the announcement could not be
    /// handed to the channel.
    fn deliver(&self, coordinate: &Coordinate) -> Result<(), NotificationError>;
}

/// Sink that discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl NotificationSink for NoopSink {
    fn deliver(&self, _coordinate: &Coordinate) -> Result<(), NotificationError> {
        Ok(())
    }
}

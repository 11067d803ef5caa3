use pinpoint_core::Coordinate;
use serde::Serialize;

/// Outcome class of a webhook request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookStatus {
    /// The ping was stored.
    Success,
    /// The payload was unusable.
    ClientError,
    /// The server failed to store a valid ping.
    ServerError,
}

impl WebhookStatus {
    /// HTTP status code for this outcome.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::Success => 200,
            Self::ClientError => 400,
            Self::ServerError => 500,
        }
    }
}

/// Stored triple echoed back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoredCoords {
    /// East/west position.
    pub x: i64,
    /// Vertical position.
    pub y: i64,
    /// North/south position.
    pub z: i64,
}

/// JSON body of a webhook reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum WebhookBody {
    /// Successful ingestion.
    Stored {
        /// Always `true`.
        success: bool,
        /// Identifier assigned by the store.
        id: u64,
        /// Stored triple.
        coords: StoredCoords,
    },
    /// Any failure.
    Error {
        /// Short human-readable reason.
        error: String,
    },
}

impl WebhookBody {
    /// Failure body carrying `message`.
    #[must_use]
    pub fn error(message: &str) -> Self {
        Self::Error {
            error: message.to_owned(),
        }
    }
}

/// Status and body returned to the webhook caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookReply {
    /// Outcome class.
    pub status: WebhookStatus,
    /// JSON body.
    pub body: WebhookBody,
}

impl WebhookReply {
    pub(super) const fn stored(coordinate: &Coordinate) -> Self {
        Self {
            status: WebhookStatus::Success,
            body: WebhookBody::Stored {
                success: true,
                id: coordinate.id,
                coords: StoredCoords {
                    x: coordinate.x,
                    y: coordinate.y,
                    z: coordinate.z,
                },
            },
        }
    }

    pub(super) fn client_error(message: &str) -> Self {
        Self {
            status: WebhookStatus::ClientError,
            body: WebhookBody::error(message),
        }
    }

    pub(super) fn server_error(message: &str) -> Self {
        Self {
            status: WebhookStatus::ServerError,
            body: WebhookBody::error(message),
        }
    }
}

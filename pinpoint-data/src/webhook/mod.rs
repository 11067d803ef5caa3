//! Webhook contract for automation sources posting coordinate pings.
//!
//! A payload carries a list of embeds; only the first one is consulted. Its
//! `description` holds the ping text and its optional `timestamp` the time the
//! source observed the position. The reply mirrors the outcome classes of the
//! ingestion pipeline:
//!
//! | outcome            | status | body                                           |
//! |--------------------|--------|------------------------------------------------|
//! | stored             | 200    | `{"success":true,"id":N,"coords":{x,y,z}}`     |
//! | no embeds          | 400    | `{"error":"No embeds found"}`                  |
//! | unparseable text   | 400    | `{"error":"Could not parse coordinates"}`      |
//! | store failure      | 500    | `{"error":"Internal server error"}`            |

use chrono::{DateTime, Utc};
use log::{info, warn};
use pinpoint_core::{IngestError, IngestionPipeline};
use serde::{Deserialize, Serialize};

mod reply;

pub use reply::{StoredCoords, WebhookBody, WebhookReply, WebhookStatus};

/// Error text returned when the payload carries no embeds.
pub const NO_EMBEDS: &str = "No embeds found";
/// Error text returned when the first embed has no ordered triple.
pub const UNPARSEABLE: &str = "Could not parse coordinates";
/// Error text returned when the store fails.
pub const INTERNAL_ERROR: &str = "Internal server error";
/// Error text returned when the body is not a webhook payload.
pub const INVALID_PAYLOAD: &str = "Invalid JSON payload";

/// Body posted by an automation source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookPayload {
    /// Embeds attached to the message, if any.
    #[serde(default)]
    pub embeds: Option<Vec<WebhookEmbed>>,
}

/// One embed inside a [`WebhookPayload`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookEmbed {
    /// Ping text such as `"Coords: X: -187677, Y: -47, Z: 159415"`.
    #[serde(default)]
    pub description: Option<String>,
    /// RFC 3339 time the source observed the position.
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl WebhookPayload {
    /// Build a payload with a single embed.
    #[must_use]
    pub fn single(description: impl Into<String>, timestamp: Option<String>) -> Self {
        Self {
            embeds: Some(vec![WebhookEmbed {
                description: Some(description.into()),
                timestamp,
            }]),
        }
    }
}

/// Decode a raw request body and run it through [`handle_webhook`].
///
/// Bodies that are not a JSON webhook payload get a client error reply.
#[must_use]
pub fn handle_webhook_body(pipeline: &IngestionPipeline, body: &[u8]) -> WebhookReply {
    match serde_json::from_slice::<WebhookPayload>(body) {
        Ok(payload) => handle_webhook(pipeline, payload),
        Err(err) => {
            warn!("rejected webhook body: {err}");
            WebhookReply::client_error(INVALID_PAYLOAD)
        }
    }
}

/// Ingest the first embed of `payload` and build the reply for the caller.
#[must_use]
pub fn handle_webhook(pipeline: &IngestionPipeline, payload: WebhookPayload) -> WebhookReply {
    let Some(embed) = payload.embeds.and_then(|embeds| embeds.into_iter().next()) else {
        warn!("rejected webhook without embeds");
        return WebhookReply::client_error(NO_EMBEDS);
    };
    let description = embed.description.unwrap_or_default();
    let origin = embed.timestamp.as_deref().and_then(parse_origin_timestamp);

    match pipeline.ingest(&description, origin) {
        Ok(stored) => {
            info!("webhook stored coordinate #{}", stored.id);
            WebhookReply::stored(&stored)
        }
        Err(IngestError::Rejected(_)) => WebhookReply::client_error(UNPARSEABLE),
        Err(err @ IngestError::StorageFailed(_)) => {
            warn!("webhook ingestion failed: {err}");
            WebhookReply::server_error(INTERNAL_ERROR)
        }
    }
}

/// Parse an RFC 3339 origin timestamp.
///
/// Unparseable values are logged and dropped so the ingestion time is used
/// instead.
fn parse_origin_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(parsed) => Some(parsed.with_timezone(&Utc)),
        Err(err) => {
            warn!("ignoring unparseable origin timestamp {raw:?}: {err}");
            None
        }
    }
}

//! Adapters around the Pinpoint core engine.
//!
//! Responsibilities:
//! - Decode webhook payloads and map ingestion outcomes to replies.
//! - Announce stored coordinates on a chat channel over HTTP.
//! - Persist coordinates in a flat JSON file.
//!
//! Boundaries:
//! - Extraction, identifier assignment and query rules live in
//!   `pinpoint-core`.
//! - Blocking store work stays off async executors; callers move it onto a
//!   blocking pool.

#![forbid(unsafe_code)]

pub mod json_store;
pub mod notify;
pub mod webhook;

pub use json_store::JsonFileCoordinateStore;
pub use notify::{ChannelNotifier, ChannelNotifierConfig, NotifierBuildError};
pub use webhook::{
    WebhookBody, WebhookEmbed, WebhookPayload, WebhookReply, WebhookStatus, handle_webhook,
    handle_webhook_body,
};

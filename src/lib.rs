//! Facade crate for the Pinpoint coordinate log.
//!
//! This crate re-exports the core domain types and exposes the optional
//! SQLite store and the transport adapters behind feature flags.

#![forbid(unsafe_code)]

pub use pinpoint_core::{
    Coordinate, CoordinateStore, DeleteOutcome, Export, ExtractionError, Health, IngestError,
    IngestionPipeline, MemoryCoordinateStore, NewCoordinate, NoopSink, NotificationError,
    NotificationSink, QueryEngine, QueryError, QueryLimits, RankedCoordinate, SearchOutcome,
    Stats, StoreError, extract_coordinates,
};

#[cfg(feature = "store-sqlite")]
pub use pinpoint_core::SqliteCoordinateStore;

#[cfg(feature = "data")]
pub use pinpoint_data::{
    ChannelNotifier, ChannelNotifierConfig, JsonFileCoordinateStore, WebhookPayload, WebhookReply,
    handle_webhook, handle_webhook_body,
};

#[cfg(feature = "test-support")]
pub use pinpoint_core::test_support;

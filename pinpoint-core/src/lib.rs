//! Core engine for the Pinpoint coordinate log.
//!
//! The crate owns everything with real invariants:
//! - [`extract_coordinates`] turns a free-form ping description into an
//!   `(x, y, z)` triple.
//! - [`CoordinateStore`] implementations persist records and hand out
//!   monotonically increasing identifiers.
//! - [`QueryEngine`] answers recency, radius, statistics, deletion, clear and
//!   export requests on top of a store.
//! - [`IngestionPipeline`] wires extraction, storage and best-effort
//!   notification together.
//!
//! Transport concerns (HTTP, chat delivery, command parsing) live in the
//! `pinpoint-data` and `pinpoint-cli` crates.

#![forbid(unsafe_code)]

mod coordinate;
mod extract;
mod pipeline;
mod query;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use coordinate::{Coordinate, NewCoordinate};
pub use extract::{Axis, ExtractionError, extract_coordinates};
pub use pipeline::{
    IngestError, IngestionPipeline, NoopSink, NotificationError, NotificationSink,
};
pub use query::{
    DeleteOutcome, Export, Health, QueryEngine, QueryError, QueryLimits, RankedCoordinate,
    SearchOutcome, Stats,
};
pub use store::{CoordinateStore, MemoryCoordinateStore, StoreError};

#[cfg(feature = "store-sqlite")]
pub use store::SqliteCoordinateStore;

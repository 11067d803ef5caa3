//! Fixtures shared by the CLI unit tests.

use std::sync::Arc;

use camino::Utf8PathBuf;
use chrono::Utc;
use pinpoint_core::{CoordinateStore, MemoryCoordinateStore, NewCoordinate, QueryEngine};
use tempfile::TempDir;

/// In-memory store paired with an engine reading from it.
pub(super) struct Seeded {
    pub(super) store: Arc<MemoryCoordinateStore>,
    pub(super) engine: QueryEngine,
}

pub(super) fn ping(x: i64, y: i64, z: i64) -> NewCoordinate {
    NewCoordinate::new(x, y, z, format!("Coords: X: {x}, Y: {y}, Z: {z}"), Utc::now())
}

pub(super) fn seeded(triples: &[(i64, i64, i64)]) -> Seeded {
    let store = Arc::new(MemoryCoordinateStore::default());
    for &(x, y, z) in triples {
        store.insert(ping(x, y, z)).expect("seed insert");
    }
    let engine = QueryEngine::new(store.clone());
    Seeded { store, engine }
}

pub(super) fn utf8_root(dir: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir")
}

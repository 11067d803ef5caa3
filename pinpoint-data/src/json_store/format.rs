//! On-disk layouts understood by the JSON store.

use chrono::{DateTime, Utc};
use log::warn;
use pinpoint_core::Coordinate;
use serde::{Deserialize, Serialize};

/// Current document layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct StoredDocument {
    pub(super) next_id: u64,
    pub(super) coordinates: Vec<Coordinate>,
}

impl Default for StoredDocument {
    fn default() -> Self {
        Self {
            next_id: 1,
            coordinates: Vec::new(),
        }
    }
}

/// A record written by the original flat-file layout.
///
/// `timestamp` holds whatever the automation source sent, unvalidated.
#[derive(Debug, Deserialize)]
struct LegacyCoordinate {
    id: u64,
    x: i64,
    y: i64,
    z: i64,
    #[serde(default)]
    timestamp: Option<String>,
    #[serde(default)]
    raw: String,
}

impl From<LegacyCoordinate> for Coordinate {
    fn from(legacy: LegacyCoordinate) -> Self {
        let timestamp = legacy_timestamp(legacy.id, legacy.timestamp.as_deref());
        Self {
            id: legacy.id,
            x: legacy.x,
            y: legacy.y,
            z: legacy.z,
            raw: legacy.raw,
            origin_timestamp: timestamp,
            created_at: timestamp,
        }
    }
}

/// Accept RFC 3339 or RFC 2822 text; anything else maps to the Unix epoch so
/// the record sorts as oldest.
fn legacy_timestamp(id: u64, raw: Option<&str>) -> DateTime<Utc> {
    let Some(text) = raw else {
        warn!("legacy record {id} has no timestamp; using the Unix epoch");
        return DateTime::<Utc>::UNIX_EPOCH;
    };
    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_rfc2822(text))
        .map_or_else(
            |err| {
                warn!(
                    "legacy record {id} has unparseable timestamp {text:?} ({err}); \
                     using the Unix epoch"
                );
                DateTime::<Utc>::UNIX_EPOCH
            },
            |parsed| parsed.with_timezone(&Utc),
        )
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnyLayout {
    Current(StoredDocument),
    Legacy(Vec<LegacyCoordinate>),
}

impl StoredDocument {
    /// Decode either layout, normalising `next_id` so it always exceeds every
    /// stored identifier.
    pub(super) fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let mut document = match serde_json::from_str(text)? {
            AnyLayout::Current(current) => current,
            AnyLayout::Legacy(records) => Self {
                next_id: 1,
                coordinates: records.into_iter().map(Coordinate::from).collect(),
            },
        };
        let floor = document
            .coordinates
            .iter()
            .map(|record| record.id.saturating_add(1))
            .max()
            .unwrap_or(1);
        document.next_id = document.next_id.max(floor);
        Ok(document)
    }
}

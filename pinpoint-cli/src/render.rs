//! Plain-text replies for the query and management commands.
//!
//! The wording follows the chat commands operators already know, so a reply
//! can be pasted into a channel unchanged.

use chrono::{DateTime, Utc};
use pinpoint_core::{Coordinate, DeleteOutcome, Export, SearchOutcome, Stats};

/// Reply for an empty recency listing.
pub(crate) const NOTHING_LOGGED: &str = "No coordinates logged yet!";
/// Reply for an export of an empty store.
pub(crate) const NOTHING_TO_EXPORT: &str = "No coordinates to export!";

/// Format one record as `#id `x, y, z``.
fn entry(coordinate: &Coordinate) -> String {
    format!("#{} `{coordinate}`", coordinate.id)
}

/// Describe how long ago `then` was, relative to `now`.
pub(crate) fn relative_age(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now.signed_duration_since(then);
    if age.num_seconds() < 60 {
        return "just now".to_owned();
    }
    let (amount, unit) = if age.num_hours() < 1 {
        (age.num_minutes(), "minute")
    } else if age.num_days() < 1 {
        (age.num_hours(), "hour")
    } else {
        (age.num_days(), "day")
    };
    let plural = if amount == 1 { "" } else { "s" };
    format!("{amount} {unit}{plural} ago")
}

/// Reply for `recent`.
pub(crate) fn recent(records: &[Coordinate], now: DateTime<Utc>) -> String {
    if records.is_empty() {
        return NOTHING_LOGGED.to_owned();
    }
    let mut lines = vec![format!("Recent Coordinates ({})", records.len())];
    lines.extend(
        records
            .iter()
            .map(|record| format!("{} - {}", entry(record), relative_age(record.created_at, now))),
    );
    lines.push("Use `pinpoint search` to find coords near a location".to_owned());
    lines.join("\n")
}

/// Reply for `search`, listing at most `display_limit` of the ranked matches.
pub(crate) fn search(outcome: &SearchOutcome, display_limit: usize) -> String {
    let (x, z) = outcome.centre();
    let radius = outcome.radius();
    if outcome.is_empty() {
        return format!("No coordinates found within {radius} blocks of ({x}, {z})");
    }
    let mut lines = vec![format!("Coords near ({x}, {z})")];
    lines.extend(outcome.nearest(display_limit).iter().map(|ranked| {
        format!(
            "{} - {:.0} blocks away",
            entry(&ranked.coordinate),
            ranked.distance
        )
    }));
    lines.push(format!(
        "Found {} coords within {radius} blocks",
        outcome.len()
    ));
    lines.join("\n")
}

/// Reply for `stats`.
pub(crate) fn stats(stats: &Stats) -> String {
    let last = stats
        .latest
        .as_ref()
        .map_or_else(|| "None".to_owned(), |latest| format!("`{latest}`"));
    format!(
        "Coordinate Stats\nTotal Logged: {} coordinates\nLast Coord: {last}",
        stats.total
    )
}

/// Reply for `delete`.
pub(crate) fn delete(outcome: DeleteOutcome) -> String {
    match outcome {
        DeleteOutcome::Deleted(id) => format!("Deleted coordinate #{id}"),
        DeleteOutcome::NotFound(id) => format!("Coordinate #{id} not found"),
    }
}

/// Reply for a confirmed `clear-all`.
pub(crate) fn cleared(removed: u64) -> String {
    format!("Deleted all {removed} coordinates!")
}

/// Reply for `clear-all` without `--confirm`.
pub(crate) fn clear_pending(total: u64) -> String {
    format!("This will delete all {total} coordinates. Re-run with --confirm to proceed.")
}

/// Reply for `export`.
pub(crate) fn export(export: &Export) -> String {
    if export.total == 0 {
        return NOTHING_TO_EXPORT.to_owned();
    }
    if export.exported == 0 {
        return format!(
            "None of the {} coordinates fit within the export size limit.",
            export.total
        );
    }
    let mut reply = format!(
        "Exported {} coordinates:\n```\n{}\n```",
        export.exported, export.text
    );
    let partial = u64::try_from(export.exported).is_ok_and(|exported| exported < export.total);
    if partial {
        reply.push_str(&format!("\n(Showing last {})", export.exported));
    }
    reply
}

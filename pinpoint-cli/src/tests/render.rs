//! Reply formatting details not covered by command execution tests.

use crate::render;
use chrono::{TimeDelta, TimeZone, Utc};
use pinpoint_core::{Export, Stats};
use rstest::rstest;

#[rstest]
#[case(TimeDelta::seconds(5), "just now")]
#[case(TimeDelta::seconds(-30), "just now")]
#[case(TimeDelta::minutes(1), "1 minute ago")]
#[case(TimeDelta::minutes(59), "59 minutes ago")]
#[case(TimeDelta::hours(3), "3 hours ago")]
#[case(TimeDelta::days(1), "1 day ago")]
#[case(TimeDelta::days(40), "40 days ago")]
fn relative_age_picks_largest_unit(#[case] age: TimeDelta, #[case] expected: &str) {
    let now = Utc
        .with_ymd_and_hms(2025, 6, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    assert_eq!(render::relative_age(now - age, now), expected);
}

#[rstest]
fn stats_without_records_reports_none() {
    let reply = render::stats(&Stats {
        total: 0,
        latest: None,
    });
    assert_eq!(
        reply,
        "Coordinate Stats\nTotal Logged: 0 coordinates\nLast Coord: None"
    );
}

#[rstest]
fn full_export_has_no_partial_note() {
    let reply = render::export(&Export {
        text: "1, 2, 3".to_owned(),
        exported: 1,
        total: 1,
        truncated: false,
    });
    assert_eq!(reply, "Exported 1 coordinates:\n```\n1, 2, 3\n```");
}

#[rstest]
fn byte_truncated_export_notes_what_was_shown() {
    let reply = render::export(&Export {
        text: "1, 2, 3".to_owned(),
        exported: 1,
        total: 4,
        truncated: true,
    });
    assert!(reply.ends_with("(Showing last 1)"));
}

#[rstest]
fn export_with_nothing_stored_says_so() {
    let reply = render::export(&Export {
        text: String::new(),
        exported: 0,
        total: 0,
        truncated: false,
    });
    assert_eq!(reply, render::NOTHING_TO_EXPORT);
}

#[rstest]
fn export_too_small_for_one_line_reports_the_limit() {
    let reply = render::export(&Export {
        text: String::new(),
        exported: 0,
        total: 3,
        truncated: true,
    });
    assert_eq!(
        reply,
        "None of the 3 coordinates fit within the export size limit."
    );
    assert!(!reply.contains("```"));
}

#[rstest]
fn clear_pending_mentions_confirmation() {
    assert_eq!(
        render::clear_pending(7),
        "This will delete all 7 coordinates. Re-run with --confirm to proceed."
    );
}

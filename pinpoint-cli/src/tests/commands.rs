//! Command execution against in-memory and on-disk stores.

use super::helpers::{seeded, utf8_root};
use super::*;
use crate::{
    manage::{ClearAllConfig, DeleteConfig, execute_clear_all, execute_delete},
    query::{
        RecentConfig, SearchConfig, execute_export, execute_recent, execute_search, execute_stats,
    },
    render::{NOTHING_LOGGED, NOTHING_TO_EXPORT},
    store::open_engine,
};
use camino::Utf8PathBuf;
use pinpoint_core::{CoordinateStore, QueryError};
use rstest::rstest;
use tempfile::TempDir;

const SAMPLE: [(i64, i64, i64); 3] = [(10, 64, -20), (1000, 64, -20), (5000, 0, 5000)];

fn search_config(x: i64, z: i64, radius: Option<i64>) -> SearchConfig {
    SearchConfig {
        database: Utf8PathBuf::from("unused.db"),
        x,
        z,
        radius,
    }
}

#[rstest]
fn recent_lists_newest_first() {
    let fixture = seeded(&SAMPLE);
    let config = RecentConfig {
        database: Utf8PathBuf::from("unused.db"),
        count: Some(2),
    };
    let reply = execute_recent(&fixture.engine, &config).expect("recent");
    let lines: Vec<&str> = reply.lines().collect();
    assert_eq!(lines.first(), Some(&"Recent Coordinates (2)"));
    assert!(lines.get(1).is_some_and(|line| line.starts_with("#3 `5000, 0, 5000`")));
    assert!(lines.get(2).is_some_and(|line| line.starts_with("#2 `1000, 64, -20`")));
}

#[rstest]
fn recent_reports_empty_store() {
    let fixture = seeded(&[]);
    let config = RecentConfig::from(crate::query::RecentArgs::default());
    let reply = execute_recent(&fixture.engine, &config).expect("recent");
    assert_eq!(reply, NOTHING_LOGGED);
}

#[rstest]
#[case(0)]
#[case(26)]
fn recent_rejects_out_of_range_counts(#[case] count: u32) {
    let fixture = seeded(&SAMPLE);
    let config = RecentConfig {
        database: Utf8PathBuf::from("unused.db"),
        count: Some(count),
    };
    let err = execute_recent(&fixture.engine, &config).expect_err("count out of range");
    assert!(matches!(
        err,
        CliError::Query(QueryError::CountOutOfRange { .. })
    ));
}

#[rstest]
fn search_ranks_and_reports_total() {
    let fixture = seeded(&SAMPLE);
    let reply = execute_search(&fixture.engine, &search_config(0, 0, Some(1000))).expect("search");
    assert_eq!(
        reply,
        "Coords near (0, 0)\n\
         #1 `10, 64, -20` - 22 blocks away\n\
         #2 `1000, 64, -20` - 1000 blocks away\n\
         Found 2 coords within 1000 blocks"
    );
}

#[rstest]
fn search_with_no_matches_names_the_centre() {
    let fixture = seeded(&SAMPLE);
    let reply = execute_search(&fixture.engine, &search_config(-9000, 9000, None)).expect("search");
    assert_eq!(
        reply,
        "No coordinates found within 1000 blocks of (-9000, 9000)"
    );
}

#[rstest]
fn search_display_is_capped_but_total_is_not() {
    let triples: Vec<(i64, i64, i64)> = (0..20).map(|offset| (offset, 64, 0)).collect();
    let fixture = seeded(&triples);
    let reply = execute_search(&fixture.engine, &search_config(0, 0, Some(100))).expect("search");
    let listed = reply.lines().filter(|line| line.starts_with('#')).count();
    assert_eq!(listed, 15);
    assert!(reply.ends_with("Found 20 coords within 100 blocks"));
}

#[rstest]
fn search_rejects_non_positive_radius() {
    let fixture = seeded(&SAMPLE);
    let err = execute_search(&fixture.engine, &search_config(0, 0, Some(0)))
        .expect_err("radius must be positive");
    assert!(matches!(
        err,
        CliError::Query(QueryError::InvalidRadius { radius: 0 })
    ));
}

#[rstest]
fn stats_reports_total_and_latest() {
    let fixture = seeded(&SAMPLE);
    let reply = execute_stats(&fixture.engine).expect("stats");
    assert_eq!(
        reply,
        "Coordinate Stats\nTotal Logged: 3 coordinates\nLast Coord: `5000, 0, 5000`"
    );
}

#[rstest]
fn delete_reports_found_and_missing() {
    let fixture = seeded(&SAMPLE);
    let config = |id| DeleteConfig {
        database: Utf8PathBuf::from("unused.db"),
        id,
    };
    assert_eq!(
        execute_delete(&fixture.engine, &config(2)).expect("delete"),
        "Deleted coordinate #2"
    );
    assert_eq!(
        execute_delete(&fixture.engine, &config(2)).expect("delete"),
        "Coordinate #2 not found"
    );
    assert_eq!(fixture.store.count().expect("count"), 2);
}

#[rstest]
fn clear_all_without_confirmation_keeps_records() {
    let fixture = seeded(&SAMPLE);
    let config = ClearAllConfig {
        database: Utf8PathBuf::from("unused.db"),
        confirmed: false,
    };
    let reply = execute_clear_all(&fixture.engine, &config).expect("clear-all");
    assert!(reply.contains("delete all 3 coordinates"));
    assert!(reply.contains("--confirm"));
    assert_eq!(fixture.store.count().expect("count"), 3);
}

#[rstest]
fn clear_all_with_confirmation_removes_everything() {
    let fixture = seeded(&SAMPLE);
    let config = ClearAllConfig {
        database: Utf8PathBuf::from("unused.db"),
        confirmed: true,
    };
    let reply = execute_clear_all(&fixture.engine, &config).expect("clear-all");
    assert_eq!(reply, "Deleted all 3 coordinates!");
    assert_eq!(fixture.store.count().expect("count"), 0);
}

#[rstest]
fn export_lists_newest_first_in_a_block() {
    let fixture = seeded(&SAMPLE);
    let reply = execute_export(&fixture.engine).expect("export");
    assert_eq!(
        reply,
        "Exported 3 coordinates:\n```\n5000, 0, 5000\n1000, 64, -20\n10, 64, -20\n```"
    );
}

#[rstest]
fn export_notes_partial_listing() {
    let fixture = seeded(&SAMPLE);
    let engine = fixture
        .engine
        .clone()
        .with_limits(pinpoint_core::QueryLimits::default().with_export_cap(2));
    let reply = execute_export(&engine).expect("export");
    assert!(reply.starts_with("Exported 2 coordinates:"));
    assert!(reply.ends_with("\n(Showing last 2)"));
}

#[rstest]
fn export_below_one_line_reports_the_limit() {
    let fixture = seeded(&SAMPLE);
    let engine = fixture
        .engine
        .clone()
        .with_limits(pinpoint_core::QueryLimits::default().with_export_max_bytes(4));
    let reply = execute_export(&engine).expect("export");
    assert_eq!(
        reply,
        "None of the 3 coordinates fit within the export size limit."
    );
}

#[rstest]
fn export_of_empty_store() {
    let fixture = seeded(&[]);
    assert_eq!(execute_export(&fixture.engine).expect("export"), NOTHING_TO_EXPORT);
}

#[rstest]
#[case("coordinates.db")]
#[case("nested/coordinates.json")]
fn opened_stores_persist_between_engines(#[case] name: &str) {
    let dir = TempDir::new().expect("tempdir");
    let path = utf8_root(&dir).join(name);
    {
        let engine = open_engine(&path).expect("open store");
        let config = ClearAllConfig {
            database: path.clone(),
            confirmed: false,
        };
        let reply = execute_clear_all(&engine, &config).expect("pending clear");
        assert!(reply.contains("delete all 0 coordinates"));
    }
    let engine = open_engine(&path).expect("reopen store");
    assert_eq!(engine.stats().expect("stats").total, 0);
    assert!(path.parent().is_some_and(camino::Utf8Path::is_dir));
}

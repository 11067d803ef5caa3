//! Radius search over the horizontal plane.
//!
//! Candidates are selected with an axis-aligned box test and then ranked by
//! Euclidean distance on the XZ plane. The vertical axis never takes part.

use std::cmp::Ordering;

use geo::{Coord, Rect};

use crate::Coordinate;

/// A search match paired with its horizontal distance from the centre.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedCoordinate {
    /// The matching record.
    pub coordinate: Coordinate,
    /// Euclidean distance on the XZ plane.
    pub distance: f64,
}

/// Ranked result of [`super::QueryEngine::search`].
///
/// Every box match is kept; callers decide how many to display through
/// [`SearchOutcome::nearest`] while reporting [`SearchOutcome::len`].
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    centre: Coord<i64>,
    radius: i64,
    matches: Vec<RankedCoordinate>,
}

impl SearchOutcome {
    pub(super) fn new(centre: Coord<i64>, radius: i64, candidates: Vec<Coordinate>) -> Self {
        Self {
            centre,
            radius,
            matches: rank(centre, candidates),
        }
    }

    /// Search centre as `(x, z)`.
    #[must_use]
    pub const fn centre(&self) -> (i64, i64) {
        (self.centre.x, self.centre.y)
    }

    /// Radius the search used.
    #[must_use]
    pub const fn radius(&self) -> i64 {
        self.radius
    }

    /// Total number of box matches.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.matches.len()
    }

    /// Whether nothing matched.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Every match, nearest first.
    #[must_use]
    pub const fn matches(&self) -> &[RankedCoordinate] {
        self.matches.as_slice()
    }

    /// The `n` nearest matches.
    #[must_use]
    pub fn nearest(&self, n: usize) -> &[RankedCoordinate] {
        self.matches
            .get(..n.min(self.matches.len()))
            .unwrap_or_default()
    }

    /// Consume the outcome, returning every match nearest first.
    #[must_use]
    pub fn into_matches(self) -> Vec<RankedCoordinate> {
        self.matches
    }
}

/// Square of side `2 * radius` centred on `centre`, clamped to the `i64`
/// range so extreme centres never overflow.
pub(super) fn search_bounds(centre: Coord<i64>, radius: i64) -> Rect<i64> {
    Rect::new(
        Coord {
            x: centre.x.saturating_sub(radius),
            y: centre.y.saturating_sub(radius),
        },
        Coord {
            x: centre.x.saturating_add(radius),
            y: centre.y.saturating_add(radius),
        },
    )
}

/// Horizontal distance between `coordinate` and `centre`.
///
/// Differences are taken in `i128` so opposite extremes cannot overflow.
#[expect(
    clippy::cast_precision_loss,
    reason = "distances only rank matches; f64 precision is ample for ordering"
)]
pub(super) fn horizontal_distance(coordinate: &Coordinate, centre: Coord<i64>) -> f64 {
    let dx = i128::from(coordinate.x) - i128::from(centre.x);
    let dz = i128::from(coordinate.z) - i128::from(centre.y);
    (dx as f64).hypot(dz as f64)
}

fn rank(centre: Coord<i64>, candidates: Vec<Coordinate>) -> Vec<RankedCoordinate> {
    let mut ranked: Vec<RankedCoordinate> = candidates
        .into_iter()
        .map(|coordinate| RankedCoordinate {
            distance: horizontal_distance(&coordinate, centre),
            coordinate,
        })
        .collect();
    ranked.sort_by(compare_ranked);
    ranked
}

fn compare_ranked(a: &RankedCoordinate, b: &RankedCoordinate) -> Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then_with(|| a.coordinate.id.cmp(&b.coordinate.id))
}

//! Extraction of `(x, y, z)` triples from free-form ping descriptions.
//!
//! Automation sources describe a position as text such as
//! `"Coords: X: -187677, Y: -47, Z: 159415"`. The labels are matched
//! case-insensitively, in order, and on a single line.

use std::{fmt, sync::LazyLock};

use regex::{Captures, Regex};
use thiserror::Error;

/// `X:`, `Y:` and `Z:` labels in order on one line. Each label takes the first
/// integer after it on the same line; any other text may sit in between.
const COORDINATE_PATTERN: &str =
    r"(?i)X:[^\n]*?(-?[0-9]+).*Y:[^\n]*?(-?[0-9]+).*Z:[^\n]*?(-?[0-9]+)";

#[expect(
    clippy::expect_used,
    reason = "the pattern is a compile-time constant covered by unit tests"
)]
static COORDINATE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(COORDINATE_PATTERN).expect("coordinate pattern compiles"));

/// One of the three labelled axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// East/west.
    X,
    /// Vertical.
    Y,
    /// North/south.
    Z,
}

impl Axis {
    const fn capture_index(self) -> usize {
        match self {
            Self::X => 1,
            Self::Y => 2,
            Self::Z => 3,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::X => "X",
            Self::Y => "Y",
            Self::Z => "Z",
        };
        f.write_str(label)
    }
}

/// Errors raised when a description does not carry a usable triple.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    /// No ordered `X`/`Y`/`Z` triple appears on any single line.
    #[error("no ordered X/Y/Z coordinate triple found")]
    NoMatch,
    /// A labelled value does not fit in a signed 64-bit integer.
    #[error("{axis} value {value} is out of range")]
    OutOfRange {
        /// Axis whose value overflowed.
        axis: Axis,
        /// Matched digits, verbatim.
        value: String,
    },
}

/// Extract the `(x, y, z)` triple from `text`.
///
/// Either all three values are found in order or the call fails; partial
/// results are never returned.
///
/// # Examples
/// ```
/// use pinpoint_core::{ExtractionError, extract_coordinates};
///
/// let triple = extract_coordinates("Coords: X: -187677, Y: -47, Z: 159415")?;
/// assert_eq!(triple, (-187_677, -47, 159_415));
///
/// assert_eq!(
///     extract_coordinates("X: 1\nY: 2\nZ: 3"),
///     Err(ExtractionError::NoMatch),
/// );
/// # Ok::<(), ExtractionError>(())
/// ```
pub fn extract_coordinates(text: &str) -> Result<(i64, i64, i64), ExtractionError> {
    let captures = COORDINATE_REGEX
        .captures(text)
        .ok_or(ExtractionError::NoMatch)?;
    Ok((
        parse_axis(&captures, Axis::X)?,
        parse_axis(&captures, Axis::Y)?,
        parse_axis(&captures, Axis::Z)?,
    ))
}

fn parse_axis(captures: &Captures<'_>, axis: Axis) -> Result<i64, ExtractionError> {
    let digits = captures
        .get(axis.capture_index())
        .map(|m| m.as_str())
        .ok_or(ExtractionError::NoMatch)?;
    digits.parse().map_err(|_| ExtractionError::OutOfRange {
        axis,
        value: digits.to_owned(),
    })
}

//! Shared types for segment joining.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A 2D point.
///
/// Points are compared by exact equality. No tolerance is applied
/// anywhere in the joiner: two endpoints are shared only when their
/// coordinates match bit-for-bit after [`PointKey`] normalization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns `true` if both coordinates are finite.
    #[must_use]
    pub const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Squared Euclidean distance to another point.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// The hashable, totally ordered grouping key for this point.
    #[must_use]
    pub fn key(self) -> PointKey {
        PointKey::from(self)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Exact-equality key for a [`Point`].
///
/// `-0.0` is folded into `0.0` so that numerically equal coordinates
/// share a key. Ordering is lexicographic by `x`, then `y`, using
/// [`f64::total_cmp`]. Only finite points reach the joiner, so the
/// NaN corner of `total_cmp` never matters.
#[derive(Debug, Clone, Copy)]
pub struct PointKey {
    x: f64,
    y: f64,
}

impl PointKey {
    /// The point this key was built from (with `-0.0` normalized).
    #[must_use]
    pub const fn point(self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl From<Point> for PointKey {
    fn from(p: Point) -> Self {
        // Adding positive zero turns -0.0 into +0.0 and leaves every
        // other value unchanged.
        Self {
            x: p.x + 0.0,
            y: p.y + 0.0,
        }
    }
}

impl PartialEq for PointKey {
    fn eq(&self, other: &Self) -> bool {
        self.x.to_bits() == other.x.to_bits() && self.y.to_bits() == other.y.to_bits()
    }
}

impl Eq for PointKey {}

impl std::hash::Hash for PointKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.x.to_bits().hash(state);
        self.y.to_bits().hash(state);
    }
}

impl PartialOrd for PointKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PointKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.x
            .total_cmp(&other.x)
            .then_with(|| self.y.total_cmp(&other.y))
    }
}

/// Which end of a segment an endpoint is.
///
/// `Begin` orders before `End`, which fixes the tie-break inside a
/// shared-point group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum End {
    /// The segment's first point (flag 0).
    Begin,
    /// The segment's second point (flag 1).
    End,
}

impl End {
    /// Both ends, in flag order.
    pub const BOTH: [Self; 2] = [Self::Begin, Self::End];

    /// The other end of the same segment.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Begin => Self::End,
            Self::End => Self::Begin,
        }
    }

    /// Numeric flag: 0 for `Begin`, 1 for `End`.
    #[must_use]
    pub const fn flag(self) -> usize {
        match self {
            Self::Begin => 0,
            Self::End => 1,
        }
    }
}

/// A line segment from `begin` to `end`.
///
/// Segments are identified by their position in the input slice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// First point.
    pub begin: Point,
    /// Second point.
    pub end: Point,
}

impl Segment {
    /// Create a new segment.
    #[must_use]
    pub const fn new(begin: Point, end: Point) -> Self {
        Self { begin, end }
    }

    /// The point at the given end.
    #[must_use]
    pub const fn point(&self, end: End) -> Point {
        match end {
            End::Begin => self.begin,
            End::End => self.end,
        }
    }

    /// Returns `true` if `begin` and `end` share a grouping key.
    #[must_use]
    pub fn is_zero_length(&self) -> bool {
        self.begin.key() == self.end.key()
    }

    /// Euclidean length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.begin.distance(self.end)
    }
}

impl From<((f64, f64), (f64, f64))> for Segment {
    fn from((begin, end): ((f64, f64), (f64, f64))) -> Self {
        Self::new(begin.into(), end.into())
    }
}

/// A sequence of connected points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline(Vec<Point>);

impl Polyline {
    /// Create a new polyline from a vector of points.
    #[must_use]
    pub const fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    /// Returns `true` if the polyline has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of points in the polyline.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the first point, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Point> {
        self.0.first()
    }

    /// Returns the last point, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Point> {
        self.0.last()
    }

    /// Returns a slice of all points.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.0
    }

    /// Returns `true` for a loop: at least three points with the
    /// first equal to the last.
    ///
    /// A two-point polyline from a zero-length segment is not a loop.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        match (self.0.first(), self.0.last()) {
            (Some(first), Some(last)) => self.0.len() >= 3 && first.key() == last.key(),
            _ => false,
        }
    }

    /// Sum of segment lengths.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.0.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}

/// Configuration for the joiner.
///
/// Serialized as JSON by the CLI's `--config-json` flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinConfig {
    /// Attach the closing point when a chain runs back into its own
    /// opposite end, producing a polyline whose first and last points
    /// coincide.
    ///
    /// When `false`, the closing segment is rejected like any other
    /// revisit and ends up as a chain of its own.
    pub close_loops: bool,
}

impl JoinConfig {
    /// Default for [`close_loops`](Self::close_loops).
    pub const DEFAULT_CLOSE_LOOPS: bool = true;
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            close_loops: Self::DEFAULT_CLOSE_LOOPS,
        }
    }
}

/// Errors that can occur while validating input or joining segments.
#[derive(Debug, thiserror::Error)]
pub enum JoinError {
    /// The input text is not valid JSON or not an array of segments.
    #[error("invalid segment JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// A segment does not consist of exactly two 2-component points.
    #[error("segment {index} is malformed: {reason}")]
    MalformedSegment {
        /// Position of the segment in the input.
        index: usize,
        /// What is wrong with it.
        reason: String,
    },

    /// A segment has a NaN or infinite coordinate.
    #[error("segment {index} has a non-finite coordinate")]
    NonFiniteCoordinate {
        /// Position of the segment in the input.
        index: usize,
    },

    /// An endpoint has no shared-point group.
    ///
    /// Every endpoint is grouped during extraction, so this indicates a
    /// defect in grouping or indexing rather than bad input.
    #[error("internal error: no shared-point group for segment {segment} {end:?}")]
    MissingSharedPoint {
        /// Segment whose endpoint was looked up.
        segment: usize,
        /// Which endpoint.
        end: End,
    },
}

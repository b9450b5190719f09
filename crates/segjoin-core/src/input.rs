//! Input validation at the crate boundary.
//!
//! Segments arrive as JSON arrays of two `[x, y]` points. Integers and
//! floats may be mixed; both become `f64`. Anything that is not exactly
//! two finite 2-component points is rejected here, before it can reach
//! the joiner's index bookkeeping.

use crate::types::{JoinError, Point, Segment};

/// Parse a JSON array of segments.
///
/// # Errors
///
/// Returns [`JoinError::InvalidJson`] if the text is not a nested array
/// of numbers, and the errors of [`segments_from_coords`] for arrays of
/// the wrong shape.
///
/// # Examples
///
/// ```
/// use segjoin_core::input::parse_segments_json;
///
/// let segments = parse_segments_json("[[[0, 0], [1.5, 0]], [[1.5, 0], [2, 1]]]").unwrap();
/// assert_eq!(segments.len(), 2);
/// assert!(parse_segments_json("[[[0, 0]]]").is_err());
/// ```
pub fn parse_segments_json(text: &str) -> Result<Vec<Segment>, JoinError> {
    let raw: Vec<Vec<Vec<f64>>> = serde_json::from_str(text)?;
    segments_from_coords(raw)
}

/// Convert nested coordinate arrays into validated segments.
///
/// # Errors
///
/// Returns [`JoinError::MalformedSegment`] if a segment does not have
/// exactly two points or a point does not have exactly two components,
/// and [`JoinError::NonFiniteCoordinate`] for NaN or infinite values.
pub fn segments_from_coords(raw: Vec<Vec<Vec<f64>>>) -> Result<Vec<Segment>, JoinError> {
    raw.into_iter()
        .enumerate()
        .map(|(index, points)| {
            let [begin, end] = <[Vec<f64>; 2]>::try_from(points).map_err(|points| {
                JoinError::MalformedSegment {
                    index,
                    reason: format!("expected 2 points, found {}", points.len()),
                }
            })?;
            let segment = Segment::new(point_from(index, begin)?, point_from(index, end)?);
            validate_segment(index, &segment)?;
            Ok(segment)
        })
        .collect()
}

/// Check that every segment has finite coordinates.
///
/// # Errors
///
/// Returns [`JoinError::NonFiniteCoordinate`] for the first offending
/// segment.
pub fn validate_segments(segments: &[Segment]) -> Result<(), JoinError> {
    segments
        .iter()
        .enumerate()
        .try_for_each(|(index, segment)| validate_segment(index, segment))
}

fn validate_segment(index: usize, segment: &Segment) -> Result<(), JoinError> {
    if segment.begin.is_finite() && segment.end.is_finite() {
        Ok(())
    } else {
        Err(JoinError::NonFiniteCoordinate { index })
    }
}

fn point_from(index: usize, coords: Vec<f64>) -> Result<Point, JoinError> {
    match coords.as_slice() {
        &[x, y] => Ok(Point::new(x, y)),
        other => Err(JoinError::MalformedSegment {
            index,
            reason: format!("expected 2 coordinates per point, found {}", other.len()),
        }),
    }
}

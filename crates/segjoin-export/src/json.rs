//! JSON serializer.
//!
//! Polylines are written as nested `[x, y]` arrays, the same shape the
//! CLI reads segments in, so output can be fed back as input.

use segjoin_core::Polyline;

/// Serialize polylines as `[[[x, y], ...], ...]`.
///
/// # Examples
///
/// ```
/// use segjoin_core::{Point, Polyline};
/// use segjoin_export::json::to_json;
///
/// let polylines = vec![Polyline::new(vec![Point::new(0.0, 0.0), Point::new(1.5, 2.0)])];
/// assert_eq!(to_json(&polylines, false), "[[[0.0,0.0],[1.5,2.0]]]");
/// ```
#[must_use]
pub fn to_json(polylines: &[Polyline], pretty: bool) -> String {
    let nested: Vec<Vec<[f64; 2]>> = polylines
        .iter()
        .map(|pl| pl.points().iter().map(|p| [p.x, p.y]).collect())
        .collect();
    let result = if pretty {
        serde_json::to_string_pretty(&nested)
    } else {
        serde_json::to_string(&nested)
    };
    // Finite floats in plain arrays always serialize; non-finite ones
    // become `null` rather than erroring.
    result.unwrap_or_default()
}

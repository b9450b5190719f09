//! Plain-text helpers and the text serializer.
//!
//! [`format_float`] renders coordinates without ever falling back to
//! scientific notation, which keeps output greppable and diffable.
//! The remaining helpers are small value-in/string-out utilities used by
//! the CLI when presenting results.

use std::fmt::{self, Display, Write};

use segjoin_core::Polyline;

/// Default number of significant digits for [`format_float`].
pub const DEFAULT_DECIMALS: usize = 8;

/// Format a float like C's `%.{decimals}g`, but never in scientific
/// notation.
///
/// Values are rounded to `decimals` significant digits and trailing
/// zeros are trimmed. When `%g` would switch to an exponent (very large
/// or very small magnitudes), the value is instead written in fixed
/// notation with `decimals` fractional digits, again with trailing
/// zeros trimmed.
///
/// A `decimals` of 0 is treated as 1 significant digit, as `%g` does.
///
/// # Examples
///
/// ```
/// use segjoin_export::text::format_float;
///
/// assert_eq!(format_float(1.000_000_16, 8), "1.0000002");
/// assert_eq!(format_float(1.000_000_000_000_001, 8), "1");
/// assert_eq!(format_float(100_000_000_000.1, 8), "100000000000.1000061");
/// ```
#[must_use]
pub fn format_float(n: f64, decimals: usize) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let precision = decimals.max(1);
    // Rounding to `precision` significant digits can carry into the next
    // power of ten (9.99 -> 10.0), so read the exponent back from the
    // rounded scientific form rather than computing log10.
    let scientific = format!("{:.*e}", precision - 1, n);
    let exponent = scientific
        .rsplit_once('e')
        .and_then(|(_, exp)| exp.parse::<i64>().ok())
        .unwrap_or(0);

    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    let fixed = if (-4..precision as i64).contains(&exponent) {
        let fraction_digits = (precision as i64 - 1 - exponent) as usize;
        format!("{n:.fraction_digits$}")
    } else {
        format!("{n:.decimals$}")
    };
    trim_fraction(fixed)
}

/// Drop trailing zeros after a decimal point, then a dangling point.
fn trim_fraction(mut s: String) -> String {
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    s
}

/// Collapse every run of whitespace to a single space, trim both ends,
/// and terminate with a newline.
///
/// # Examples
///
/// ```
/// use segjoin_export::text::compress_spaces;
///
/// assert_eq!(compress_spaces("  a \t b\n\nc  "), "a b c\n");
/// ```
#[must_use]
pub fn compress_spaces(line: &str) -> String {
    let mut out = line.split_whitespace().collect::<Vec<_>>().join(" ");
    out.push('\n');
    out
}

/// Wrap a value in double quotes.
#[must_use]
pub fn quoted(value: impl Display) -> String {
    format!("\"{value}\"")
}

/// Write each item surrounded by `prefix` and `suffix`.
///
/// # Errors
///
/// Propagates errors from the underlying writer.
pub fn write_all<W, I>(out: &mut W, items: I, prefix: &str, suffix: &str) -> fmt::Result
where
    W: Write + ?Sized,
    I: IntoIterator,
    I::Item: Display,
{
    for item in items {
        write!(out, "{prefix}{item}{suffix}")?;
    }
    Ok(())
}

/// Render one polyline as space-separated `x,y` pairs.
#[must_use]
pub fn polyline_to_line(polyline: &Polyline, decimals: usize) -> String {
    polyline
        .points()
        .iter()
        .map(|p| {
            let (x, y) = (format_float(p.x, decimals), format_float(p.y, decimals));
            format!("{x},{y}")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Serialize polylines as text, one polyline per line.
///
/// # Examples
///
/// ```
/// use segjoin_core::{Point, Polyline};
/// use segjoin_export::text::to_text;
///
/// let polylines = vec![Polyline::new(vec![Point::new(0.0, 0.0), Point::new(1.5, -2.0)])];
/// assert_eq!(to_text(&polylines, 8), "0,0 1.5,-2\n");
/// ```
#[must_use]
pub fn to_text(polylines: &[Polyline], decimals: usize) -> String {
    let mut out = String::new();
    let lines = polylines.iter().map(|pl| polyline_to_line(pl, decimals));
    // Writing into a String cannot fail.
    let _ = write_all(&mut out, lines, "", "\n");
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use segjoin_core::Point;

    use super::*;

    // --- format_float ---

    #[test]
    fn format_float_rounds_to_significant_digits() {
        assert_eq!(format_float(1.000_000_16, 8), "1.0000002");
        assert_eq!(format_float(-105.118_43, 8), "-105.11843");
        assert_eq!(format_float(39.912, 8), "39.912");
    }

    #[test]
    fn format_float_trims_to_integer() {
        assert_eq!(format_float(1.000_000_000_000_001, 8), "1");
        assert_eq!(format_float(-104.0, 8), "-104");
        assert_eq!(format_float(0.0, 8), "0");
    }

    #[test]
    fn format_float_large_values_avoid_exponent() {
        assert_eq!(format_float(100_000_000_000.1, 8), "100000000000.1000061");
        assert_eq!(format_float(1e20, 8), "100000000000000000000");
    }

    #[test]
    fn format_float_small_values_avoid_exponent() {
        assert_eq!(format_float(0.000_01, 8), "0.00001");
        assert_eq!(format_float(0.000_123_4, 8), "0.0001234");
        assert_eq!(format_float(1e-12, 8), "0");
    }

    #[test]
    fn format_float_rounding_carries_into_next_power() {
        // 99999.9999 at 4 significant digits rounds to 1.000e5, an
        // exponent form, so fixed notation with 4 fractional digits is used.
        assert_eq!(format_float(99_999.999_9, 4), "99999.9999");
        // 9.9999 at 3 digits rounds to 10.0, still inside the %g range.
        assert_eq!(format_float(9.9999, 3), "10");
    }

    #[test]
    fn format_float_zero_decimals() {
        assert_eq!(format_float(3.7, 0), "4");
        assert_eq!(format_float(250.0, 0), "250");
    }

    #[test]
    fn format_float_non_finite() {
        assert_eq!(format_float(f64::NAN, 8), "nan");
        assert_eq!(format_float(f64::INFINITY, 8), "inf");
        assert_eq!(format_float(f64::NEG_INFINITY, 8), "-inf");
    }

    // --- small helpers ---

    #[test]
    fn compress_spaces_collapses_and_trims() {
        assert_eq!(compress_spaces("a    b"), "a b\n");
        assert_eq!(compress_spaces("   "), "\n");
    }

    #[test]
    fn quoted_wraps_in_double_quotes() {
        assert_eq!(quoted("abc"), "\"abc\"");
        assert_eq!(quoted(42), "\"42\"");
    }

    #[test]
    fn write_all_applies_prefix_and_suffix() {
        let mut out = String::new();
        write_all(&mut out, [1, 2, 3], "- ", ";\n").unwrap();
        assert_eq!(out, "- 1;\n- 2;\n- 3;\n");
    }

    // --- text serializer ---

    #[test]
    fn to_text_empty() {
        assert_eq!(to_text(&[], 8), "");
    }

    #[test]
    fn to_text_one_line_per_polyline() {
        let polylines = vec![
            Polyline::new(vec![
                Point::new(-1.0, 0.0),
                Point::new(0.0, 0.0),
                Point::new(0.0, 1.0),
            ]),
            Polyline::new(vec![Point::new(0.25, 0.5), Point::new(1.0, 1.0)]),
        ];
        assert_eq!(to_text(&polylines, 8), "-1,0 0,0 0,1\n0.25,0.5 1,1\n");
    }
}

//! SVG export serializer.
//!
//! Converts polylines into an SVG string with one `<path>` element per
//! polyline, using the [`svg`] crate for document construction and XML
//! escaping. Path data is written with [`format_float`] so geographic
//! or otherwise high-precision coordinates survive (the `svg` crate's
//! own path data formats through `f32`).
//!
//! The `viewBox` is the bounding box of all points, padded by
//! [`MARGIN_FRACTION`] of its larger side. Strokes use
//! `vector-effect="non-scaling-stroke"` so line width does not depend on
//! the coordinate scale.
//!
//! This is a pure function with no I/O -- it returns a `String`.

use svg::Document;
use svg::node::element::{Description, Element, Path, Title};
use svg::node::{Node, Text};

use segjoin_core::{Point, Polyline};

use crate::text::{DEFAULT_DECIMALS, format_float};

/// Padding around the drawing, as a fraction of the bounding box's
/// larger side.
pub const MARGIN_FRACTION: f64 = 0.05;

/// Metadata to embed in the SVG document.
///
/// Text values are XML-escaped automatically by the `svg` crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title, emitted as `<title>`.
    pub title: Option<&'a str>,

    /// Document description, emitted as `<desc>`.
    pub description: Option<&'a str>,

    /// Serialized [`JoinConfig`](segjoin_core::JoinConfig), emitted inside
    /// `<metadata>` wrapped in a namespaced `<segjoin:config>` element.
    pub config_json: Option<&'a str>,
}

/// Axis-aligned bounds of a point set.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Bounds {
    min: Point,
    max: Point,
}

impl Bounds {
    fn of(polylines: &[Polyline]) -> Option<Self> {
        let mut points = polylines.iter().flat_map(|pl| pl.points().iter().copied());
        let first = points.next()?;
        Some(points.fold(
            Self {
                min: first,
                max: first,
            },
            |b, p| Self {
                min: Point::new(b.min.x.min(p.x), b.min.y.min(p.y)),
                max: Point::new(b.max.x.max(p.x), b.max.y.max(p.y)),
            },
        ))
    }

    /// `(x, y, width, height)` padded by [`MARGIN_FRACTION`].
    ///
    /// A degenerate extent (all points on a line or one point) gets a
    /// unit-sized box so the viewBox stays valid.
    fn view_box(self) -> (f64, f64, f64, f64) {
        let width = self.max.x - self.min.x;
        let height = self.max.y - self.min.y;
        let extent = width.max(height);
        let margin = if extent > 0.0 {
            extent * MARGIN_FRACTION
        } else {
            0.5
        };
        (
            self.min.x - margin,
            self.min.y - margin,
            2.0f64.mul_add(margin, width),
            2.0f64.mul_add(margin, height),
        )
    }
}

/// Build an SVG path `d` attribute string from a polyline.
///
/// Uses `M` for the first point and `L` for the rest. A closed polyline
/// drops its repeated final point and ends with `Z`. Returns an empty
/// string for polylines with fewer than 2 points.
///
/// # Examples
///
/// ```
/// use segjoin_core::{Point, Polyline};
/// use segjoin_export::svg::build_path_data;
///
/// let polyline = Polyline::new(vec![
///     Point::new(10.0, 20.0),
///     Point::new(30.0, 40.5),
/// ]);
/// assert_eq!(build_path_data(&polyline, 8), "M10,20 L30,40.5");
/// ```
#[must_use]
pub fn build_path_data(polyline: &Polyline, decimals: usize) -> String {
    let points = polyline.points();
    if points.len() < 2 {
        return String::new();
    }

    let closed = polyline.is_closed();
    let drawn = if closed {
        &points[..points.len() - 1]
    } else {
        points
    };

    let mut parts: Vec<String> = drawn
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let cmd = if i == 0 { "M" } else { "L" };
            format!(
                "{cmd}{},{}",
                format_float(p.x, decimals),
                format_float(p.y, decimals),
            )
        })
        .collect();
    if closed {
        parts.push("Z".to_string());
    }
    parts.join(" ")
}

/// Serialize polylines into an SVG document string.
///
/// Each [`Polyline`] with 2 or more points becomes a `<path>` element.
/// Polylines with fewer than 2 points are skipped. With no drawable
/// points at all, the `viewBox` is `0 0 1 1`.
///
/// # Examples
///
/// ```
/// use segjoin_core::{Point, Polyline};
/// use segjoin_export::svg::{SvgMetadata, to_svg};
///
/// let polylines = vec![
///     Polyline::new(vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0)]),
/// ];
/// let metadata = SvgMetadata {
///     title: Some("roads"),
///     ..SvgMetadata::default()
/// };
/// let svg = to_svg(&polylines, &metadata);
/// assert!(svg.contains("<title>roads</title>"));
/// assert!(svg.contains(r#"d="M0,0 L10,0""#));
/// ```
#[must_use]
pub fn to_svg(polylines: &[Polyline], metadata: &SvgMetadata<'_>) -> String {
    to_svg_with_decimals(polylines, metadata, DEFAULT_DECIMALS)
}

/// Like [`to_svg`] with an explicit number of significant digits for
/// coordinates.
#[must_use]
pub fn to_svg_with_decimals(
    polylines: &[Polyline],
    metadata: &SvgMetadata<'_>,
    decimals: usize,
) -> String {
    let (x, y, w, h) = Bounds::of(polylines).map_or((0.0, 0.0, 1.0, 1.0), Bounds::view_box);
    let fmt = |v: f64| format_float(v, decimals);

    let mut doc = Document::new().set(
        "viewBox",
        format!("{} {} {} {}", fmt(x), fmt(y), fmt(w), fmt(h)),
    );

    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }

    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    if let Some(config_json) = metadata.config_json {
        let mut config_el = Element::new("segjoin:config");
        config_el.assign("xmlns:segjoin", "https://segjoin.dev/ns/1");
        config_el.append(Text::new(config_json));
        let mut metadata_el = Element::new("metadata");
        metadata_el.append(config_el);
        doc = doc.add(metadata_el);
    }

    for polyline in polylines {
        let d = build_path_data(polyline, decimals);
        if d.is_empty() {
            continue;
        }

        let path = Path::new()
            .set("d", d)
            .set("fill", "none")
            .set("stroke", "black")
            .set("stroke-width", 1)
            .set("vector-effect", "non-scaling-stroke");
        doc = doc.add(path);
    }

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}

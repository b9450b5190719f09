//! segjoin-export: Pure format serializers (sans-IO)
//!
//! Converts joined polylines into output formats: plain text, JSON and
//! SVG. Every serializer returns a `String`; writing it anywhere is the
//! caller's job.

pub mod json;
pub mod svg;
pub mod text;

pub use json::to_json;
pub use svg::{SvgMetadata, to_svg, to_svg_with_decimals};
pub use text::{DEFAULT_DECIMALS, format_float, to_text};

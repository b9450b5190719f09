//! segjoin: join loose line segments from a JSON file into polylines.
//!
//! Reads segments as `[[[x1, y1], [x2, y2]], ...]` from a file or stdin,
//! joins those sharing exact endpoints, and writes the polylines as text,
//! JSON, or SVG.
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin segjoin -- [OPTIONS] [INPUT]
//! ```
//!
//! Set `RUST_LOG=debug` to see stage summaries on stderr.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use segjoin_core::diagnostics::{Clock, join_with_diagnostics};
use segjoin_core::{JoinConfig, Polyline, input::parse_segments_json};
use segjoin_export::{DEFAULT_DECIMALS, SvgMetadata};

/// Join line segments that share exact endpoints into polylines.
#[derive(Parser)]
#[command(name = "segjoin", version)]
struct Cli {
    /// Path to a JSON segment list. Reads stdin when absent or `-`.
    input: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Significant digits for coordinates in text and SVG output.
    #[arg(long, default_value_t = DEFAULT_DECIMALS, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..=17))]
    decimals: usize,

    /// Write output to a file instead of stdout.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Leave rings open instead of repeating the first point at the end.
    #[arg(long)]
    no_close_loops: bool,

    /// Full join config as a JSON string.
    ///
    /// When provided, `--no-close-loops` is ignored. The JSON must be a
    /// valid `JoinConfig` serialization; missing fields take defaults.
    #[arg(long)]
    config_json: Option<String>,

    /// Print a per-stage timing and count report to stderr.
    #[arg(long)]
    diagnostics: bool,

    /// Title embedded in SVG output. Defaults to the input file stem.
    #[arg(long)]
    title: Option<String>,
}

/// Output format selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// One polyline per line as space-separated `x,y` pairs.
    Text,
    /// Nested `[[[x, y], ...], ...]` arrays.
    Json,
    /// SVG document with one path per polyline.
    Svg,
}

/// Build a [`JoinConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and the
/// individual flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<JoinConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(JoinConfig {
        close_loops: !cli.no_close_loops,
    })
}

/// Read the whole input, from a file or stdin.
fn read_input(path: Option<&PathBuf>) -> Result<String, String> {
    match path {
        Some(p) if p.as_os_str() != "-" => {
            std::fs::read_to_string(p).map_err(|e| format!("Error reading {}: {e}", p.display()))
        }
        _ => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| format!("Error reading stdin: {e}"))?;
            Ok(text)
        }
    }
}

/// Serialize polylines in the selected format.
fn render(cli: &Cli, config: &JoinConfig, polylines: &[Polyline]) -> Result<String, String> {
    match cli.format {
        Format::Text => Ok(segjoin_export::to_text(polylines, cli.decimals)),
        Format::Json => {
            let mut json = segjoin_export::to_json(polylines, true);
            json.push('\n');
            Ok(json)
        }
        Format::Svg => {
            let config_json = serde_json::to_string(config)
                .map_err(|e| format!("Error serializing config: {e}"))?;
            let stem = cli
                .input
                .as_ref()
                .and_then(|p| p.file_stem())
                .and_then(|s| s.to_str())
                .filter(|s| *s != "-");
            let metadata = SvgMetadata {
                title: cli.title.as_deref().or(stem),
                description: Some("Polylines joined from line segments"),
                config_json: Some(&config_json),
            };
            Ok(segjoin_export::to_svg_with_decimals(
                polylines,
                &metadata,
                cli.decimals,
            ))
        }
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let config = config_from_cli(cli)?;
    let text = read_input(cli.input.as_ref())?;
    let segments = parse_segments_json(&text).map_err(|e| format!("Input error: {e}"))?;
    log::info!("read {} segments", segments.len());

    let (chains, diagnostics) = join_with_diagnostics(&segments, &config, &StdClock)
        .map_err(|e| format!("Join error: {e}"))?;
    if cli.diagnostics {
        eprintln!("{}", diagnostics.report());
    }

    let polylines: Vec<Polyline> = chains.into_iter().map(|c| c.polyline).collect();
    let output = render(cli, &config, &polylines)?;

    match cli.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .map_err(|e| format!("Error writing {}: {e}", path.display()))?;
            log::info!("wrote {} bytes to {}", output.len(), path.display());
        }
        None => print!("{output}"),
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(msg) => {
            eprintln!("{msg}");
            ExitCode::FAILURE
        }
    }
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use segjoin_core::{Segment, join_segments};

    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("segjoin").chain(args.iter().copied())).unwrap()
    }

    fn triangle() -> Vec<Polyline> {
        join_segments(&[
            Segment::from(((0.0, 0.0), (4.0, 0.0))),
            Segment::from(((4.0, 0.0), (2.0, 3.0))),
            Segment::from(((2.0, 3.0), (0.0, 0.0))),
        ])
        .unwrap()
    }

    #[test]
    fn defaults() {
        let cli = cli(&[]);
        assert!(cli.input.is_none());
        assert_eq!(cli.format, Format::Text);
        assert_eq!(cli.decimals, DEFAULT_DECIMALS);
        assert_eq!(config_from_cli(&cli).unwrap(), JoinConfig::default());
    }

    #[test]
    fn no_close_loops_flag() {
        let config = config_from_cli(&cli(&["--no-close-loops"])).unwrap();
        assert!(!config.close_loops);
    }

    #[test]
    fn config_json_overrides_flags() {
        let config = config_from_cli(&cli(&[
            "--no-close-loops",
            "--config-json",
            r#"{"close_loops": true}"#,
        ]))
        .unwrap();
        assert!(config.close_loops);
    }

    #[test]
    fn config_json_missing_fields_take_defaults() {
        let config = config_from_cli(&cli(&["--config-json", "{}"])).unwrap();
        assert_eq!(config, JoinConfig::default());
    }

    #[test]
    fn bad_config_json_is_reported() {
        let err = config_from_cli(&cli(&["--config-json", "nope"])).unwrap_err();
        assert!(err.starts_with("Error parsing --config-json"));
    }

    #[test]
    fn decimals_out_of_range_rejected() {
        let args = ["segjoin", "--decimals", "0"];
        assert!(Cli::try_parse_from(args).is_err());
    }

    #[test]
    fn missing_input_file_is_reported() {
        let err = read_input(Some(&PathBuf::from("/nonexistent/segments.json"))).unwrap_err();
        assert!(err.starts_with("Error reading /nonexistent/segments.json"));
    }

    #[test]
    fn render_text() {
        let cli = cli(&[]);
        let out = render(&cli, &JoinConfig::default(), &triangle()).unwrap();
        assert_eq!(out, "0,0 4,0 2,3 0,0\n");
    }

    #[test]
    fn render_json_ends_with_newline() {
        let cli = cli(&["--format", "json"]);
        let out = render(&cli, &JoinConfig::default(), &triangle()).unwrap();
        assert!(out.ends_with("]\n"));
        let back: Vec<Vec<[f64; 2]>> = serde_json::from_str(&out).unwrap();
        assert_eq!(back[0].len(), 4);
    }

    #[test]
    fn render_svg_uses_input_stem_as_title() {
        let cli = cli(&["--format", "svg", "roads.json"]);
        let out = render(&cli, &JoinConfig::default(), &triangle()).unwrap();
        assert!(out.contains("<title>roads</title>"));
        assert!(out.contains("close_loops"));
        assert!(out.contains(r#"d="M0,0 L4,0 L2,3 Z""#));
    }

    #[test]
    fn render_svg_explicit_title_wins() {
        let cli = cli(&["--format", "svg", "--title", "Trails", "-"]);
        let out = render(&cli, &JoinConfig::default(), &triangle()).unwrap();
        assert!(out.contains("<title>Trails</title>"));
    }
}

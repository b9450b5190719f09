//! Join diagnostics: timing and counts for each stage.
//!
//! Timestamps come from a caller-supplied [`Clock`] so this crate stays
//! free of platform time APIs. Durations are serialized as fractional
//! seconds (`f64`) since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::builder::{ChainBuilder, JoinedChain};
use crate::extract::{extract_observations, group_observations};
use crate::index::SharedPointIndex;
use crate::types::{JoinConfig, JoinError, Segment};

/// Source of monotonic timestamps.
pub trait Clock {
    /// Opaque timestamp type.
    type Instant;

    /// Current timestamp.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Diagnostics collected from a single join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinDiagnostics {
    /// Stage 1: endpoint extraction.
    pub extraction: StageDiagnostics,
    /// Stage 2: grouping by coordinate.
    pub grouping: StageDiagnostics,
    /// Stage 3: shared-point index construction.
    pub indexing: StageDiagnostics,
    /// Stage 4: greedy chain building.
    pub chaining: StageDiagnostics,
    /// Total wall-clock duration of the join (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary counts.
    pub summary: JoinSummary,
}

/// Diagnostics for a single stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Endpoint extraction metrics.
    Extraction {
        /// Number of input segments.
        segment_count: usize,
        /// Number of endpoint observations (twice the segment count).
        observation_count: usize,
    },
    /// Grouping metrics.
    Grouping {
        /// Number of distinct coordinates.
        group_count: usize,
        /// Groups with more than two endpoints.
        branch_point_count: usize,
        /// Largest number of endpoints sharing one coordinate.
        max_degree: usize,
    },
    /// Index construction metrics.
    Indexing {
        /// Number of `(segment, end)` slots.
        slot_count: usize,
    },
    /// Chain building metrics.
    Chaining {
        /// Number of chains emitted.
        chain_count: usize,
        /// Chains closed into loops.
        closed_loops: usize,
        /// Zero-length segments emitted on their own.
        zero_length: usize,
        /// Candidates skipped to avoid revisiting a point.
        rejected_candidates: usize,
        /// Points in the longest chain.
        longest_chain_points: usize,
    },
}

/// High-level summary of a join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinSummary {
    /// Number of input segments.
    pub segment_count: usize,
    /// Number of output polylines.
    pub polyline_count: usize,
    /// Total points across all output polylines.
    pub output_point_count: usize,
    /// Summed length of the input segments.
    pub input_length: f64,
    /// Summed length of the output polylines. Equals `input_length` up to
    /// rounding, since every segment is drawn exactly once.
    pub output_length: f64,
}

impl JoinDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Join Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Segments: {}  |  Polylines: {}  |  Output points: {}",
            self.summary.segment_count,
            self.summary.polyline_count,
            self.summary.output_point_count,
        ));
        lines.push(format!(
            "Input length: {:.3}  |  Output length: {:.3}",
            self.summary.input_length,
            self.summary.output_length,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<16} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(80));

        let total_ms = duration_ms(self.total_duration);
        let stages = [
            ("Extraction", &self.extraction),
            ("Grouping", &self.grouping),
            ("Indexing", &self.indexing),
            ("Chaining", &self.chaining),
        ];

        for (name, diag) in stages {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<16} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.join("\n")
    }
}

/// Run the join, timing each stage with `clock`.
///
/// Produces the same chains as [`join_segments_with`](crate::join_segments_with).
///
/// # Errors
///
/// Returns [`JoinError::NonFiniteCoordinate`] for invalid input and
/// [`JoinError::MissingSharedPoint`] on an internal indexing defect.
pub fn join_with_diagnostics<C: Clock>(
    segments: &[Segment],
    config: &JoinConfig,
    clock: &C,
) -> Result<(Vec<JoinedChain>, JoinDiagnostics), JoinError> {
    crate::input::validate_segments(segments)?;
    let start = clock.now();

    let t = clock.now();
    let observations = extract_observations(segments);
    let extraction = StageDiagnostics {
        duration: clock.elapsed(&t),
        metrics: StageMetrics::Extraction {
            segment_count: segments.len(),
            observation_count: observations.len(),
        },
    };

    let t = clock.now();
    let groups = group_observations(&observations);
    let grouping_duration = clock.elapsed(&t);

    let t = clock.now();
    let index = SharedPointIndex::build(groups, segments.len());
    let indexing = StageDiagnostics {
        duration: clock.elapsed(&t),
        metrics: StageMetrics::Indexing {
            slot_count: index.segment_count() * 2,
        },
    };
    let grouping = StageDiagnostics {
        duration: grouping_duration,
        metrics: StageMetrics::Grouping {
            group_count: index.groups().len(),
            branch_point_count: index.branch_points().count(),
            max_degree: index.max_degree(),
        },
    };

    let t = clock.now();
    let (chains, stats) = ChainBuilder::new(segments, &index, config).build()?;
    let chaining = StageDiagnostics {
        duration: clock.elapsed(&t),
        metrics: StageMetrics::Chaining {
            chain_count: chains.len(),
            closed_loops: stats.closed_loops,
            zero_length: stats.zero_length,
            rejected_candidates: stats.rejected_candidates,
            longest_chain_points: chains.iter().map(|c| c.polyline.len()).max().unwrap_or(0),
        },
    };

    let summary = JoinSummary {
        segment_count: segments.len(),
        polyline_count: chains.len(),
        output_point_count: chains.iter().map(|c| c.polyline.len()).sum(),
        input_length: segments.iter().map(Segment::length).sum(),
        output_length: chains.iter().map(|c| c.polyline.length()).sum(),
    };

    let diagnostics = JoinDiagnostics {
        extraction,
        grouping,
        indexing,
        chaining,
        total_duration: clock.elapsed(&start),
        summary,
    };
    Ok((chains, diagnostics))
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Extraction {
            segment_count,
            observation_count,
        } => format!("{segment_count} segments -> {observation_count} endpoints"),
        StageMetrics::Grouping {
            group_count,
            branch_point_count,
            max_degree,
        } => format!(
            "{group_count} shared points, {branch_point_count} branch points (max degree {max_degree})"
        ),
        StageMetrics::Indexing { slot_count } => format!("{slot_count} slots"),
        StageMetrics::Chaining {
            chain_count,
            closed_loops,
            zero_length,
            rejected_candidates,
            longest_chain_points,
        } => format!(
            "{chain_count} chains ({closed_loops} loops, {zero_length} zero-length), {rejected_candidates} rejected, longest {longest_chain_points} pts"
        ),
    }
}

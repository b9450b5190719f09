//! segjoin-core: join loose 2D line segments into polylines (sans-IO).
//!
//! Segments that share an exact endpoint coordinate are chained greedily
//! through three stages:
//! endpoint extraction and grouping -> shared-point index -> chain
//! building.
//!
//! This crate has **no I/O dependencies**. Parsing input files, printing
//! and serializing results live in `segjoin-export` and the `segjoin`
//! binary.
//!
//! The joiner is quadratic in the worst case (every endpoint on one
//! coordinate) and is meant for modest segment counts.

pub mod builder;
pub mod diagnostics;
pub mod extract;
pub mod index;
pub mod input;
pub mod types;

pub use builder::{BuildStats, ChainBuilder, JoinedChain};
pub use index::SharedPointIndex;
pub use types::{End, JoinConfig, JoinError, Point, PointKey, Polyline, Segment};

/// Join segments into polylines with the default [`JoinConfig`].
///
/// Every segment ends up in exactly one polyline. Segments meeting at a
/// branch point are split across several polylines; see
/// [`builder`] for the tie-break.
///
/// # Errors
///
/// Returns [`JoinError::NonFiniteCoordinate`] if any coordinate is NaN
/// or infinite.
///
/// # Examples
///
/// ```
/// use segjoin_core::{Point, Segment, join_segments};
///
/// let polylines = join_segments(&[
///     Segment::from(((0.0, 0.0), (1.0, 0.0))),
///     Segment::from(((1.0, 0.0), (2.0, 0.0))),
/// ])
/// .unwrap();
/// assert_eq!(polylines.len(), 1);
/// assert_eq!(
///     polylines[0].points(),
///     &[Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(2.0, 0.0)],
/// );
/// ```
pub fn join_segments(segments: &[Segment]) -> Result<Vec<Polyline>, JoinError> {
    Ok(join_segments_with(segments, &JoinConfig::default())?
        .into_iter()
        .map(|chain| chain.polyline)
        .collect())
}

/// Join segments into chains, keeping the segment indices each chain
/// consumed.
///
/// # Errors
///
/// Returns [`JoinError::NonFiniteCoordinate`] for invalid input and
/// [`JoinError::MissingSharedPoint`] on an internal indexing defect.
pub fn join_segments_with(
    segments: &[Segment],
    config: &JoinConfig,
) -> Result<Vec<JoinedChain>, JoinError> {
    input::validate_segments(segments)?;

    let observations = extract::extract_observations(segments);
    let groups = extract::group_observations(&observations);
    let index = SharedPointIndex::build(groups, segments.len());
    log::debug!(
        "grouped {} endpoints into {} shared points ({} branch points)",
        observations.len(),
        index.groups().len(),
        index.branch_points().count(),
    );

    let (chains, _stats) = ChainBuilder::new(segments, &index, config).build()?;
    Ok(chains)
}

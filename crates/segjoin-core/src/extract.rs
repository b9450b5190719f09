//! Point extraction and grouping.
//!
//! Every segment contributes two endpoint observations. Observations
//! whose coordinates are exactly equal are collected into one
//! [`SharedPointGroup`]; the groups partition the full observation set.
//!
//! This is the first stage of the joiner, ahead of the shared-point
//! index.

use std::collections::BTreeMap;

use crate::types::{End, Point, PointKey, Segment};

/// One endpoint of one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Where the endpoint lies.
    pub point: Point,
    /// Index of the owning segment in the input.
    pub segment: usize,
    /// Which end of the owning segment this is.
    pub end: End,
}

/// All observations sharing one exact coordinate.
///
/// Observations are ordered by ascending segment index, `Begin` before
/// `End`. The chain builder relies on this order for its tie-break.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedPointGroup {
    point: Point,
    observations: Vec<Observation>,
}

impl SharedPointGroup {
    /// The shared coordinate.
    #[must_use]
    pub const fn point(&self) -> Point {
        self.point
    }

    /// The co-located observations in tie-break order.
    #[must_use]
    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    /// Number of endpoints at this coordinate.
    #[must_use]
    pub const fn degree(&self) -> usize {
        self.observations.len()
    }

    /// Returns `true` when more than two endpoints meet here.
    #[must_use]
    pub const fn is_branch_point(&self) -> bool {
        self.observations.len() > 2
    }

    /// Returns `true` if the group holds the given endpoint.
    #[must_use]
    pub fn contains(&self, segment: usize, end: End) -> bool {
        self.observations
            .iter()
            .any(|o| o.segment == segment && o.end == end)
    }
}

/// Flatten segments into `2 * segments.len()` endpoint observations.
///
/// Observations come out in segment order, `Begin` before `End`.
#[must_use]
pub fn extract_observations(segments: &[Segment]) -> Vec<Observation> {
    segments
        .iter()
        .enumerate()
        .flat_map(|(segment, s)| {
            End::BOTH.map(|end| Observation {
                point: s.point(end),
                segment,
                end,
            })
        })
        .collect()
}

/// Group observations by exact coordinate.
///
/// Groups are returned in ascending coordinate order (by `x`, then
/// `y`). Within a group, observations keep their input order, so input
/// from [`extract_observations`] yields the documented tie-break order.
///
/// # Examples
///
/// ```
/// use segjoin_core::Segment;
/// use segjoin_core::extract::{extract_observations, group_observations};
///
/// let segments = [
///     Segment::from(((0.0, 0.0), (1.0, 0.0))),
///     Segment::from(((1.0, 0.0), (2.0, 0.0))),
/// ];
/// let groups = group_observations(&extract_observations(&segments));
/// assert_eq!(groups.len(), 3);
/// assert_eq!(groups[1].degree(), 2);
/// ```
#[must_use]
pub fn group_observations(observations: &[Observation]) -> Vec<SharedPointGroup> {
    let mut by_point: BTreeMap<PointKey, Vec<Observation>> = BTreeMap::new();
    for obs in observations {
        by_point.entry(obs.point.key()).or_default().push(*obs);
    }

    by_point
        .into_iter()
        .map(|(key, observations)| SharedPointGroup {
            point: key.point(),
            observations,
        })
        .collect()
}

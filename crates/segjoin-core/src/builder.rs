//! Greedy chain builder.
//!
//! Repeatedly seeds a chain with the lowest-index unused segment and
//! grows it outward, tail first and then head, by following the
//! shared-point index to other unused segments. A chain is emitted once
//! neither end can be extended.
//!
//! # Tie-break
//!
//! At a branch point (more than two endpoints on one coordinate) the
//! first acceptable candidate in group order wins: lowest segment index
//! first, `Begin` before `End`. The arms not taken are left for later
//! chains. This is a greedy decomposition, not a minimal one.
//!
//! # Revisits
//!
//! A candidate whose far point is already in the chain is rejected and
//! stays unused, so it seeds or joins a later chain. The one exception
//! is a candidate whose far point is the chain's other terminal: with
//! [`JoinConfig::close_loops`] it closes the loop and the chain is done.
//! Loops always close while extending the tail: any segment linking the
//! tail to a point the head later reaches is taken by the tail first.
//!
//! Every accepted candidate removes one segment from the unused set, so
//! the builder always terminates.

use std::collections::{BTreeSet, HashSet, VecDeque};

use crate::index::SharedPointIndex;
use crate::types::{End, JoinConfig, JoinError, Point, PointKey, Polyline, Segment};

/// A finished chain.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedChain {
    /// The chain's points, terminal to terminal.
    pub polyline: Polyline,
    /// Consumed segment indices in polyline order: segment `k` spans
    /// points `k` and `k + 1`.
    pub segments: Vec<usize>,
    /// Whether the chain was closed into a loop.
    pub closed: bool,
}

/// Counters collected while building chains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Candidates skipped because their far point was already in the chain.
    pub rejected_candidates: usize,
    /// Chains closed into loops.
    pub closed_loops: usize,
    /// Zero-length segments emitted as two-point chains.
    pub zero_length: usize,
}

/// Which free end of a chain is being extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Tail,
    Head,
}

impl Side {
    const fn opposite(self) -> Self {
        match self {
            Self::Tail => Self::Head,
            Self::Head => Self::Tail,
        }
    }
}

/// A chain under construction.
struct Chain {
    points: VecDeque<Point>,
    segments: VecDeque<usize>,
    visited: HashSet<PointKey>,
    closed: bool,
}

impl Chain {
    fn seed(index: usize, segment: &Segment) -> Self {
        Self {
            points: VecDeque::from([segment.begin, segment.end]),
            segments: VecDeque::from([index]),
            visited: HashSet::from([segment.begin.key(), segment.end.key()]),
            closed: false,
        }
    }

    fn terminal(&self, side: Side) -> Option<Point> {
        match side {
            Side::Tail => self.points.back().copied(),
            Side::Head => self.points.front().copied(),
        }
    }

    fn attach(&mut self, side: Side, point: Point, segment: usize) {
        self.visited.insert(point.key());
        match side {
            Side::Tail => {
                self.points.push_back(point);
                self.segments.push_back(segment);
            }
            Side::Head => {
                self.points.push_front(point);
                self.segments.push_front(segment);
            }
        }
    }

    fn finish(self) -> JoinedChain {
        JoinedChain {
            polyline: Polyline::new(self.points.into()),
            segments: self.segments.into(),
            closed: self.closed,
        }
    }
}

/// Builds chains from segments and their shared-point index.
///
/// The builder exclusively owns the set of unused segments; nothing
/// else observes or mutates it.
pub struct ChainBuilder<'a> {
    segments: &'a [Segment],
    index: &'a SharedPointIndex,
    config: &'a JoinConfig,
    unused: BTreeSet<usize>,
    stats: BuildStats,
}

impl<'a> ChainBuilder<'a> {
    /// Create a builder. `index` must have been built from `segments`.
    #[must_use]
    pub fn new(
        segments: &'a [Segment],
        index: &'a SharedPointIndex,
        config: &'a JoinConfig,
    ) -> Self {
        Self {
            segments,
            index,
            config,
            unused: (0..segments.len()).collect(),
            stats: BuildStats::default(),
        }
    }

    /// Consume every segment into chains.
    ///
    /// # Errors
    ///
    /// Returns [`JoinError::MissingSharedPoint`] if the index has no
    /// group for an endpoint of a segment being extended.
    pub fn build(mut self) -> Result<(Vec<JoinedChain>, BuildStats), JoinError> {
        let segments = self.segments;
        let mut chains = Vec::new();
        for (seed, segment) in segments.iter().enumerate() {
            if self.unused.remove(&seed) {
                chains.push(self.grow(seed, segment)?);
            }
        }

        log::debug!(
            "built {} chains from {} segments ({} loops, {} zero-length, {} rejected candidates)",
            chains.len(),
            self.segments.len(),
            self.stats.closed_loops,
            self.stats.zero_length,
            self.stats.rejected_candidates,
        );

        Ok((chains, self.stats))
    }

    /// Grow one chain from `seed` until both ends are final.
    fn grow(&mut self, seed: usize, seed_segment: &Segment) -> Result<JoinedChain, JoinError> {
        let mut chain = Chain::seed(seed, seed_segment);
        if seed_segment.is_zero_length() {
            self.stats.zero_length += 1;
            return Ok(chain.finish());
        }

        for (side, end) in [(Side::Tail, End::End), (Side::Head, End::Begin)] {
            let mut frontier = (seed, end);
            while !chain.closed {
                match self.extend(&mut chain, side, frontier)? {
                    Some(next) => frontier = next,
                    None => break,
                }
            }
        }

        Ok(chain.finish())
    }

    /// Try to attach one more segment at `side`, whose current terminal
    /// is endpoint `frontier`.
    ///
    /// Returns the new frontier, or `None` if this end is final.
    fn extend(
        &mut self,
        chain: &mut Chain,
        side: Side,
        (segment, end): (usize, End),
    ) -> Result<Option<(usize, End)>, JoinError> {
        let index = self.index;
        let segments = self.segments;
        let group = index.lookup(segment, end)?;
        let other_terminal = chain.terminal(side.opposite()).map(Point::key);

        for obs in group.observations() {
            if !self.unused.contains(&obs.segment) {
                continue;
            }
            let Some(candidate) = segments.get(obs.segment) else {
                continue;
            };

            let far_end = obs.end.opposite();
            let far = candidate.point(far_end);
            let far_key = far.key();

            let closes_loop = if chain.visited.contains(&far_key) {
                if self.config.close_loops && Some(far_key) == other_terminal {
                    true
                } else {
                    self.stats.rejected_candidates += 1;
                    log::trace!(
                        "segment {} rejected at ({}, {}): ({}, {}) already in chain",
                        obs.segment,
                        obs.point.x,
                        obs.point.y,
                        far.x,
                        far.y,
                    );
                    continue;
                }
            } else {
                false
            };

            self.unused.remove(&obs.segment);
            chain.attach(side, far, obs.segment);

            if closes_loop {
                chain.closed = true;
                self.stats.closed_loops += 1;
                return Ok(None);
            }
            return Ok(Some((obs.segment, far_end)));
        }

        Ok(None)
    }
}

//! Shared-point index: constant-time lookup from an endpoint to the
//! group of endpoints co-located with it.

use crate::extract::SharedPointGroup;
use crate::types::{End, JoinError};

/// Adjacency map for the chain builder.
///
/// Holds the shared-point groups and a slot table mapping every
/// `(segment, end)` pair to the group containing it.
#[derive(Debug, Clone)]
pub struct SharedPointIndex {
    groups: Vec<SharedPointGroup>,
    /// `slots[2 * segment + end.flag()]` is the group index, or `None`
    /// if the groups were built from a different segment set.
    slots: Vec<Option<usize>>,
}

impl SharedPointIndex {
    /// Build the index for `segment_count` segments from their groups.
    ///
    /// Observations referring to segments outside `0..segment_count`
    /// are ignored.
    #[must_use]
    pub fn build(groups: Vec<SharedPointGroup>, segment_count: usize) -> Self {
        let mut slots = vec![None; segment_count * 2];
        for (group_idx, group) in groups.iter().enumerate() {
            for obs in group.observations() {
                if let Some(slot) = slots.get_mut(slot_of(obs.segment, obs.end)) {
                    *slot = Some(group_idx);
                }
            }
        }
        Self { groups, slots }
    }

    /// Look up the group holding the given endpoint, itself included.
    ///
    /// # Errors
    ///
    /// Returns [`JoinError::MissingSharedPoint`] if the endpoint was
    /// never grouped. With groups built from the same segments this
    /// cannot happen; it signals an indexing defect.
    pub fn lookup(&self, segment: usize, end: End) -> Result<&SharedPointGroup, JoinError> {
        self.slots
            .get(slot_of(segment, end))
            .copied()
            .flatten()
            .and_then(|group_idx| self.groups.get(group_idx))
            .ok_or(JoinError::MissingSharedPoint { segment, end })
    }

    /// All groups, in ascending coordinate order.
    #[must_use]
    pub fn groups(&self) -> &[SharedPointGroup] {
        &self.groups
    }

    /// Groups where more than two endpoints meet.
    pub fn branch_points(&self) -> impl Iterator<Item = &SharedPointGroup> {
        self.groups.iter().filter(|g| g.is_branch_point())
    }

    /// Highest group degree, or 0 for an empty index.
    #[must_use]
    pub fn max_degree(&self) -> usize {
        self.groups
            .iter()
            .map(SharedPointGroup::degree)
            .max()
            .unwrap_or(0)
    }

    /// Number of segments the index was built for.
    #[must_use]
    pub const fn segment_count(&self) -> usize {
        self.slots.len() / 2
    }
}

const fn slot_of(segment: usize, end: End) -> usize {
    segment * 2 + end.flag()
}

use std::collections::BTreeSet;

use nq_core::{AttributeFilter, Segment, SegmentId};

/// Segments designated as network sinks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutletSet(BTreeSet<SegmentId>);

impl OutletSet {
    pub fn new(ids: impl IntoIterator<Item = SegmentId>) -> Self {
        Self(ids.into_iter().collect())
    }

    /// Outlets are the segments whose attributes pass `filter`.
    pub fn select(segments: &[Segment], filter: &AttributeFilter) -> Self {
        segments
            .iter()
            .filter(|s| filter.matches_segment(s))
            .map(|s| s.id)
            .collect()
    }

    pub fn contains(&self, id: SegmentId) -> bool {
        self.0.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Ascending.
    pub fn iter(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<SegmentId> for OutletSet {
    fn from_iter<T: IntoIterator<Item = SegmentId>>(iter: T) -> Self {
        Self::new(iter)
    }
}

use std::collections::BTreeSet;

use nq_core::{EndpointRole, Point2d, SegmentId};

use crate::graph::NodeId;
use crate::index::{EndpointIndex, EndpointRef};

/// An endpoint of another segment lying within tolerance of one of ours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EndpointMatch {
    pub other_node: NodeId,
    pub other: SegmentId,
    pub other_role: EndpointRole,
    pub own_role: EndpointRole,
}

/// Finds tolerance-linked endpoints of other segments.
///
/// Ties are not resolved: every endpoint within tolerance is reported, so a
/// junction where three or more segments meet yields one match per segment.
pub struct EndpointMatcher<'a, I> {
    index: &'a I,
    segments: &'a [SegmentId],
    endpoints: &'a [[Point2d; 2]],
    tolerance: f64,
}

impl<'a, I: EndpointIndex> EndpointMatcher<'a, I> {
    /// `segments[i]` and `endpoints[i]` describe node `i`, the same layout the
    /// index was built from.
    pub fn new(
        index: &'a I,
        segments: &'a [SegmentId],
        endpoints: &'a [[Point2d; 2]],
        tolerance: f64,
    ) -> Self {
        debug_assert_eq!(segments.len(), endpoints.len());
        Self {
            index,
            segments,
            endpoints,
            tolerance,
        }
    }

    pub fn matches(&self, node: NodeId) -> BTreeSet<EndpointMatch> {
        let mut scratch = Vec::new();
        let mut out = BTreeSet::new();
        self.matches_into(node, &mut scratch, &mut out);
        out
    }

    /// Same as [`Self::matches`], reusing caller buffers. `out` is cleared.
    pub fn matches_into(
        &self,
        node: NodeId,
        scratch: &mut Vec<EndpointRef>,
        out: &mut BTreeSet<EndpointMatch>,
    ) {
        out.clear();
        for (own_role, p) in EndpointRole::BOTH.into_iter().zip(self.endpoints[node]) {
            scratch.clear();
            self.index.within(p, self.tolerance, scratch);
            for hit in scratch.iter() {
                if hit.node == node {
                    continue;
                }
                out.insert(EndpointMatch {
                    other_node: hit.node,
                    other: self.segments[hit.node],
                    other_role: hit.role,
                    own_role,
                });
            }
        }
    }
}

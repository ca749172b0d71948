use std::collections::{BTreeMap, BTreeSet};

use nq_core::{GeometryError, Point2d, Segment, SegmentId};
use tracing::{debug, warn};

use crate::config::Tolerance;
use crate::error::ConfigurationError;
use crate::graph::{AdjacencyGraph, GraphEdge, GraphNode, Joint, NodeId};
use crate::index::{EndpointIndex, RTreeIndex};
use crate::matcher::EndpointMatcher;

/// Segments split into graph nodes and geometry rejects, both keyed by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkNodes {
    /// Ascending; `segments[i]` is node `i`.
    pub segments: Vec<SegmentId>,
    pub endpoints: Vec<[Point2d; 2]>,
    pub invalid: BTreeMap<SegmentId, GeometryError>,
}

impl NetworkNodes {
    /// Fails on duplicate identifiers. Invalid geometry is recorded, not fatal.
    pub fn from_segments(segments: &[Segment]) -> Result<Self, ConfigurationError> {
        let mut valid = Vec::with_capacity(segments.len());
        let mut invalid = BTreeMap::new();
        let mut seen = BTreeSet::new();

        for segment in segments {
            if !seen.insert(segment.id) {
                return Err(ConfigurationError::DuplicateSegment(segment.id));
            }
            match segment.endpoints() {
                Ok(endpoints) => valid.push((segment.id, endpoints)),
                Err(err) => {
                    warn!(segment = %segment.id, error = %err, "segment excluded from adjacency graph");
                    invalid.insert(segment.id, err);
                }
            }
        }

        valid.sort_unstable_by_key(|(id, _)| *id);
        let (segments, endpoints) = valid.into_iter().unzip();

        Ok(Self {
            segments,
            endpoints,
            invalid,
        })
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Output of [`build_graph_from_segments`].
#[derive(Debug, Clone, PartialEq)]
pub struct GraphBuild {
    pub graph: AdjacencyGraph,
    pub invalid: BTreeMap<SegmentId, GeometryError>,
}

pub fn build_graph_from_segments(
    segments: &[Segment],
    tolerance: Tolerance,
) -> Result<GraphBuild, ConfigurationError> {
    let nodes = NetworkNodes::from_segments(segments)?;
    let graph = build_graph_from_nodes::<RTreeIndex>(&nodes, tolerance);
    Ok(GraphBuild {
        graph,
        invalid: nodes.invalid,
    })
}

/// Inserts one undirected edge per pair of segments with at least one pair of
/// endpoints within `tolerance`.
pub fn build_graph_from_nodes<I: EndpointIndex>(
    nodes: &NetworkNodes,
    tolerance: Tolerance,
) -> AdjacencyGraph {
    let index = I::from_endpoints(&nodes.endpoints);
    let matcher = EndpointMatcher::new(&index, &nodes.segments, &nodes.endpoints, tolerance.get());

    // Each joint is discovered from both sides; the set keeps one copy.
    let mut joints: BTreeMap<(NodeId, NodeId), BTreeSet<Joint>> = BTreeMap::new();
    let mut scratch = Vec::new();
    let mut matches = BTreeSet::new();
    for node in 0..nodes.len() {
        matcher.matches_into(node, &mut scratch, &mut matches);
        for m in &matches {
            let (key, joint) = if node < m.other_node {
                (
                    (node, m.other_node),
                    Joint {
                        a_role: m.own_role,
                        b_role: m.other_role,
                    },
                )
            } else {
                (
                    (m.other_node, node),
                    Joint {
                        a_role: m.other_role,
                        b_role: m.own_role,
                    },
                )
            };
            joints.entry(key).or_default().insert(joint);
        }
    }

    let mut graph_nodes: Vec<GraphNode> = nodes
        .segments
        .iter()
        .zip(&nodes.endpoints)
        .enumerate()
        .map(|(id, (&segment, &endpoints))| GraphNode {
            id,
            segment,
            endpoints,
            incident_edges: Vec::new(),
            neighbors: Vec::new(),
        })
        .collect();

    let mut edges = Vec::with_capacity(joints.len());
    for ((a, b), set) in joints {
        let id = edges.len();
        graph_nodes[a].incident_edges.push(id);
        graph_nodes[a].neighbors.push(b);
        graph_nodes[b].incident_edges.push(id);
        graph_nodes[b].neighbors.push(a);
        edges.push(GraphEdge {
            id,
            a,
            b,
            joints: set.into_iter().collect(),
        });
    }

    for node in &mut graph_nodes {
        node.neighbors.sort_unstable();
    }

    let graph = AdjacencyGraph {
        tolerance: tolerance.get(),
        nodes: graph_nodes,
        edges,
    };
    debug!(
        nodes = graph.num_nodes(),
        edges = graph.num_edges(),
        isolated = graph.num_isolated(),
        tolerance = graph.tolerance,
        "adjacency graph built"
    );
    graph
}

#[cfg(test)]
mod tests {
    use nq_core::{Attributes, EndpointRole, GeometryError, Polyline2d, Segment, SegmentId};
    use proptest::prelude::*;

    use super::{NetworkNodes, build_graph_from_nodes, build_graph_from_segments};
    use crate::config::Tolerance;
    use crate::error::ConfigurationError;
    use crate::index::{LinearIndex, RTreeIndex};

    fn sid(v: u64) -> SegmentId {
        SegmentId::new(v).expect("non-zero id")
    }

    fn seg(id: u64, pts: Vec<[f64; 2]>) -> Segment {
        Segment::new(sid(id), Polyline2d::from(pts), Attributes::new())
    }

    fn tol(v: f64) -> Tolerance {
        Tolerance::new(v).expect("valid tolerance")
    }

    fn edge_pairs(g: &crate::AdjacencyGraph) -> Vec<(SegmentId, SegmentId)> {
        g.iter_edges()
            .map(|e| (g.segment(e.a), g.segment(e.b)))
            .collect()
    }

    #[test]
    fn y_junction_graph() {
        let segments = vec![
            seg(3, vec![[0.0, 0.0], [0.0, -1.0]]),
            seg(1, vec![[-1.0, 1.0], [0.0, 0.0]]),
            seg(2, vec![[1.0, 1.0], [0.00002, 0.00001]]),
        ];
        let built = build_graph_from_segments(&segments, tol(0.0001)).expect("valid input");
        let g = built.graph;

        assert_eq!(g.num_nodes(), 3);
        assert_eq!(g.num_edges(), 3);
        assert_eq!(g.num_isolated(), 0);
        assert_eq!(
            edge_pairs(&g),
            vec![(sid(1), sid(2)), (sid(1), sid(3)), (sid(2), sid(3))]
        );

        let e13 = g
            .edge_between(g.node_of(sid(3)).expect("node"), g.node_of(sid(1)).expect("node"))
            .expect("edge 1-3 should exist");
        assert_eq!(e13.joints.len(), 1);
        assert_eq!(e13.joints[0].a_role, EndpointRole::End);
        assert_eq!(e13.joints[0].b_role, EndpointRole::Start);

        for node in &g.nodes {
            assert_eq!(node.degree(), 2);
        }
    }

    #[test]
    fn parallel_joints_collapse_into_one_edge() {
        // Two segments forming a closed ring touch at both ends.
        let segments = vec![
            seg(1, vec![[0.0, 0.0], [1.0, 1.0], [2.0, 0.0]]),
            seg(2, vec![[2.0, 0.0], [1.0, -1.0], [0.0, 0.0]]),
        ];
        let g = build_graph_from_segments(&segments, Tolerance::ZERO)
            .expect("valid input")
            .graph;
        assert_eq!(g.num_edges(), 1);
        assert_eq!(g.edges[0].joints.len(), 2);
    }

    #[test]
    fn degenerate_segments_are_excluded_but_recorded() {
        let segments = vec![
            seg(1, vec![[0.0, 0.0], [1.0, 0.0]]),
            seg(2, vec![[1.0, 0.0]]),
            seg(3, vec![[1.0, 0.0], [2.0, 0.0]]),
        ];
        let built = build_graph_from_segments(&segments, tol(0.1)).expect("valid input");
        assert_eq!(built.graph.num_nodes(), 2);
        assert!(built.graph.node_of(sid(2)).is_none());
        assert_eq!(
            built.invalid.get(&sid(2)),
            Some(&GeometryError::TooFewPoints { count: 1 })
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let segments = vec![
            seg(5, vec![[0.0, 0.0], [1.0, 0.0]]),
            seg(5, vec![[4.0, 0.0], [5.0, 0.0]]),
        ];
        assert_eq!(
            build_graph_from_segments(&segments, tol(0.1)),
            Err(ConfigurationError::DuplicateSegment(sid(5)))
        );
    }

    #[test]
    fn zero_tolerance_breaks_on_any_perturbation() {
        let touching = vec![
            seg(1, vec![[0.25, 0.5], [1.0, 0.5]]),
            seg(2, vec![[1.0, 0.5], [2.0, 0.5]]),
        ];
        let g = build_graph_from_segments(&touching, Tolerance::ZERO)
            .expect("valid input")
            .graph;
        assert_eq!(g.num_edges(), 1);

        let nudged = vec![
            seg(1, vec![[0.25, 0.5], [1.0, 0.5]]),
            seg(2, vec![[f64::from_bits(1.0_f64.to_bits() + 1), 0.5], [2.0, 0.5]]),
        ];
        let g = build_graph_from_segments(&nudged, Tolerance::ZERO)
            .expect("valid input")
            .graph;
        assert_eq!(g.num_edges(), 0);
    }

    fn arb_segments() -> impl Strategy<Value = Vec<Segment>> {
        prop::collection::vec(
            (
                (0u8..20, 0u8..20),
                (-3i8..=3, -3i8..=3),
                (0u8..20, 0u8..20),
            ),
            1..40,
        )
        .prop_map(|raw| {
            raw.into_iter()
                .enumerate()
                .map(|(i, ((sx, sy), (jx, jy), (ex, ey)))| {
                    let start = [
                        f64::from(sx) * 0.01 + f64::from(jx) * 1e-5,
                        f64::from(sy) * 0.01 + f64::from(jy) * 1e-5,
                    ];
                    let end = [f64::from(ex) * 0.01, f64::from(ey) * 0.01];
                    seg(i as u64 + 1, vec![start, end])
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn tree_index_matches_naive_scan(segments in arb_segments(), t in 0.0f64..0.02) {
            let nodes = NetworkNodes::from_segments(&segments).expect("unique ids");
            let tree = build_graph_from_nodes::<RTreeIndex>(&nodes, tol(t));
            let naive = build_graph_from_nodes::<LinearIndex>(&nodes, tol(t));
            prop_assert_eq!(tree, naive);
        }

        #[test]
        fn graph_does_not_depend_on_input_order(
            (segments, shuffled) in arb_segments()
                .prop_flat_map(|s| (Just(s.clone()), Just(s).prop_shuffle())),
        ) {
            let a = build_graph_from_segments(&segments, tol(0.005)).expect("valid").graph;
            let b = build_graph_from_segments(&shuffled, tol(0.005)).expect("valid").graph;
            prop_assert_eq!(a, b);
        }

        #[test]
        fn edges_are_monotonic_in_tolerance(
            segments in arb_segments(),
            lo in 0.0f64..0.01,
            extra in 0.0f64..0.01,
        ) {
            let small = build_graph_from_segments(&segments, tol(lo)).expect("valid").graph;
            let large = build_graph_from_segments(&segments, tol(lo + extra)).expect("valid").graph;
            for e in small.iter_edges() {
                prop_assert!(large.edge_between(e.a, e.b).is_some());
            }
        }
    }
}

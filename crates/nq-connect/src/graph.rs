use nq_core::{EndpointRole, Point2d, SegmentId};

pub type NodeId = usize;
pub type EdgeId = usize;

/// Which endpoints of an edge's two segments lie within tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Joint {
    pub a_role: EndpointRole,
    pub b_role: EndpointRole,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub id: NodeId,
    pub segment: SegmentId,
    pub endpoints: [Point2d; 2],
    pub incident_edges: Vec<EdgeId>,
    /// Sorted ascending.
    pub neighbors: Vec<NodeId>,
}

impl GraphNode {
    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }
}

/// Undirected edge between nodes `a < b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphEdge {
    pub id: EdgeId,
    pub a: NodeId,
    pub b: NodeId,
    /// Sorted, at least one entry.
    pub joints: Vec<Joint>,
}

/// Segments linked by tolerance-based endpoint proximity.
///
/// Nodes are stored in ascending [`SegmentId`] order, so node ids and edge
/// order depend only on the segment set, geometry and tolerance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdjacencyGraph {
    pub tolerance: f64,
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl AdjacencyGraph {
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn num_isolated(&self) -> usize {
        self.nodes.iter().filter(|n| n.neighbors.is_empty()).count()
    }

    pub fn node_of(&self, segment: SegmentId) -> Option<NodeId> {
        self.nodes
            .binary_search_by_key(&segment, |n| n.segment)
            .ok()
    }

    pub fn segment(&self, node: NodeId) -> SegmentId {
        self.nodes[node].segment
    }

    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node].neighbors
    }

    pub fn edge_between(&self, a: NodeId, b: NodeId) -> Option<&GraphEdge> {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        self.nodes
            .get(lo)?
            .incident_edges
            .iter()
            .map(|&e| &self.edges[e])
            .find(|e| e.a == lo && e.b == hi)
    }

    pub fn iter_edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter()
    }
}

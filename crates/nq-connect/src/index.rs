use nq_core::{EndpointRole, Point2d};
use rstar::primitives::GeomWithData;
use rstar::{AABB, RTree};

use crate::graph::NodeId;

/// One endpoint of one graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EndpointRef {
    pub node: NodeId,
    pub role: EndpointRole,
}

/// Proximity lookup over segment endpoints.
///
/// Implementations are read-only after construction and must agree exactly
/// on which endpoints satisfy [`Point2d::within`]; they may only differ in
/// speed.
pub trait EndpointIndex {
    /// `endpoints[i]` holds the start and end of node `i`.
    fn from_endpoints(endpoints: &[[Point2d; 2]]) -> Self
    where
        Self: Sized;

    /// Appends every endpoint `q` with `p.within(q, tolerance)` to `out`, in
    /// no particular order.
    fn within(&self, p: Point2d, tolerance: f64, out: &mut Vec<EndpointRef>);
}

type IndexedEndpoint = GeomWithData<[f64; 2], EndpointRef>;

/// R*-tree over all endpoints, bulk loaded once.
#[derive(Debug)]
pub struct RTreeIndex {
    tree: RTree<IndexedEndpoint>,
}

impl EndpointIndex for RTreeIndex {
    fn from_endpoints(endpoints: &[[Point2d; 2]]) -> Self {
        let entries = endpoints
            .iter()
            .enumerate()
            .flat_map(|(node, pts)| {
                EndpointRole::BOTH
                    .into_iter()
                    .zip(pts.iter())
                    .map(move |(role, p)| GeomWithData::new(p.to_array(), EndpointRef { node, role }))
            })
            .collect();

        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    fn within(&self, p: Point2d, tolerance: f64, out: &mut Vec<EndpointRef>) {
        // The envelope is only a prefilter, so it is padded to stay a superset
        // of the exact predicate under rounding.
        let pad = tolerance * (1.0 + 1e-9) + 4.0 * f64::EPSILON * p.x.abs().max(p.y.abs());
        let envelope = AABB::from_corners([p.x - pad, p.y - pad], [p.x + pad, p.y + pad]);

        for entry in self.tree.locate_in_envelope(&envelope) {
            if p.within(Point2d::from(*entry.geom()), tolerance) {
                out.push(entry.data);
            }
        }
    }
}

/// Pairwise scan. Quadratic when used for a full graph build; it is the
/// reference the tree index is checked against.
#[derive(Debug, Clone)]
pub struct LinearIndex {
    endpoints: Vec<[Point2d; 2]>,
}

impl EndpointIndex for LinearIndex {
    fn from_endpoints(endpoints: &[[Point2d; 2]]) -> Self {
        Self {
            endpoints: endpoints.to_vec(),
        }
    }

    fn within(&self, p: Point2d, tolerance: f64, out: &mut Vec<EndpointRef>) {
        for (node, pts) in self.endpoints.iter().enumerate() {
            for (role, q) in EndpointRole::BOTH.into_iter().zip(pts.iter()) {
                if p.within(*q, tolerance) {
                    out.push(EndpointRef { node, role });
                }
            }
        }
    }
}

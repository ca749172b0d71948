use std::collections::BTreeMap;

use nq_core::{GeometryError, Segment, SegmentId};
use tracing::info;

use crate::build::{NetworkNodes, build_graph_from_nodes};
use crate::config::{ConnectivityConfig, Tolerance};
use crate::error::{ConfigurationError, ConnectivityError};
use crate::index::RTreeIndex;
use crate::outlet::OutletSet;
use crate::reach::solve;
use crate::tag::Connection;

/// Result of one connectivity run over a segment set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConnectivityReport {
    pub connections: BTreeMap<SegmentId, Connection>,
    /// Segments labelled with each outlet, outlet included.
    pub components: BTreeMap<SegmentId, usize>,
    pub graph_nodes: usize,
    pub graph_edges: usize,
}

impl ConnectivityReport {
    pub fn connection(&self, id: SegmentId) -> Option<Connection> {
        self.connections.get(&id).copied()
    }

    pub fn reached_count(&self) -> usize {
        self.connections.values().filter(|c| c.is_reached()).count()
    }

    /// Valid segments that no outlet reaches.
    pub fn unreached(&self) -> Vec<SegmentId> {
        self.connections
            .iter()
            .filter(|(_, c)| matches!(c, Connection::Unreached))
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn invalid(&self) -> Vec<(SegmentId, GeometryError)> {
        self.connections
            .iter()
            .filter_map(|(id, c)| match c {
                Connection::InvalidGeometry(err) => Some((*id, *err)),
                _ => None,
            })
            .collect()
    }
}

/// Computes connectivity without touching the segments.
///
/// Duplicate ids, unknown outlets and outlets with unusable geometry abort
/// before the graph is built. Segments with unusable geometry are reported as
/// [`Connection::InvalidGeometry`].
pub fn compute_connectivity(
    segments: &[Segment],
    outlets: &OutletSet,
    tolerance: Tolerance,
) -> Result<ConnectivityReport, ConfigurationError> {
    let nodes = NetworkNodes::from_segments(segments)?;

    for outlet in outlets.iter() {
        if let Some(&source) = nodes.invalid.get(&outlet) {
            return Err(ConfigurationError::InvalidOutlet { id: outlet, source });
        }
        if nodes.segments.binary_search(&outlet).is_err() {
            return Err(ConfigurationError::UnknownOutlet(outlet));
        }
    }

    let graph = build_graph_from_nodes::<RTreeIndex>(&nodes, tolerance);
    let reach = solve(&graph, outlets)?;

    let mut connections = BTreeMap::new();
    for (node, label) in reach.labels().iter().enumerate() {
        let connection = match label {
            Some(l) => Connection::Reached {
                outlet: l.outlet,
                hops: l.hops,
            },
            None => Connection::Unreached,
        };
        connections.insert(graph.segment(node), connection);
    }
    for (&id, &err) in &nodes.invalid {
        connections.insert(id, Connection::InvalidGeometry(err));
    }

    Ok(ConnectivityReport {
        connections,
        components: reach.component_sizes(),
        graph_nodes: graph.num_nodes(),
        graph_edges: graph.num_edges(),
    })
}

/// Computes connectivity and tags every segment in place.
///
/// Segments are only tagged once the whole computation has succeeded; on
/// error they are returned untouched.
pub fn check_connectivity(
    segments: &mut [Segment],
    outlets: &OutletSet,
    config: &ConnectivityConfig,
) -> Result<ConnectivityReport, ConnectivityError> {
    let report = compute_connectivity(segments, outlets, config.tolerance)?;

    for segment in segments.iter_mut() {
        if let Some(connection) = report.connection(segment.id) {
            config.tagger.tag(segment, &connection);
        }
    }

    info!(
        segments = report.connections.len(),
        outlets = outlets.len(),
        reached = report.reached_count(),
        unreached = report.unreached().len(),
        invalid = report.invalid().len(),
        "connectivity check finished"
    );
    Ok(report)
}

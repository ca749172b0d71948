//! Connectivity of a line network to its outlets.
//!
//! Segments become graph nodes; two nodes are joined when any endpoint of one
//! lies within a planar tolerance of any endpoint of the other. Crowd-sourced
//! geometry rarely shares exact vertices, so adjacency is proximity based
//! rather than topological.
//!
//! Pipeline:
//! - [`NetworkNodes`] splits the input into valid nodes (sorted by id) and
//!   geometry rejects.
//! - An [`EndpointIndex`] ([`RTreeIndex`], or [`LinearIndex`] as the naive
//!   reference) answers "endpoints within `d` of `p`".
//! - [`EndpointMatcher`] reports every tolerance-linked endpoint of other
//!   segments; ties are kept, not resolved.
//! - [`build_graph_from_nodes`] turns matches into an [`AdjacencyGraph`].
//! - [`solve`] runs a multi-source BFS from the [`OutletSet`]: nearest outlet
//!   wins, equal distances go to the smallest outlet id.
//! - [`Tagger`] writes the outcome into each segment's attributes; `0` marks
//!   unreached segments.
//!
//! [`check_connectivity`] runs all of it and fails before tagging anything if
//! the tolerance or outlet set is unusable.

mod build;
mod check;
mod config;
mod error;
mod graph;
mod index;
mod matcher;
mod outlet;
mod reach;
mod tag;

pub use build::{GraphBuild, NetworkNodes, build_graph_from_nodes, build_graph_from_segments};
pub use check::{ConnectivityReport, check_connectivity, compute_connectivity};
pub use config::{ConnectivityConfig, Tolerance};
pub use error::{ConfigurationError, ConnectivityError, ToleranceError};
pub use graph::{AdjacencyGraph, EdgeId, GraphEdge, GraphNode, Joint, NodeId};
pub use index::{EndpointIndex, EndpointRef, LinearIndex, RTreeIndex};
pub use matcher::{EndpointMatch, EndpointMatcher};
pub use outlet::OutletSet;
pub use reach::{Label, Reachability, solve};
pub use tag::{Connection, Tagger};

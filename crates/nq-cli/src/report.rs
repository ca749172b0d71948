use std::collections::BTreeMap;

use nq_connect::{ConnectivityReport, OutletSet};
use nq_crossing::{Crossing, CrossingSummary};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ConnectivityReportDto {
    pub sections: Vec<ConnectivitySectionDto>,
}

/// One named connectivity check; `name` is also the result attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConnectivitySectionDto {
    pub name: String,
    pub tolerance: f64,
    pub outlet_key: String,
    pub outlet_values: Vec<String>,
    pub regions: Vec<RegionConnectivityDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionConnectivityDto {
    pub region: String,
    pub segments: usize,
    pub outlets: Vec<u64>,
    pub reached: usize,
    pub unreached: Vec<u64>,
    pub invalid_geometry: Vec<InvalidGeometryDto>,
    /// Segment count per outlet, outlet included.
    pub components: BTreeMap<u64, usize>,
    pub graph_nodes: usize,
    pub graph_edges: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidGeometryDto {
    pub id: u64,
    pub error: String,
}

impl RegionConnectivityDto {
    pub fn new(region: &str, outlets: &OutletSet, report: &ConnectivityReport) -> Self {
        Self {
            region: region.to_string(),
            segments: report.connections.len(),
            outlets: outlets.iter().map(|id| id.get()).collect(),
            reached: report.reached_count(),
            unreached: report.unreached().into_iter().map(|id| id.get()).collect(),
            invalid_geometry: report
                .invalid()
                .into_iter()
                .map(|(id, err)| InvalidGeometryDto {
                    id: id.get(),
                    error: err.to_string(),
                })
                .collect(),
            components: report
                .components
                .iter()
                .map(|(id, n)| (id.get(), *n))
                .collect(),
            graph_nodes: report.graph_nodes,
            graph_edges: report.graph_edges,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CrossingsReportDto {
    pub bridge_key: String,
    pub tunnel_key: String,
    pub regions: Vec<RegionCrossingsDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionCrossingsDto {
    pub region: String,
    pub waterways: usize,
    pub roads: usize,
    pub crossings: usize,
    pub summary: CrossingSummary,
    /// Waterway ids with at least one unmarked crossing.
    pub unmarked_waterways: Vec<u64>,
}

impl RegionCrossingsDto {
    pub fn new(region: &str, waterways: usize, roads: usize, crossings: &[Crossing]) -> Self {
        let mut unmarked: Vec<u64> = crossings
            .iter()
            .filter(|c| c.flag() == 1)
            .map(|c| c.waterway.get())
            .collect();
        unmarked.dedup();

        Self {
            region: region.to_string(),
            waterways,
            roads,
            crossings: crossings.len(),
            summary: CrossingSummary::from_crossings(crossings),
            unmarked_waterways: unmarked,
        }
    }
}

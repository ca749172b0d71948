use nq_core::{AttributeFilter, Point2d, Segment, SegmentId};
use rstar::primitives::{GeomWithData, Rectangle};
use rstar::{AABB, RTree};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::intersect::{PieceIntersection, intersect_pieces};

/// Which attributes mark a crossing as engineered.
///
/// `bridge` is evaluated on the road, `tunnel` on the waterway (culverts are
/// usually tagged on the watercourse).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossingRules {
    pub bridge: AttributeFilter,
    pub tunnel: AttributeFilter,
}

impl Default for CrossingRules {
    fn default() -> Self {
        Self {
            bridge: AttributeFilter::new("bridge", ["yes"]),
            tunnel: AttributeFilter::new("tunnel", ["yes", "culvert"]),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Structure {
    None,
    Bridge,
    Tunnel,
    BridgeAndTunnel,
}

impl Structure {
    fn from_flags(bridge: bool, tunnel: bool) -> Self {
        match (bridge, tunnel) {
            (true, true) => Self::BridgeAndTunnel,
            (true, false) => Self::Bridge,
            (false, true) => Self::Tunnel,
            (false, false) => Self::None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "",
            Self::Bridge => "bridge",
            Self::Tunnel => "tunnel",
            Self::BridgeAndTunnel => "bridge and tunnel",
        }
    }

    pub fn has_bridge(self) -> bool {
        matches!(self, Self::Bridge | Self::BridgeAndTunnel)
    }

    pub fn has_tunnel(self) -> bool {
        matches!(self, Self::Tunnel | Self::BridgeAndTunnel)
    }
}

/// A point where a road meets a waterway.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Crossing {
    pub road: SegmentId,
    pub waterway: SegmentId,
    pub point: Point2d,
    pub structure: Structure,
}

impl Crossing {
    /// `0` when a bridge or tunnel is recorded, `1` when the crossing is unmarked.
    pub fn flag(&self) -> u8 {
        u8::from(self.structure == Structure::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CrossingSummary {
    pub correct: usize,
    pub no_info: usize,
    pub bridges: usize,
    pub tunnels: usize,
}

impl CrossingSummary {
    pub fn from_crossings(crossings: &[Crossing]) -> Self {
        let mut s = Self::default();
        for c in crossings {
            if c.flag() == 0 {
                s.correct += 1;
            } else {
                s.no_info += 1;
            }
            s.bridges += usize::from(c.structure.has_bridge());
            s.tunnels += usize::from(c.structure.has_tunnel());
        }
        s
    }
}

type IndexedPiece = GeomWithData<Rectangle<[f64; 2]>, (usize, usize)>;

/// Finds every point where a road polyline meets a waterway polyline.
///
/// Each distinct point is reported once per (road, waterway) pair; collinear
/// overlaps contribute both overlap ends. Segments whose geometry fails
/// [`Segment::validate`] are skipped. Output is sorted by waterway, road, then
/// coordinates.
pub fn find_crossings(
    roads: &[Segment],
    waterways: &[Segment],
    rules: &CrossingRules,
) -> Vec<Crossing> {
    let usable = |s: &&Segment| match s.validate() {
        Ok(()) => true,
        Err(err) => {
            warn!(segment = %s.id, error = %err, "segment skipped in crossings check");
            false
        }
    };
    let roads: Vec<&Segment> = roads.iter().filter(usable).collect();
    let waterways: Vec<&Segment> = waterways.iter().filter(usable).collect();

    let pieces: Vec<IndexedPiece> = roads
        .iter()
        .enumerate()
        .flat_map(|(ri, road)| {
            road.geometry()
                .pieces()
                .enumerate()
                .map(move |(pi, (a, b))| {
                    GeomWithData::new(Rectangle::from_corners(a.to_array(), b.to_array()), (ri, pi))
                })
        })
        .collect();
    let tree = RTree::bulk_load(pieces);

    let mut out = Vec::new();
    let mut hits: Vec<(usize, Point2d)> = Vec::new();
    for waterway in &waterways {
        hits.clear();
        let tunnel = rules.tunnel.matches_segment(waterway);

        for (w0, w1) in waterway.geometry().pieces() {
            let envelope = AABB::from_corners(w0.to_array(), w1.to_array());
            for entry in tree.locate_in_envelope_intersecting(&envelope) {
                let (ri, pi) = entry.data;
                let pts = &roads[ri].geometry().points;
                match intersect_pieces(w0, w1, pts[pi], pts[pi + 1]) {
                    PieceIntersection::None => {}
                    PieceIntersection::Point(p) => hits.push((ri, p)),
                    PieceIntersection::Overlap(a, b) => {
                        hits.push((ri, a));
                        hits.push((ri, b));
                    }
                }
            }
        }

        hits.sort_by(|a, b| {
            a.0.cmp(&b.0)
                .then(a.1.x.total_cmp(&b.1.x))
                .then(a.1.y.total_cmp(&b.1.y))
        });
        hits.dedup_by(|a, b| a.0 == b.0 && a.1 == b.1);

        for &(ri, point) in &hits {
            let road = roads[ri];
            let bridge = rules.bridge.matches_segment(road);
            out.push(Crossing {
                road: road.id,
                waterway: waterway.id,
                point,
                structure: Structure::from_flags(bridge, tunnel),
            });
        }
    }

    out.sort_by(|a, b| {
        a.waterway
            .cmp(&b.waterway)
            .then(a.road.cmp(&b.road))
            .then(a.point.x.total_cmp(&b.point.x))
            .then(a.point.y.total_cmp(&b.point.y))
    });
    debug!(
        roads = roads.len(),
        waterways = waterways.len(),
        crossings = out.len(),
        "crossings located"
    );
    out
}

#[cfg(test)]
mod tests {
    use nq_core::{Attributes, Point2d, Polyline2d, Segment, SegmentId};
    use serde_json::json;

    use super::{CrossingRules, CrossingSummary, Structure, find_crossings};

    fn seg(id: u64, pts: Vec<[f64; 2]>, tags: &[(&str, &str)]) -> Segment {
        let attrs: Attributes = tags
            .iter()
            .map(|(k, v)| ((*k).to_string(), json!(v)))
            .collect();
        Segment::new(
            SegmentId::new(id).expect("non-zero id"),
            Polyline2d::from(pts),
            attrs,
        )
    }

    #[test]
    fn classifies_bridges_tunnels_and_unmarked_crossings() {
        let waterways = vec![
            seg(1, vec![[0.0, 0.0], [10.0, 0.0]], &[("waterway", "canal")]),
            seg(2, vec![[0.0, 5.0], [10.0, 5.0]], &[("waterway", "ditch"), ("tunnel", "culvert")]),
        ];
        let roads = vec![
            seg(10, vec![[2.0, -1.0], [2.0, 6.0]], &[("highway", "primary"), ("bridge", "yes")]),
            seg(11, vec![[8.0, -1.0], [8.0, 1.0]], &[("highway", "track")]),
        ];

        let crossings = find_crossings(&roads, &waterways, &CrossingRules::default());
        let summary: Vec<_> = crossings
            .iter()
            .map(|c| (c.waterway.get(), c.road.get(), c.structure, c.flag()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (1, 10, Structure::Bridge, 0),
                (1, 11, Structure::None, 1),
                (2, 10, Structure::BridgeAndTunnel, 0),
            ]
        );
        assert_eq!(crossings[1].point, Point2d::new(8.0, 0.0));

        let totals = CrossingSummary::from_crossings(&crossings);
        assert_eq!(
            totals,
            CrossingSummary {
                correct: 2,
                no_info: 1,
                bridges: 2,
                tunnels: 1
            }
        );
    }

    #[test]
    fn shared_vertex_is_reported_once() {
        // The road crosses exactly at the vertex between two waterway pieces.
        let waterways = vec![seg(1, vec![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]], &[])];
        let roads = vec![seg(5, vec![[1.0, -1.0], [1.0, 1.0]], &[])];

        let crossings = find_crossings(&roads, &waterways, &CrossingRules::default());
        assert_eq!(crossings.len(), 1);
        assert_eq!(crossings[0].point, Point2d::new(1.0, 0.0));
    }

    #[test]
    fn invalid_geometry_is_skipped() {
        let waterways = vec![seg(1, vec![[0.0, 0.0]], &[])];
        let roads = vec![seg(5, vec![[0.0, -1.0], [0.0, 1.0]], &[])];
        assert!(find_crossings(&roads, &waterways, &CrossingRules::default()).is_empty());
    }
}

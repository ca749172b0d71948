use std::collections::BTreeMap;

use nq_core::SegmentId;

use crate::error::ConfigurationError;
use crate::graph::{AdjacencyGraph, NodeId};
use crate::outlet::OutletSet;

/// The outlet a node drains to and its distance in graph edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Label {
    pub outlet: SegmentId,
    pub hops: u32,
}

/// Per-node labels from one traversal, indexed by [`NodeId`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reachability {
    labels: Vec<Option<Label>>,
}

impl Reachability {
    pub fn label(&self, node: NodeId) -> Option<Label> {
        self.labels[node]
    }

    pub fn labels(&self) -> &[Option<Label>] {
        &self.labels
    }

    pub fn reached_count(&self) -> usize {
        self.labels.iter().flatten().count()
    }

    /// Number of nodes labelled with each outlet, the outlet itself included.
    pub fn component_sizes(&self) -> BTreeMap<SegmentId, usize> {
        let mut sizes = BTreeMap::new();
        for label in self.labels.iter().flatten() {
            *sizes.entry(label.outlet).or_insert(0) += 1;
        }
        sizes
    }
}

/// Multi-source breadth-first traversal seeded from every outlet at once.
///
/// A node is labelled with the outlet at the fewest edges; among outlets at
/// the same distance the smallest id wins. Outlets label themselves with
/// `hops == 0`. Runs in `O(nodes + edges)`.
pub fn solve(graph: &AdjacencyGraph, outlets: &OutletSet) -> Result<Reachability, ConfigurationError> {
    let mut labels: Vec<Option<Label>> = vec![None; graph.num_nodes()];
    let mut frontier = Vec::with_capacity(outlets.len());

    for outlet in outlets.iter() {
        let node = graph
            .node_of(outlet)
            .ok_or(ConfigurationError::UnknownOutlet(outlet))?;
        labels[node] = Some(Label { outlet, hops: 0 });
        frontier.push(node);
    }

    // Every node of layer `hops - 1` is final before layer `hops` is filled,
    // so taking the minimum over parents yields the smallest outlet among
    // those at the shortest distance, whatever the visiting order.
    let mut next = Vec::new();
    let mut hops = 0_u32;
    while !frontier.is_empty() {
        hops += 1;
        for &u in &frontier {
            let Some(parent) = labels[u] else {
                continue;
            };
            for &v in graph.neighbors(u) {
                let candidate = Label {
                    outlet: parent.outlet,
                    hops,
                };
                match labels[v] {
                    None => {
                        labels[v] = Some(candidate);
                        next.push(v);
                    }
                    Some(existing) if existing.hops == hops && candidate.outlet < existing.outlet => {
                        labels[v] = Some(candidate);
                    }
                    Some(_) => {}
                }
            }
        }
        frontier.clear();
        std::mem::swap(&mut frontier, &mut next);
    }

    Ok(Reachability { labels })
}

#[cfg(test)]
mod tests {
    use nq_core::{Attributes, Polyline2d, Segment, SegmentId};

    use super::{Label, solve};
    use crate::build::build_graph_from_segments;
    use crate::config::Tolerance;
    use crate::error::ConfigurationError;
    use crate::graph::AdjacencyGraph;
    use crate::outlet::OutletSet;

    fn sid(v: u64) -> SegmentId {
        SegmentId::new(v).expect("non-zero id")
    }

    /// Chain of unit segments along y = `row`, touching end to start.
    fn chain(ids: &[u64], row: f64, x0: f64) -> Vec<Segment> {
        ids.iter()
            .enumerate()
            .map(|(i, &id)| {
                let x = x0 + i as f64;
                Segment::new(
                    sid(id),
                    Polyline2d::from(vec![[x, row], [x + 1.0, row]]),
                    Attributes::new(),
                )
            })
            .collect()
    }

    fn graph(segments: &[Segment]) -> AdjacencyGraph {
        build_graph_from_segments(segments, Tolerance::ZERO)
            .expect("valid input")
            .graph
    }

    fn label_of(g: &AdjacencyGraph, r: &super::Reachability, id: u64) -> Option<Label> {
        r.label(g.node_of(sid(id)).expect("node exists"))
    }

    #[test]
    fn shortest_path_outlet_wins() {
        // A=1 .. S=50 takes 2 hops; S .. B=2 takes 3 hops.
        let segments = chain(&[1, 10, 50, 20, 21, 2], 0.0, 0.0);
        let g = graph(&segments);
        let r = solve(&g, &OutletSet::new([sid(1), sid(2)])).expect("outlets exist");

        assert_eq!(label_of(&g, &r, 50), Some(Label { outlet: sid(1), hops: 2 }));
        assert_eq!(label_of(&g, &r, 20), Some(Label { outlet: sid(2), hops: 2 }));
    }

    #[test]
    fn equal_distance_picks_smallest_outlet() {
        // S=50 sits two hops from both outlet 9 and outlet 4.
        let segments = chain(&[9, 11, 50, 12, 4], 0.0, 0.0);
        let g = graph(&segments);
        let r = solve(&g, &OutletSet::new([sid(9), sid(4)])).expect("outlets exist");
        assert_eq!(label_of(&g, &r, 50), Some(Label { outlet: sid(4), hops: 2 }));
        assert_eq!(label_of(&g, &r, 11), Some(Label { outlet: sid(9), hops: 1 }));
    }

    #[test]
    fn tie_break_propagates_through_merging_branches() {
        // Two branches from outlets 7 and 3 merge at junction node 40 and
        // continue downstream through 41.
        let mut segments = vec![
            Segment::new(sid(7), Polyline2d::from(vec![[-1.0, 1.0], [-0.5, 0.5]]), Attributes::new()),
            Segment::new(sid(8), Polyline2d::from(vec![[-0.5, 0.5], [0.0, 0.0]]), Attributes::new()),
            Segment::new(sid(3), Polyline2d::from(vec![[-1.0, -1.0], [-0.5, -0.5]]), Attributes::new()),
            Segment::new(sid(5), Polyline2d::from(vec![[-0.5, -0.5], [0.0, 0.0]]), Attributes::new()),
        ];
        segments.extend(chain(&[40, 41], 0.0, 0.0));
        let g = graph(&segments);
        let r = solve(&g, &OutletSet::new([sid(7), sid(3)])).expect("outlets exist");

        assert_eq!(label_of(&g, &r, 40), Some(Label { outlet: sid(3), hops: 2 }));
        assert_eq!(label_of(&g, &r, 41), Some(Label { outlet: sid(3), hops: 3 }));
        assert_eq!(r.component_sizes().get(&sid(7)), Some(&2));
        assert_eq!(r.component_sizes().get(&sid(3)), Some(&4));
    }

    #[test]
    fn outlets_label_themselves_even_when_adjacent() {
        let segments = chain(&[5, 6], 0.0, 0.0);
        let g = graph(&segments);
        let r = solve(&g, &OutletSet::new([sid(5), sid(6)])).expect("outlets exist");
        assert_eq!(label_of(&g, &r, 5), Some(Label { outlet: sid(5), hops: 0 }));
        assert_eq!(label_of(&g, &r, 6), Some(Label { outlet: sid(6), hops: 0 }));
    }

    #[test]
    fn isolated_and_disconnected_nodes_are_unreached() {
        let mut segments = chain(&[1, 2], 0.0, 0.0);
        segments.extend(chain(&[30, 31], 5.0, 0.0));
        segments.extend(chain(&[99], 10.0, 0.0));
        let g = graph(&segments);
        let r = solve(&g, &OutletSet::new([sid(1)])).expect("outlet exists");

        assert_eq!(r.reached_count(), 2);
        assert_eq!(label_of(&g, &r, 30), None);
        assert_eq!(label_of(&g, &r, 99), None);
    }

    #[test]
    fn unknown_outlet_is_an_error() {
        let g = graph(&chain(&[1, 2], 0.0, 0.0));
        assert_eq!(
            solve(&g, &OutletSet::new([sid(1), sid(77)])),
            Err(ConfigurationError::UnknownOutlet(sid(77)))
        );
    }

    #[test]
    fn empty_outlet_set_reaches_nothing() {
        let g = graph(&chain(&[1, 2, 3], 0.0, 0.0));
        let r = solve(&g, &OutletSet::default()).expect("no outlets to resolve");
        assert_eq!(r.reached_count(), 0);
    }
}

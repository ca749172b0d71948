use criterion::{Criterion, black_box, criterion_group, criterion_main};
use nq_connect::{
    LinearIndex, NetworkNodes, OutletSet, RTreeIndex, Tolerance, build_graph_from_nodes,
    compute_connectivity,
};
use nq_core::{Attributes, Polyline2d, Segment, SegmentId};

/// Grid of short ditches with jittered endpoints, roughly a neighbourhood survey.
fn synthetic_network(cols: usize, rows: usize) -> Vec<Segment> {
    let step = 0.001;
    let mut out = Vec::with_capacity(cols * rows * 2);
    let mut id = 1_u64;

    for r in 0..rows {
        for c in 0..cols {
            let x = c as f64 * step;
            let y = r as f64 * step;
            let jitter = ((c * 7 + r * 13) % 5) as f64 * 1e-5;

            for end in [[x + step, y + jitter], [x + jitter, y + step]] {
                out.push(Segment::new(
                    SegmentId::new(id).expect("ids start at 1"),
                    Polyline2d::from(vec![[x, y], end]),
                    Attributes::new(),
                ));
                id += 1;
            }
        }
    }

    out
}

fn bench_build_graph(c: &mut Criterion) {
    let segments = synthetic_network(40, 40);
    let nodes = NetworkNodes::from_segments(&segments).expect("unique ids");
    let tol = Tolerance::new(1e-4).expect("valid tolerance");

    c.bench_function("nq_connect_build_graph_rtree_3k", |b| {
        b.iter(|| {
            let g = build_graph_from_nodes::<RTreeIndex>(black_box(&nodes), tol);
            black_box((g.num_nodes(), g.num_edges()));
        });
    });

    c.bench_function("nq_connect_build_graph_linear_3k", |b| {
        b.iter(|| {
            let g = build_graph_from_nodes::<LinearIndex>(black_box(&nodes), tol);
            black_box((g.num_nodes(), g.num_edges()));
        });
    });

    let outlets = OutletSet::new(SegmentId::new(1));
    c.bench_function("nq_connect_compute_connectivity_3k", |b| {
        b.iter(|| {
            let report = compute_connectivity(black_box(&segments), &outlets, tol)
                .expect("outlet exists");
            black_box(report.reached_count());
        });
    });
}

criterion_group!(benches, bench_build_graph);
criterion_main!(benches);

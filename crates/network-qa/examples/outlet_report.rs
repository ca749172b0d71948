//! Example: connectivity summary for a single GeoJSON line layer.
//!
//! Reads the layer, selects outlets by attribute and prints, per outlet, how
//! many segments drain to it, followed by the unreached segment ids.
//! Nothing is written to disk; see the `nq` binary for the full workflow.
//!
//! Run from the workspace root:
//!   cargo run -p network-qa --example outlet_report -- --help

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use network_qa::geojson::{ReadOptions, read_line_layer};
use network_qa::{AttributeFilter, OutletSet, Tolerance, compute_connectivity};

#[derive(Parser, Debug)]
#[command(about = "Summarise waterway connectivity of a GeoJSON line layer")]
struct Args {
    /// Line layer (FeatureCollection of LineStrings)
    #[arg(long)]
    input: PathBuf,

    /// Attribute marking outlets
    #[arg(long, default_value = "outlet")]
    outlet_key: String,

    /// Accepted outlet values; any non-empty value when omitted
    #[arg(long)]
    outlet_value: Vec<String>,

    /// Endpoint snapping distance in layer units
    #[arg(long, default_value_t = 1e-4)]
    tolerance: f64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let tolerance = Tolerance::new(args.tolerance).context("invalid --tolerance")?;

    let layer = read_line_layer(&args.input, &ReadOptions::default())
        .with_context(|| format!("reading {}", args.input.display()))?;
    let filter = AttributeFilter::new(args.outlet_key, args.outlet_value);
    let outlets = OutletSet::select(&layer.segments, &filter);
    if outlets.is_empty() {
        bail!("no segment matches {}={:?}", filter.key, filter.values);
    }

    let t0 = Instant::now();
    let report = compute_connectivity(&layer.segments, &outlets, tolerance)?;
    let elapsed = t0.elapsed();

    println!(
        "{} segments, {} graph edges, {} outlets ({:.1} ms)",
        report.connections.len(),
        report.graph_edges,
        outlets.len(),
        elapsed.as_secs_f64() * 1e3
    );
    for (outlet, size) in &report.components {
        println!("  outlet {outlet}: {size} segments");
    }

    let unreached: Vec<String> = report.unreached().iter().map(|id| id.to_string()).collect();
    println!("unreached: [{}]", unreached.join(", "));
    for (id, err) in report.invalid() {
        println!("invalid geometry {id}: {err}");
    }
    Ok(())
}

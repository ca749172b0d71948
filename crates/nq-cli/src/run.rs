use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use nq_connect::{OutletSet, compute_connectivity};
use nq_core::{Attributes, Segment};
use nq_crossing::find_crossings;
use nq_geojson::{
    ReadOptions, crossings_to_geojson, read_line_layer, segments_to_geojson, write_geojson,
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::info;

use crate::config::QaConfig;
use crate::region::{REGION_KEY, Region};
use crate::report::{
    ConnectivityReportDto, ConnectivitySectionDto, CrossingsReportDto, RegionConnectivityDto,
    RegionCrossingsDto,
};

/// Output directory layout: `gis_files/` for layers, `report_files/` for JSON reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    pub dir: PathBuf,
    pub prefix: String,
}

impl Destination {
    pub fn gis_file(&self, name: &str) -> PathBuf {
        self.dir
            .join("gis_files")
            .join(format!("{}_{name}.geojson", self.prefix))
    }

    pub fn report_file(&self, name: &str) -> PathBuf {
        self.dir
            .join("report_files")
            .join(format!("{}_{name}_report.json", self.prefix))
    }

    fn prepare(&self) -> Result<()> {
        for sub in ["gis_files", "report_files"] {
            let dir = self.dir.join(sub);
            fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
        }
        Ok(())
    }
}

/// Runs every `[connectivity.<name>]` check in every region.
///
/// Each check sees the untagged region segments and writes its outcome under
/// its own name. All checks and regions are computed before anything is
/// written, so a failure leaves no output files behind.
pub fn run_connectivity(cfg: &QaConfig, dest: &Destination) -> Result<ConnectivityReportDto> {
    if cfg.connectivity.is_empty() {
        bail!("config has no [connectivity.<name>] section");
    }
    let mut checks = Vec::with_capacity(cfg.connectivity.len());
    for (name, section) in &cfg.connectivity {
        checks.push((section.outlet_filter(), section.engine_config(name)?));
    }
    let network = load_layer(&cfg.input.path, "waterway", cfg)?;

    let mut report = ConnectivityReportDto::default();
    for (name, (filter, engine)) in cfg.connectivity.keys().zip(&checks) {
        report.sections.push(ConnectivitySectionDto {
            name: name.clone(),
            tolerance: engine.tolerance.get(),
            outlet_key: filter.key.clone(),
            outlet_values: filter.values.clone(),
            regions: Vec::new(),
        });
    }

    let mut tagged = Vec::new();
    for region in Region::from_config(&cfg.regions) {
        let base = region.select(&network);
        let mut segments = base.clone();

        for ((filter, engine), section) in checks.iter().zip(&mut report.sections) {
            let outlets = OutletSet::select(&base, filter);
            if outlets.is_empty() {
                bail!(
                    "connectivity.{}: no outlets match {}={:?} in region {}",
                    section.name,
                    filter.key,
                    filter.values,
                    region.name
                );
            }

            let result = compute_connectivity(&base, &outlets, engine.tolerance).with_context(|| {
                format!("connectivity.{} failed in region {}", section.name, region.name)
            })?;
            for segment in &mut segments {
                if let Some(connection) = result.connection(segment.id) {
                    engine.tagger.tag(segment, &connection);
                }
            }
            info!(
                check = %section.name,
                region = %region.name,
                outlets = outlets.len(),
                reached = result.reached_count(),
                unreached = result.unreached().len(),
                invalid = result.invalid().len(),
                "connectivity checked"
            );
            section
                .regions
                .push(RegionConnectivityDto::new(&region.name, &outlets, &result));
        }
        tagged.extend(segments);
    }

    dest.prepare()?;
    write_layer(
        &dest.gis_file("connectivity"),
        &segments_to_geojson(&tagged, None),
    )?;
    write_json(&dest.report_file("connectivity"), &report)?;
    Ok(report)
}

/// Finds road/waterway crossings in every region.
pub fn run_crossings(cfg: &QaConfig, dest: &Destination) -> Result<CrossingsReportDto> {
    let roads_path = cfg
        .input
        .roads
        .as_deref()
        .context("crossings check needs input.roads")?;
    let rules = cfg
        .crossings
        .as_ref()
        .map(|c| c.rules())
        .unwrap_or_default();
    let road_filter = cfg.crossings.as_ref().and_then(|c| c.roads.as_ref());

    let waterways = load_layer(&cfg.input.path, "waterway", cfg)?;
    let mut roads = load_layer(roads_path, "road", cfg)?;
    if let Some(filter) = road_filter {
        roads.retain(|s| filter.matches_segment(s));
    }

    let mut points = Vec::new();
    let mut water_out = Vec::new();
    let mut roads_out = Vec::new();
    let mut regions = Vec::new();
    for region in Region::from_config(&cfg.regions) {
        let w = region.select(&waterways);
        let r = region.select(&roads);
        let crossings = find_crossings(&r, &w, &rules);
        info!(region = %region.name, waterways = w.len(), roads = r.len(), crossings = crossings.len(), "crossings found");

        regions.push(RegionCrossingsDto::new(&region.name, w.len(), r.len(), &crossings));
        let mut extra = Attributes::new();
        extra.insert(REGION_KEY.to_string(), json!(region.name));
        points.push(crossings_to_geojson(&crossings, &extra));
        water_out.extend(w);
        roads_out.extend(r);
    }

    let id_key = cfg.input.id_key.as_str();
    let water_keys = [id_key, rules.tunnel.key.as_str(), REGION_KEY];
    let road_keys = [id_key, rules.bridge.key.as_str(), REGION_KEY];
    let report = CrossingsReportDto {
        bridge_key: rules.bridge.key.clone(),
        tunnel_key: rules.tunnel.key.clone(),
        regions,
    };

    dest.prepare()?;
    write_layer(&dest.gis_file("crossings"), &merge_collections(points))?;
    write_layer(
        &dest.gis_file("geo_water"),
        &segments_to_geojson(&water_out, Some(&water_keys[..])),
    )?;
    write_layer(
        &dest.gis_file("geo_roads"),
        &segments_to_geojson(&roads_out, Some(&road_keys[..])),
    )?;
    write_json(&dest.report_file("crossings"), &report)?;
    Ok(report)
}

/// Reads a line layer and applies the network `[filter]` to waterways.
fn load_layer(path: &Path, what: &str, cfg: &QaConfig) -> Result<Vec<Segment>> {
    ensure_file_exists(path, what)?;
    let opts = ReadOptions {
        id_key: cfg.input.id_key.clone(),
    };
    let layer = read_line_layer(path, &opts)
        .with_context(|| format!("reading {what} layer {}", path.display()))?;
    info!(path = %path.display(), lines = layer.segments.len(), skipped = layer.skipped, "read {what} layer");

    let mut segments = layer.segments;
    if what == "waterway"
        && let Some(filter) = &cfg.filter
    {
        segments.retain(|s| filter.matches_segment(s));
        info!(kept = segments.len(), key = %filter.key, "waterway filter applied");
    }
    Ok(segments)
}

fn merge_collections(collections: Vec<Value>) -> Value {
    let features: Vec<Value> = collections
        .into_iter()
        .filter_map(|mut fc| match fc.get_mut("features").map(Value::take) {
            Some(Value::Array(f)) => Some(f),
            _ => None,
        })
        .flatten()
        .collect();
    json!({"type": "FeatureCollection", "features": features})
}

fn write_layer(path: &Path, collection: &Value) -> Result<()> {
    write_geojson(path, collection).with_context(|| format!("writing {}", path.display()))?;
    info!(path = %path.display(), "layer written");
    Ok(())
}

fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{what} file does not exist: {}", path.display());
    }
    if !path.is_file() {
        bail!("{what} path is not a file: {}", path.display());
    }
    Ok(())
}

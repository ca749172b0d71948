use std::fs;
use std::path::Path;

use nq_core::{Attributes, Point2d, Polyline2d, Segment, SegmentId};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::GeoJsonError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadOptions {
    /// Property holding the numeric segment id; the feature `id` is the fallback.
    pub id_key: String,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            id_key: "osm_id".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LineLayer {
    pub segments: Vec<Segment>,
    /// Features whose geometry is of another type than `LineString`.
    pub skipped: usize,
}

#[derive(Debug, Deserialize)]
struct FeatureCollectionDto {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    features: Vec<FeatureDto>,
}

#[derive(Debug, Deserialize)]
struct FeatureDto {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    geometry: Option<GeometryDto>,
    #[serde(default)]
    properties: Option<Attributes>,
}

#[derive(Debug, Deserialize)]
struct GeometryDto {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

pub fn read_line_layer(path: &Path, opts: &ReadOptions) -> Result<LineLayer, GeoJsonError> {
    let data = fs::read(path).map_err(|source| GeoJsonError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_line_layer(&data, opts)
}

/// Turns `LineString` features into segments.
///
/// Line strings with fewer than two positions, and features with a missing or
/// `null` geometry, are kept (the latter with no coordinates); rejecting them
/// is the connectivity check's job, which reports rather than drops them.
/// Only other geometry types are skipped.
pub fn parse_line_layer(data: &[u8], opts: &ReadOptions) -> Result<LineLayer, GeoJsonError> {
    let collection: FeatureCollectionDto = serde_json::from_slice(data)?;
    if collection.kind != "FeatureCollection" {
        return Err(GeoJsonError::NotFeatureCollection(collection.kind));
    }

    let mut layer = LineLayer::default();
    for (index, feature) in collection.features.into_iter().enumerate() {
        let coordinates = match feature.geometry {
            Some(g) if g.kind == "LineString" => Some(g.coordinates),
            Some(_) => {
                layer.skipped += 1;
                continue;
            }
            None => None,
        };

        let attributes = feature.properties.unwrap_or_default();
        let id = feature_id(index, &attributes, feature.id.as_ref(), &opts.id_key)?;
        let points = match coordinates {
            Some(c) => parse_positions(index, c)?,
            None => {
                warn!(segment = %id, "feature without geometry kept as an empty line");
                Vec::new()
            }
        };

        layer
            .segments
            .push(Segment::new(id, Polyline2d::new(points), attributes));
    }

    if layer.skipped > 0 {
        warn!(skipped = layer.skipped, "non-LineString features ignored");
    }
    Ok(layer)
}

fn feature_id(
    index: usize,
    attributes: &Attributes,
    fallback: Option<&Value>,
    key: &str,
) -> Result<SegmentId, GeoJsonError> {
    let raw = attributes
        .get(key)
        .and_then(id_number)
        .or_else(|| fallback.and_then(id_number))
        .ok_or_else(|| GeoJsonError::MissingId {
            index,
            key: key.to_string(),
        })?;
    SegmentId::new(raw).ok_or(GeoJsonError::ReservedId { index })
}

fn id_number(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_positions(index: usize, coordinates: Value) -> Result<Vec<Point2d>, GeoJsonError> {
    let positions: Vec<Vec<f64>> = serde_json::from_value(coordinates)
        .map_err(|_| GeoJsonError::InvalidCoordinates { index })?;

    positions
        .into_iter()
        .map(|pos| match pos.as_slice() {
            [x, y, ..] => Ok(Point2d::new(*x, *y)),
            _ => Err(GeoJsonError::InvalidCoordinates { index }),
        })
        .collect()
}

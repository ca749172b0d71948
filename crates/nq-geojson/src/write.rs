use std::fs;
use std::path::Path;

use nq_core::{Attributes, Segment};
use nq_crossing::Crossing;
use serde_json::{Map, Value, json};

use crate::error::GeoJsonError;

/// Line features with the segment attributes as properties.
///
/// With `keep = Some(keys)` only those properties are written (missing keys
/// become `null`).
pub fn segments_to_geojson(segments: &[Segment], keep: Option<&[&str]>) -> Value {
    let features: Vec<Value> = segments
        .iter()
        .map(|s| {
            let properties = match keep {
                Some(keys) => project(&s.attributes, keys),
                None => s.attributes.clone().into_iter().collect(),
            };
            let coordinates: Vec<[f64; 2]> =
                s.geometry().points.iter().map(|p| p.to_array()).collect();
            json!({
                "type": "Feature",
                "id": s.id.get(),
                "properties": properties,
                "geometry": {"type": "LineString", "coordinates": coordinates},
            })
        })
        .collect();

    feature_collection(features)
}

/// Point features, one per crossing, each carrying `extra` as well.
///
/// Road and waterway ids go to `osm_id_highway` and `osm_id_waterway`.
pub fn crossings_to_geojson(crossings: &[Crossing], extra: &Attributes) -> Value {
    let features: Vec<Value> = crossings
        .iter()
        .map(|c| {
            let mut properties: Map<String, Value> = extra.clone().into_iter().collect();
            properties.insert("osm_id_highway".to_string(), json!(c.road.get()));
            properties.insert("osm_id_waterway".to_string(), json!(c.waterway.get()));
            properties.insert("flag".to_string(), json!(c.flag()));
            properties.insert("structure".to_string(), json!(c.structure.as_str()));
            json!({
                "type": "Feature",
                "properties": properties,
                "geometry": {"type": "Point", "coordinates": c.point.to_array()},
            })
        })
        .collect();

    feature_collection(features)
}

pub fn write_geojson(path: &Path, collection: &Value) -> Result<(), GeoJsonError> {
    let bytes = serde_json::to_vec_pretty(collection)?;
    fs::write(path, bytes).map_err(|source| GeoJsonError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn project(attributes: &Attributes, keys: &[&str]) -> Map<String, Value> {
    keys.iter()
        .map(|k| {
            let v = attributes.get(*k).cloned().unwrap_or(Value::Null);
            ((*k).to_string(), v)
        })
        .collect()
}

fn feature_collection(features: Vec<Value>) -> Value {
    json!({"type": "FeatureCollection", "features": features})
}

#[cfg(test)]
mod tests {
    use nq_core::{Attributes, Point2d, Polyline2d, Segment, SegmentId};
    use nq_crossing::{Crossing, Structure};
    use serde_json::json;

    use super::{crossings_to_geojson, segments_to_geojson, write_geojson};
    use crate::read::{ReadOptions, read_line_layer};

    fn sid(v: u64) -> SegmentId {
        SegmentId::new(v).expect("non-zero id")
    }

    fn segment() -> Segment {
        let mut attrs = Attributes::new();
        attrs.insert("osm_id".to_string(), json!("31"));
        attrs.insert("tunnel".to_string(), json!("culvert"));
        attrs.insert("connected".to_string(), json!(9));
        Segment::new(sid(31), Polyline2d::from(vec![[4.5, 52.0], [4.6, 52.1]]), attrs)
    }

    #[test]
    fn tagged_segments_survive_a_file_round_trip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("out.geojson");
        write_geojson(&path, &segments_to_geojson(&[segment()], None)).expect("write");

        let layer = read_line_layer(&path, &ReadOptions::default()).expect("read back");
        assert_eq!(layer.segments, vec![segment()]);
    }

    #[test]
    fn projection_keeps_only_requested_keys() {
        let fc = segments_to_geojson(&[segment()], Some(&["osm_id", "bridge"][..]));
        assert_eq!(
            fc["features"][0]["properties"],
            json!({"osm_id": "31", "bridge": null})
        );
    }

    #[test]
    fn crossing_points_carry_flag_and_structure() {
        let mut extra = Attributes::new();
        extra.insert("region".to_string(), json!("north"));
        let crossings = [Crossing {
            road: sid(2),
            waterway: sid(1),
            point: Point2d::new(4.5, 52.05),
            structure: Structure::None,
        }];

        let fc = crossings_to_geojson(&crossings, &extra);
        let f = &fc["features"][0];
        assert_eq!(f["geometry"]["coordinates"], json!([4.5, 52.05]));
        assert_eq!(
            f["properties"],
            json!({"region": "north", "osm_id_highway": 2, "osm_id_waterway": 1, "flag": 1, "structure": ""})
        );
    }
}

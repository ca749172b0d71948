//! GeoJSON boundary of the quality checks.
//!
//! Reading accepts a `FeatureCollection` and keeps only `LineString`
//! features; writing emits line features for (tagged) segments and point
//! features for crossings. Coordinates pass through unprojected.

mod error;
mod read;
mod write;

pub use error::GeoJsonError;
pub use read::{LineLayer, ReadOptions, parse_line_layer, read_line_layer};
pub use write::{crossings_to_geojson, segments_to_geojson, write_geojson};

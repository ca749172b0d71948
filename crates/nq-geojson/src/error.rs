use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoJsonError {
    #[error("i/o on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("malformed GeoJSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a FeatureCollection, found {0:?}")]
    NotFeatureCollection(String),
    #[error("feature {index} has no usable identifier in property `{key}` or feature id")]
    MissingId { index: usize, key: String },
    #[error("feature {index} uses the reserved identifier 0")]
    ReservedId { index: usize },
    #[error("feature {index} has malformed LineString coordinates")]
    InvalidCoordinates { index: usize },
}

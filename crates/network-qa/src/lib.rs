//! Umbrella crate for the `network-qa` workspace.
//!
//! Re-exports the geometry and segment model together with the connectivity
//! and crossings checks. GeoJSON input/output lives under [`geojson`].

pub use nq_connect::*;
pub use nq_core::*;
pub use nq_crossing::*;

pub mod geojson {
    pub use nq_geojson::*;
}

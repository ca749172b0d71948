//! Unmarked at-grade crossings between waterways and roads.
//!
//! Every road polyline is cut into straight pieces and indexed by bounding
//! box; each waterway piece is then intersected with the candidate road
//! pieces. A crossing is considered documented when the road carries a bridge
//! tag or the waterway a tunnel/culvert tag, see [`CrossingRules`].

mod crossing;
mod intersect;

pub use crossing::{Crossing, CrossingRules, CrossingSummary, Structure, find_crossings};
pub use intersect::{PieceIntersection, intersect_pieces};

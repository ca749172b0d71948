//! Foundational primitives for line-network quality checks.
//!
//! ## Coordinates
//! Geometry is planar `f64` in the units of the source data, usually decimal
//! degrees. Distances are Euclidean on those units; no geodesic correction is
//! made.
//!
//! ## Segments
//! A [`Segment`] is one filtered line feature. Its two endpoints are the first
//! and last coordinate of its polyline; geometry with fewer than two
//! coordinates, or with non-finite coordinates, is reported through
//! [`GeometryError`] instead of panicking.
//!
//! ## Identifiers
//! [`SegmentId`] is non-zero. Zero is the "unreached" value written by the
//! connectivity check.

mod error;
mod filter;
mod geom;
mod segment;

pub use error::GeometryError;
pub use filter::{AttributeFilter, value_text};
pub use geom::{Bbox2d, Point2d, Polyline2d, Vec2d};
pub use segment::{Attributes, EndpointRole, Segment, SegmentId};

use core::fmt;
use std::collections::BTreeMap;
use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::geom::{Point2d, Polyline2d};

/// Feature properties carried through the checks.
pub type Attributes = BTreeMap<String, serde_json::Value>;

/// Identifier of a segment, unique within one dataset.
///
/// Zero is not representable: it is the "unreached" value in connectivity
/// results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(NonZeroU64);

impl SegmentId {
    /// Returns `None` for the reserved value `0`.
    pub const fn new(raw: u64) -> Option<Self> {
        match NonZeroU64::new(raw) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    pub const fn get(self) -> u64 {
        self.0.get()
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointRole {
    Start,
    End,
}

impl EndpointRole {
    pub const BOTH: [EndpointRole; 2] = [EndpointRole::Start, EndpointRole::End];
}

/// One line feature: a polyline with a stable identifier and free-form attributes.
///
/// Geometry is fixed at construction; only attributes can change afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub id: SegmentId,
    geometry: Polyline2d,
    pub attributes: Attributes,
}

impl Segment {
    pub fn new(id: SegmentId, geometry: Polyline2d, attributes: Attributes) -> Self {
        Self {
            id,
            geometry,
            attributes,
        }
    }

    pub fn geometry(&self) -> &Polyline2d {
        &self.geometry
    }

    /// Checks that the geometry can serve as a graph node.
    pub fn validate(&self) -> Result<(), GeometryError> {
        let points = &self.geometry.points;
        if points.len() < 2 {
            return Err(GeometryError::TooFewPoints {
                count: points.len(),
            });
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(GeometryError::NonFinite { index });
        }
        Ok(())
    }

    /// First and last coordinate.
    pub fn endpoints(&self) -> Result<[Point2d; 2], GeometryError> {
        self.validate()?;
        let points = &self.geometry.points;
        Ok([points[0], points[points.len() - 1]])
    }

    pub fn endpoint(&self, role: EndpointRole) -> Result<Point2d, GeometryError> {
        let [start, end] = self.endpoints()?;
        Ok(match role {
            EndpointRole::Start => start,
            EndpointRole::End => end,
        })
    }
}

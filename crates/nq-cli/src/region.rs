use nq_core::{Bbox2d, Segment};
use serde_json::json;

use crate::config::RegionConfig;

pub const FULL_AREA: &str = "full_area";
pub const REGION_KEY: &str = "region";

/// A named part of the input; each region is checked independently.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    /// `None` covers everything.
    pub bbox: Option<Bbox2d>,
}

impl Region {
    pub fn full_area() -> Self {
        Self {
            name: FULL_AREA.to_string(),
            bbox: None,
        }
    }

    /// Configured regions, or the whole area when none are configured.
    pub fn from_config(regions: &[RegionConfig]) -> Vec<Self> {
        if regions.is_empty() {
            return vec![Self::full_area()];
        }
        regions
            .iter()
            .map(|r| Self {
                name: r.name.clone(),
                bbox: Some(Bbox2d::from_bounds(r.bbox)),
            })
            .collect()
    }

    /// Owned copies of the segments whose bounding box intersects the region,
    /// tagged with the region name.
    ///
    /// Segments without a usable bounding box (no coordinates) cannot be
    /// placed, so every region keeps them and the check flags them there.
    pub fn select(&self, segments: &[Segment]) -> Vec<Segment> {
        segments
            .iter()
            .filter(|s| self.covers(s))
            .map(|s| {
                let mut s = s.clone();
                s.attributes.insert(REGION_KEY.to_string(), json!(self.name));
                s
            })
            .collect()
    }

    fn covers(&self, segment: &Segment) -> bool {
        let Some(region) = &self.bbox else {
            return true;
        };
        match segment.geometry().bbox() {
            Some(bb) if bb.min.is_finite() && bb.max.is_finite() => region.intersects(&bb),
            _ => true,
        }
    }
}

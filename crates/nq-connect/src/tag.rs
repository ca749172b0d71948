use nq_core::{GeometryError, Segment, SegmentId};
use serde_json::Value;

/// Connectivity outcome for one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connection {
    Reached { outlet: SegmentId, hops: u32 },
    Unreached,
    /// Excluded from the graph; reported as unreached.
    InvalidGeometry(GeometryError),
}

impl Connection {
    /// Reached outlet id, or `0` for unreached and invalid segments.
    pub fn value(&self) -> u64 {
        self.outlet().map_or(0, SegmentId::get)
    }

    pub fn outlet(&self) -> Option<SegmentId> {
        match self {
            Self::Reached { outlet, .. } => Some(*outlet),
            Self::Unreached | Self::InvalidGeometry(_) => None,
        }
    }

    pub fn is_reached(&self) -> bool {
        matches!(self, Self::Reached { .. })
    }
}

/// Writes connectivity results into segment attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tagger {
    pub result_key: String,
    pub invalid_key: String,
}

impl Default for Tagger {
    fn default() -> Self {
        Self {
            result_key: "connected".to_string(),
            invalid_key: "geometry_invalid".to_string(),
        }
    }
}

impl Tagger {
    /// Sets `result_key`, overwriting any previous value. Invalid geometry also
    /// gets `invalid_key = true`. Valid segments only get `result_key`; every
    /// other attribute, including an existing `invalid_key`, is left as it is.
    pub fn tag(&self, segment: &mut Segment, connection: &Connection) {
        let attrs = &mut segment.attributes;
        attrs.insert(self.result_key.clone(), Value::from(connection.value()));
        if let Connection::InvalidGeometry(_) = connection {
            attrs.insert(self.invalid_key.clone(), Value::Bool(true));
        }
    }
}

use nq_core::{GeometryError, SegmentId};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("tolerance must be a finite, non-negative number, got {0}")]
pub struct ToleranceError(pub f64);

/// Input that changes the meaning of the whole check. Always fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("outlet {0} does not match any segment in the filtered input")]
    UnknownOutlet(SegmentId),
    #[error("outlet {id} has invalid geometry: {source}")]
    InvalidOutlet { id: SegmentId, source: GeometryError },
    #[error("segment id {0} appears more than once in the input")]
    DuplicateSegment(SegmentId),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConnectivityError {
    #[error(transparent)]
    Tolerance(#[from] ToleranceError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

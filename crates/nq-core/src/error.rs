use thiserror::Error;

/// Why a segment's geometry cannot provide two endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("geometry has {count} coordinate(s), at least 2 are required")]
    TooFewPoints { count: usize },
    #[error("coordinate {index} is not finite")]
    NonFinite { index: usize },
}

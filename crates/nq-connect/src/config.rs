use crate::error::ToleranceError;
use crate::tag::Tagger;

/// Maximum planar distance at which two endpoints count as joined.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Tolerance(f64);

impl Tolerance {
    pub const ZERO: Tolerance = Tolerance(0.0);

    /// Rejects negative, NaN and infinite values.
    pub fn new(value: f64) -> Result<Self, ToleranceError> {
        if value.is_finite() && value >= 0.0 {
            // -0.0 passes the check; store it as +0.0.
            Ok(Self(value + 0.0))
        } else {
            Err(ToleranceError(value))
        }
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self(1e-4)
    }
}

impl TryFrom<f64> for Tolerance {
    type Error = ToleranceError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConnectivityConfig {
    pub tolerance: Tolerance,
    pub tagger: Tagger,
}

impl ConnectivityConfig {
    /// Default attribute keys with the given tolerance.
    pub fn new(tolerance: f64) -> Result<Self, ToleranceError> {
        Ok(Self {
            tolerance: Tolerance::new(tolerance)?,
            tagger: Tagger::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Tolerance;

    #[test]
    fn tolerance_validation() {
        assert_eq!(Tolerance::new(0.0).map(Tolerance::get), Ok(0.0));
        assert_eq!(Tolerance::new(0.5).map(Tolerance::get), Ok(0.5));
        assert!(Tolerance::new(-1e-9).is_err());
        assert!(Tolerance::new(f64::NAN).is_err());
        assert!(Tolerance::new(f64::INFINITY).is_err());
        assert!(Tolerance::new(-0.0).is_ok_and(|t| t.get().is_sign_positive()));
        assert_eq!(Tolerance::default().get(), 1e-4);
    }
}

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

use crate::error::ConstructError;

/// Numeric settings fixed when a [`Triangulation`](crate::Triangulation) is
/// created.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Config {
    /// Determinants whose magnitude is at most this value are treated as zero
    /// by the orientation and in-circle predicates. It is also the per-axis
    /// distance within which two points are the same vertex. Zero means exact
    /// comparison.
    pub epsilon: f64,
}

impl Config {
    pub fn new() -> Self {
        Self { epsilon: 0.0 }
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ConstructError> {
        if !self.epsilon.is_finite() || self.epsilon < 0.0 {
            return Err(ConstructError::InvalidEpsilon(self.epsilon));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_exact() {
        assert_eq!(Config::default().epsilon, 0.0);
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn rejects_bad_epsilon() {
        assert_eq!(
            Config::new().with_epsilon(-1.0).validate(),
            Err(ConstructError::InvalidEpsilon(-1.0))
        );
        assert!(Config::new().with_epsilon(f64::NAN).validate().is_err());
        assert!(Config::new().with_epsilon(1e-9).validate().is_ok());
    }
}

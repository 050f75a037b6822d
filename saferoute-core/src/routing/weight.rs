//! Blend parameter and edge weight functions

use serde::Serialize;

use super::normalization::NormalizationStats;
use crate::Error;
use crate::model::ScoredEdge;

/// Trade-off between travel time (0) and safety (1)
///
/// Values outside [0, 1] are rejected at construction rather than clamped,
/// so a weight can never leave the `[0,1]·t + [0,1]·s` envelope.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
pub struct SafetyAlpha(f64);

impl SafetyAlpha {
    /// Pure travel time
    pub const FASTEST: SafetyAlpha = SafetyAlpha(0.0);
    /// Pure danger exposure
    pub const SAFEST: SafetyAlpha = SafetyAlpha(1.0);

    /// # Errors
    ///
    /// Returns [`Error::InvalidAlpha`] for values outside [0, 1] and NaN.
    pub fn new(alpha: f64) -> Result<Self, Error> {
        if (0.0..=1.0).contains(&alpha) {
            Ok(Self(alpha))
        } else {
            Err(Error::InvalidAlpha(alpha))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for SafetyAlpha {
    fn default() -> Self {
        Self(0.5)
    }
}

impl TryFrom<f64> for SafetyAlpha {
    type Error = Error;

    fn try_from(alpha: f64) -> Result<Self, Self::Error> {
        Self::new(alpha)
    }
}

/// How an edge is weighted during the search
#[derive(Debug, Clone, Copy)]
pub(crate) enum EdgeWeight<'a> {
    /// Normalized travel time only
    Time(&'a NormalizationStats),
    /// `(1 - alpha) * t + alpha * s`
    Blended(&'a NormalizationStats, SafetyAlpha),
    /// Precomputed `optimized_weight`
    Legacy,
}

impl EdgeWeight<'_> {
    pub(crate) fn cost(&self, edge: &ScoredEdge) -> f64 {
        match *self {
            EdgeWeight::Time(stats) => stats.time_term(edge),
            // alpha = 0 must reproduce the time weight bit for bit
            EdgeWeight::Blended(stats, alpha) if alpha.value() == 0.0 => stats.time_term(edge),
            EdgeWeight::Blended(stats, alpha) => {
                let alpha = alpha.value();
                (1.0 - alpha) * stats.time_term(edge) + alpha * stats.safety_term(edge)
            }
            EdgeWeight::Legacy => edge.scores.optimized_weight.max(0.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_bounds_are_enforced() {
        assert!(SafetyAlpha::new(0.0).is_ok());
        assert!(SafetyAlpha::new(1.0).is_ok());
        assert!(SafetyAlpha::new(0.25).is_ok());
        assert!(matches!(SafetyAlpha::new(-0.01), Err(Error::InvalidAlpha(_))));
        assert!(matches!(SafetyAlpha::new(1.5), Err(Error::InvalidAlpha(_))));
        assert!(SafetyAlpha::new(f64::NAN).is_err());
    }

    #[test]
    fn default_alpha_is_balanced() {
        assert_eq!(SafetyAlpha::default().value(), 0.5);
        assert_eq!(SafetyAlpha::try_from(0.3).unwrap().value(), 0.3);
    }
}

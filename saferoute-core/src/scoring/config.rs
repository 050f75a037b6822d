//! Tunable scoring policy
//!
//! The default weights were chosen empirically and are not derived from any
//! labeled danger dataset; they are a policy knob, not a ground truth.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::attribution::DEFAULT_PROXIMITY_RADIUS_M;
use super::components::{ComponentScores, DEFAULT_DENSITY_SCALE};

/// Weights of the four risk components in the composite safety score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub curve: f64,
    pub darkness: f64,
    pub highway: f64,
    pub land: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            curve: 10.0,
            darkness: 30.0,
            highway: 40.0,
            land: 20.0,
        }
    }
}

impl ScoringWeights {
    /// Composite safety score. Pure: identical inputs give bit-identical output.
    pub fn combine(&self, components: &ComponentScores) -> f64 {
        self.curve * components.curve
            + self.darkness * components.darkness
            + self.highway * components.highway
            + self.land * components.land
    }

    pub(crate) fn validate(&self) -> Result<(), String> {
        for (name, weight) in [
            ("curve", self.curve),
            ("darkness", self.darkness),
            ("highway", self.highway),
            ("land", self.land),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(format!("{name} weight must be finite and >= 0, got {weight}"));
            }
        }
        Ok(())
    }
}

/// Travel speeds used when a segment carries no usable speed of its own
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeedTable {
    /// Default speed per road class (link variants use their base class)
    pub class_kph: BTreeMap<String, f64>,
    /// Speed for unknown classes
    pub fallback_kph: f64,
}

impl Default for SpeedTable {
    fn default() -> Self {
        let class_kph = [
            ("motorway", 110.0),
            ("trunk", 90.0),
            ("primary", 70.0),
            ("secondary", 60.0),
            ("tertiary", 50.0),
            ("unclassified", 50.0),
            ("residential", 30.0),
            ("living_street", 10.0),
            ("service", 20.0),
            ("road", 40.0),
        ]
        .into_iter()
        .map(|(class, kph)| (class.to_string(), kph))
        .collect();

        Self {
            class_kph,
            fallback_kph: 40.0,
        }
    }
}

/// Complete scoring configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: ScoringWeights,
    /// Multiplier turning lights-per-meter into the darkness denominator
    pub density_scale: f64,
    /// Maximum point-to-segment distance for attribution, in meters
    pub proximity_radius_m: f64,
    /// Road classes ordered from safest to least safe
    pub highway_order: Vec<String>,
    pub speeds: SpeedTable,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            density_scale: DEFAULT_DENSITY_SCALE,
            proximity_radius_m: DEFAULT_PROXIMITY_RADIUS_M,
            highway_order: [
                "motorway",
                "trunk",
                "primary",
                "secondary",
                "tertiary",
                "unclassified",
                "residential",
                "road",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            speeds: SpeedTable::default(),
        }
    }
}

impl ScoringConfig {
    /// Checks that every numeric policy value is usable
    ///
    /// # Errors
    ///
    /// Returns a description of the first invalid value.
    pub fn validate(&self) -> Result<(), String> {
        self.weights.validate()?;
        if !self.density_scale.is_finite() || self.density_scale < 0.0 {
            return Err(format!(
                "density_scale must be finite and >= 0, got {}",
                self.density_scale
            ));
        }
        if !self.proximity_radius_m.is_finite() || self.proximity_radius_m < 0.0 {
            return Err(format!(
                "proximity_radius_m must be finite and >= 0, got {}",
                self.proximity_radius_m
            ));
        }
        if !self.speeds.fallback_kph.is_finite() || self.speeds.fallback_kph <= 0.0 {
            return Err(format!(
                "fallback speed must be positive, got {}",
                self.speeds.fallback_kph
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_policy() {
        let config = ScoringConfig::default();
        assert_eq!(config.weights.curve, 10.0);
        assert_eq!(config.weights.darkness, 30.0);
        assert_eq!(config.weights.highway, 40.0);
        assert_eq!(config.weights.land, 20.0);
        assert_eq!(config.density_scale, 50.0);
        assert_eq!(config.proximity_radius_m, 15.0);
        assert_eq!(config.highway_order.len(), 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config: ScoringConfig =
            serde_json::from_str(r#"{"weights": {"highway": 5.0}, "proximity_radius_m": 20}"#)
                .unwrap();
        assert_eq!(config.weights.highway, 5.0);
        assert_eq!(config.weights.darkness, 30.0);
        assert_eq!(config.proximity_radius_m, 20.0);
        assert_eq!(config.density_scale, 50.0);
    }

    #[test]
    fn negative_weight_is_invalid() {
        let mut config = ScoringConfig::default();
        config.weights.land = -1.0;
        assert!(config.validate().is_err());
    }
}

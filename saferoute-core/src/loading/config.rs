use std::path::PathBuf;

use serde::Deserialize;

use crate::scoring::ScoringConfig;

/// Inputs and scoring policy for building a scored street network
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkBuildConfig {
    /// `GeoJSON` edge export of the street network
    pub network_path: PathBuf,
    /// Street light locations (`.csv` or `.json`); none means every edge is dark
    #[serde(default)]
    pub points_path: Option<PathBuf>,
    #[serde(default)]
    pub scoring: ScoringConfig,
}

impl NetworkBuildConfig {
    pub fn new(network_path: impl Into<PathBuf>) -> Self {
        Self {
            network_path: network_path.into(),
            points_path: None,
            scoring: ScoringConfig::default(),
        }
    }

    #[must_use]
    pub fn with_points(mut self, points_path: impl Into<PathBuf>) -> Self {
        self.points_path = Some(points_path.into());
        self
    }

    #[must_use]
    pub fn with_scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }
}

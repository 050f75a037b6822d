use std::fs;
use std::path::Path;

use saferoute_core::ScoringConfig;
use serde::Deserialize;

use crate::error::AppError;

/// Contents of the optional TOML configuration file
///
/// ```toml
/// [scoring]
/// density_scale = 50.0
/// proximity_radius_m = 15.0
///
/// [scoring.weights]
/// curve = 10.0
/// darkness = 30.0
/// highway = 40.0
/// land = 20.0
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scoring: ScoringConfig,
}

impl AppConfig {
    pub fn from_toml(text: &str, path: &Path) -> Result<Self, AppError> {
        toml::from_str(text).map_err(|source| AppError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads the file at `path`, or the defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, AppError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path).map_err(|source| AppError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text, path)?;
        tracing::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_tables_keep_defaults() {
        let text = "[scoring]\nproximity_radius_m = 25.0\n\n[scoring.weights]\nland = 0.0\n";
        let config = AppConfig::from_toml(text, Path::new("test.toml")).unwrap();

        assert_eq!(config.scoring.proximity_radius_m, 25.0);
        assert_eq!(config.scoring.weights.land, 0.0);
        assert_eq!(config.scoring.weights.highway, 40.0);
        assert_eq!(config.scoring.density_scale, 50.0);
    }

    #[test]
    fn empty_file_is_default() {
        let config = AppConfig::from_toml("", Path::new("empty.toml")).unwrap();
        assert_eq!(config.scoring, ScoringConfig::default());
    }

    #[test]
    fn type_errors_are_reported() {
        let text = "[scoring]\ndensity_scale = \"high\"\n";
        let result = AppConfig::from_toml(text, Path::new("bad.toml"));
        assert!(matches!(result, Err(AppError::Config { .. })));
    }
}

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] saferoute_core::Error),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid configuration in {path}: {source}")]
    Config {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid coordinate '{0}', expected LAT,LON")]
    InvalidCoordinate(String),
    #[error("No intersection found near {lat},{lon}")]
    NoNearbyNode { lat: f64, lon: f64 },
    #[error("Failed to serialize output: {0}")]
    Output(#[from] serde_json::Error),
}

use thiserror::Error;

use crate::NodeId;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown node id {0}")]
    UnknownNode(NodeId),
    #[error("Safety alpha must be within [0, 1], got {0}")]
    InvalidAlpha(f64),
    #[error("Normalization computed for network version {found}, expected {expected}")]
    StaleNormalization { expected: u64, found: u64 },
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid scoring configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
}

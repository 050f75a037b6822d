//! Scored street network, immutable once built

pub mod edge;
pub mod network;
mod to_geojson;

pub use edge::{EdgeScores, ScoredEdge};
pub use network::{NetworkSummary, ScoredGraph, ScoredNetwork};

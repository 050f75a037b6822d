//! Data model for safety-scored street networks
//!
//! Contains the raw network produced by network retrieval and the
//! immutable scored network consumed by routing.

pub mod scored;
pub mod streets;

pub use scored::{EdgeScores, NetworkSummary, ScoredEdge, ScoredGraph, ScoredNetwork};
pub use streets::{
    IndexedPoint, PointFeature, Projection, SegmentInput, StreetEdge, StreetGraph, StreetNetwork,
    StreetNode,
};

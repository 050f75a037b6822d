//! Danger-exposure scoring and dual-objective routing for street networks.
//!
//! A [`StreetNetwork`] is scored once by [`score_network`] into an immutable
//! [`ScoredNetwork`]. Routing queries then run read-only against the scored
//! network, computing both the quickest route and a route that blends travel
//! time with estimated risk.

pub mod error;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;
pub mod scoring;

pub use error::Error;
pub use loading::{NetworkBuildConfig, build_scored_network};
pub use model::{
    EdgeScores, NetworkSummary, PointFeature, ScoredEdge, ScoredNetwork, SegmentInput,
    StreetEdge, StreetNetwork, StreetNode,
};
pub use routing::{
    DualRoute, NormalizationStats, Route, RouteOutcome, RouteSummary, SafetyAlpha, dual_routes,
    dual_routes_many, dual_routes_with_stats, legacy_safest_route,
};
pub use scoring::{ScoringConfig, ScoringReport, ScoringWeights, score_network};

/// External identifier of an intersection (OSM node id in practice)
pub type NodeId = i64;

/// Travel time in seconds
pub type Seconds = f64;

/// Distance in meters
pub type Meters = f64;

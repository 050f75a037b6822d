// Re-export key components
pub use crate::loading::{NetworkBuildConfig, build_scored_network};
pub use crate::model::{
    PointFeature, ScoredEdge, ScoredNetwork, SegmentInput, StreetNetwork, StreetNode,
};
pub use crate::routing::{
    DualRoute, NormalizationStats, Route, RouteOutcome, RouteSummary, SafetyAlpha, dual_routes,
    dual_routes_many, legacy_safest_route,
};
pub use crate::scoring::{
    LandCoverRaster, LandCoverSource, NoLandCover, ScoringConfig, ScoringReport, score_network,
};

// Core scalar types
pub use crate::Meters;
pub use crate::NodeId;
pub use crate::Seconds;

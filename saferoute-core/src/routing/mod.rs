//! Dual-objective routing over a scored network

mod dijkstra;
mod dual;
mod normalization;
mod to_geojson;
mod weight;

pub use dual::{
    DualRoute, Route, RouteOutcome, RouteSummary, dual_routes, dual_routes_many,
    dual_routes_with_stats, legacy_safest_route,
};
pub use normalization::NormalizationStats;
pub use weight::SafetyAlpha;

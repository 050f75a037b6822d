use geo::Point;
use geojson::FeatureCollection;
use saferoute_core::prelude::*;
use serde::Serialize;

use crate::error::AppError;

/// Route section of the `route` command output
#[derive(Debug, Serialize)]
pub struct RouteReport {
    pub nodes: Vec<NodeId>,
    pub distance_m: Meters,
    pub travel_time_s: Seconds,
    pub danger_exposure: f64,
    pub avg_speed_kmh: Option<f64>,
}

impl RouteReport {
    fn from_outcome(outcome: &RouteOutcome, network: &ScoredNetwork) -> Option<Self> {
        let route = outcome.route()?;
        Some(Self {
            nodes: route.node_ids(network),
            distance_m: route.summary.distance_m,
            travel_time_s: route.summary.travel_time_s,
            danger_exposure: route.summary.danger_exposure,
            avg_speed_kmh: route.summary.avg_speed_kmh,
        })
    }
}

/// Output of the `route` command; a missing route serializes as `null`
#[derive(Debug, Serialize)]
pub struct DualRouteReport {
    pub start_node: NodeId,
    pub end_node: NodeId,
    /// Distance from the requested start coordinate to `start_node`
    pub start_snap_m: Meters,
    pub end_snap_m: Meters,
    pub alpha: f64,
    pub fastest: Option<RouteReport>,
    pub safest: Option<RouteReport>,
}

/// Parses `"LAT,LON"`
pub fn parse_coordinate(text: &str) -> Result<Point<f64>, AppError> {
    let invalid = || AppError::InvalidCoordinate(text.to_string());
    let (lat, lon) = text.split_once(',').ok_or_else(invalid)?;
    let lat: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let lon: f64 = lon.trim().parse().map_err(|_| invalid())?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return Err(invalid());
    }
    Ok(Point::new(lon, lat))
}

fn snap(network: &ScoredNetwork, point: &Point<f64>) -> Result<(NodeId, Meters), AppError> {
    let no_node = || AppError::NoNearbyNode {
        lat: point.y(),
        lon: point.x(),
    };
    let (index, distance) = network.nearest_node(point).ok_or_else(no_node)?;
    let node = network.node(index).ok_or_else(no_node)?;
    Ok((node.id, distance))
}

/// Snaps both coordinates to intersections and computes the dual route
pub fn route_between(
    network: &ScoredNetwork,
    from: &Point<f64>,
    to: &Point<f64>,
    alpha: SafetyAlpha,
) -> Result<(DualRoute, DualRouteReport), AppError> {
    let (start_node, start_snap_m) = snap(network, from)?;
    let (end_node, end_snap_m) = snap(network, to)?;
    tracing::debug!(start_node, end_node, start_snap_m, end_snap_m, "Snapped route endpoints");

    let routes = dual_routes(network, start_node, end_node, alpha)?;
    for (route_type, outcome) in [("fastest", &routes.fastest), ("safest", &routes.safest)] {
        if !outcome.is_found() {
            tracing::warn!("No {route_type} route between {start_node} and {end_node}");
        }
    }

    let report = DualRouteReport {
        start_node,
        end_node,
        start_snap_m,
        end_snap_m,
        alpha: alpha.value(),
        fastest: RouteReport::from_outcome(&routes.fastest, network),
        safest: RouteReport::from_outcome(&routes.safest, network),
    };
    Ok((routes, report))
}

/// Both routes as a `GeoJSON` `FeatureCollection`
pub fn routes_to_geojson(
    routes: &DualRoute,
    network: &ScoredNetwork,
) -> Result<FeatureCollection, AppError> {
    Ok(FeatureCollection {
        features: routes.to_features(network)?,
        bbox: None,
        foreign_members: None,
    })
}

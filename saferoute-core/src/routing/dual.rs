//! Fastest and safety-blended routes between two intersections

use petgraph::graph::{EdgeIndex, NodeIndex};
use rayon::prelude::*;
use serde::Serialize;

use super::dijkstra::{ShortestPath, shortest_path};
use super::normalization::NormalizationStats;
use super::weight::{EdgeWeight, SafetyAlpha};
use crate::model::ScoredNetwork;
use crate::{Error, Meters, NodeId, Seconds};

/// Aggregates of a route, summed from the edges it traverses
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteSummary {
    pub distance_m: Meters,
    pub travel_time_s: Seconds,
    /// `Σ safety_score * length / 1000`, risk per kilometer traveled
    pub danger_exposure: f64,
    /// `None` for zero-time routes
    pub avg_speed_kmh: Option<f64>,
}

impl RouteSummary {
    fn from_edges(network: &ScoredNetwork, edges: &[EdgeIndex]) -> Self {
        let (distance_m, travel_time_s, danger_exposure) = edges
            .iter()
            .filter_map(|&edge| network.edge(edge))
            .fold((0.0, 0.0, 0.0), |(distance, time, exposure), edge| {
                (
                    distance + edge.length,
                    time + edge.travel_time,
                    exposure + edge.safety_score() * (edge.length / 1000.0),
                )
            });

        let avg_speed_kmh = (travel_time_s > 0.0).then(|| distance_m / travel_time_s * 3.6);

        Self {
            distance_m,
            travel_time_s,
            danger_exposure,
            avg_speed_kmh,
        }
    }
}

/// Path through a scored network
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Visited intersections, start and end included
    pub nodes: Vec<NodeIndex>,
    /// Traversed edges, one fewer than `nodes`
    pub edges: Vec<EdgeIndex>,
    pub summary: RouteSummary,
}

impl Route {
    fn from_path(network: &ScoredNetwork, path: ShortestPath) -> Self {
        let summary = RouteSummary::from_edges(network, &path.edges);
        Self {
            nodes: path.nodes,
            edges: path.edges,
            summary,
        }
    }

    /// External ids of the visited intersections
    pub fn node_ids(&self, network: &ScoredNetwork) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter_map(|&index| network.node(index).map(|node| node.id))
            .collect()
    }
}

/// Result of one route search. A missing path is an expected outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteOutcome {
    Found(Route),
    NotFound,
}

impl RouteOutcome {
    pub fn route(&self) -> Option<&Route> {
        match self {
            RouteOutcome::Found(route) => Some(route),
            RouteOutcome::NotFound => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, RouteOutcome::Found(_))
    }
}

impl From<Option<Route>> for RouteOutcome {
    fn from(route: Option<Route>) -> Self {
        route.map_or(RouteOutcome::NotFound, RouteOutcome::Found)
    }
}

/// Fastest route and the route minimizing the alpha-blended weight
#[derive(Debug, Clone, PartialEq)]
pub struct DualRoute {
    pub fastest: RouteOutcome,
    pub safest: RouteOutcome,
    pub alpha: SafetyAlpha,
}

/// Computes the fastest and the safety-blended route between two nodes
///
/// Uses the normalization maxima cached on `network`.
///
/// # Errors
///
/// Returns [`Error::UnknownNode`] if either id is not part of the network.
/// Disconnected nodes are not an error, both outcomes are then
/// [`RouteOutcome::NotFound`].
pub fn dual_routes(
    network: &ScoredNetwork,
    start: NodeId,
    end: NodeId,
    alpha: SafetyAlpha,
) -> Result<DualRoute, Error> {
    dual_routes_with_stats(network, network.normalization(), start, end, alpha)
}

/// Same as [`dual_routes`] with explicitly supplied normalization maxima
///
/// # Errors
///
/// Returns [`Error::StaleNormalization`] when `stats` were computed for a
/// different network version, and [`Error::UnknownNode`] for unknown ids.
pub fn dual_routes_with_stats(
    network: &ScoredNetwork,
    stats: &NormalizationStats,
    start: NodeId,
    end: NodeId,
    alpha: SafetyAlpha,
) -> Result<DualRoute, Error> {
    if stats.graph_version != network.version() {
        return Err(Error::StaleNormalization {
            expected: network.version(),
            found: stats.graph_version,
        });
    }
    let (start, end) = resolve_endpoints(network, start, end)?;
    Ok(dual_routes_between(network, stats, start, end, alpha))
}

/// Runs [`dual_routes`] for many start/end pairs in parallel
///
/// Results keep the order of `pairs`.
pub fn dual_routes_many(
    network: &ScoredNetwork,
    pairs: &[(NodeId, NodeId)],
    alpha: SafetyAlpha,
) -> Vec<Result<DualRoute, Error>> {
    pairs
        .par_iter()
        .map(|&(start, end)| dual_routes(network, start, end, alpha))
        .collect()
}

/// Shortest path by the precomputed `optimized_weight`
///
/// # Errors
///
/// Returns [`Error::UnknownNode`] if either id is not part of the network.
pub fn legacy_safest_route(
    network: &ScoredNetwork,
    start: NodeId,
    end: NodeId,
) -> Result<RouteOutcome, Error> {
    let (start, end) = resolve_endpoints(network, start, end)?;
    Ok(search(network, start, end, EdgeWeight::Legacy))
}

pub(crate) fn dual_routes_between(
    network: &ScoredNetwork,
    stats: &NormalizationStats,
    start: NodeIndex,
    end: NodeIndex,
    alpha: SafetyAlpha,
) -> DualRoute {
    let (fastest, safest) = rayon::join(
        || search(network, start, end, EdgeWeight::Time(stats)),
        || search(network, start, end, EdgeWeight::Blended(stats, alpha)),
    );

    log::debug!(
        "Routes {start:?} -> {end:?} at alpha {}: fastest found {}, safest found {}",
        alpha.value(),
        fastest.is_found(),
        safest.is_found()
    );

    DualRoute {
        fastest,
        safest,
        alpha,
    }
}

fn search(
    network: &ScoredNetwork,
    start: NodeIndex,
    end: NodeIndex,
    weight: EdgeWeight<'_>,
) -> RouteOutcome {
    shortest_path(network.graph(), start, end, |edge| weight.cost(edge))
        .map(|path| Route::from_path(network, path))
        .into()
}

fn resolve_endpoints(
    network: &ScoredNetwork,
    start: NodeId,
    end: NodeId,
) -> Result<(NodeIndex, NodeIndex), Error> {
    let start = network.node_index(start).ok_or(Error::UnknownNode(start))?;
    let end = network.node_index(end).ok_or(Error::UnknownNode(end))?;
    Ok((start, end))
}

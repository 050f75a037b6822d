//! Edge scoring pipeline
//!
//! Runs once per network, before any routing query: projects the network,
//! attributes point features to segments, computes the four risk components
//! and combines them into one safety score per edge.

pub mod attribution;
pub mod components;
pub mod config;
pub mod land_cover;
pub mod speed;

use std::collections::BTreeMap;

use geo::{Distance, Haversine, InterpolatableLine, Length, LineString, Point};
use log::{info, warn};
use petgraph::graph::{DiGraph, EdgeIndex};
use rayon::prelude::*;
use serde::Serialize;

use crate::Error;
use crate::model::{
    EdgeScores, PointFeature, Projection, ScoredEdge, ScoredNetwork, StreetEdge, StreetNetwork,
};

pub use attribution::{Attribution, DEFAULT_PROXIMITY_RADIUS_M, attribute_points};
pub use components::{ComponentScores, HighwayRanking, HighwayRisk};
pub use config::{ScoringConfig, ScoringWeights, SpeedTable};
pub use land_cover::{LandCoverRaster, LandCoverSource, NlcdClass, NoLandCover, PixelEncoding};

/// Diagnostics of one scoring run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoringReport {
    pub edges: usize,
    pub points: usize,
    pub skipped_points: usize,
    /// Segments left out of attribution because of unusable geometry
    pub skipped_segments: usize,
    pub lit_edges: usize,
    pub max_lights: u32,
    /// Proximity was measured in projected meters
    pub projected: bool,
    /// Attribution failed and every light count is zero
    pub attribution_degraded: bool,
    pub land_cover_available: bool,
    pub land_samples: usize,
    pub land_unknown: usize,
    /// Number of edges per sampled NLCD code
    pub land_classes: BTreeMap<u8, usize>,
}

/// Edge geometry and distances resolved before scoring
struct PreparedEdge {
    geometry: LineString<f64>,
    length: f64,
    straight_distance: f64,
}

/// `travel_time * (1 + safety_score / 100)`
pub fn optimized_weight(travel_time: f64, safety_score: f64) -> f64 {
    travel_time * (1.0 + safety_score / 100.0)
}

/// Scores every edge of `network`
///
/// Missing external data never aborts scoring: without points every
/// `light_count` is 0, without land cover every `land_risk` is the neutral
/// default. The network topology is carried over unchanged, so node and edge
/// indices stay valid.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`] if `config` fails validation, e.g. a
/// negative or non-finite weight that would make safety scores negative.
pub fn score_network(
    network: StreetNetwork,
    points: &[PointFeature],
    land_cover: &dyn LandCoverSource,
    config: &ScoringConfig,
) -> Result<(ScoredNetwork, ScoringReport), Error> {
    config.validate().map_err(Error::InvalidConfig)?;

    let StreetNetwork { graph, node_lookup } = network;
    info!(
        "Scoring {} edges of a network with {} nodes",
        graph.edge_count(),
        graph.node_count()
    );

    let projection = Projection::centered_on(graph.node_weights().map(|node| &node.geometry));

    let prepared: Vec<PreparedEdge> = graph
        .raw_edges()
        .iter()
        .map(|edge| {
            let (from, to) = (&graph[edge.source()], &graph[edge.target()]);
            let geometry = edge.weight.resolved_geometry(from, to);
            let length = match edge.weight.segment.length {
                Some(length) if length.is_finite() && length > 0.0 => length,
                _ => Haversine.length(&geometry),
            };
            PreparedEdge {
                straight_distance: Haversine.distance(from.geometry, to.geometry),
                geometry,
                length,
            }
        })
        .collect();

    let attribution = if points.is_empty() {
        warn!("No point features available; every light count is 0");
        Attribution {
            projected: projection.is_projected(),
            ..Attribution::default()
        }
    } else {
        info!(
            "Attributing {} point features within {} m of edges",
            points.len(),
            config.proximity_radius_m
        );
        let segments = prepared
            .iter()
            .enumerate()
            .map(|(index, edge)| (EdgeIndex::new(index), projection.project_line(&edge.geometry)));
        attribute_points(segments, points, &projection, config.proximity_radius_m)
    };

    if !land_cover.is_available() {
        warn!("Land cover unavailable; using default land risk");
    }

    let ranking = HighwayRanking::new(config.highway_order.as_slice());
    let scored: Vec<(ScoredEdge, Option<NlcdClass>)> = graph
        .raw_edges()
        .par_iter()
        .zip(prepared.into_par_iter())
        .enumerate()
        .map(|(index, (edge, prepared))| {
            let light_count = attribution.count(EdgeIndex::new(index));
            score_edge(&edge.weight, prepared, light_count, &ranking, land_cover, config)
        })
        .collect();

    let mut report = ScoringReport {
        edges: scored.len(),
        points: points.len(),
        skipped_points: attribution.skipped_points,
        skipped_segments: attribution.skipped_segments,
        projected: attribution.projected,
        attribution_degraded: attribution.degraded,
        land_cover_available: land_cover.is_available(),
        ..ScoringReport::default()
    };
    drop(attribution);

    let (nodes, edges) = graph.into_nodes_edges();
    let mut scored_graph = DiGraph::with_capacity(nodes.len(), edges.len());
    for node in nodes {
        scored_graph.add_node(node.weight);
    }
    for (edge, (scored_edge, class)) in edges.into_iter().zip(scored) {
        if scored_edge.scores.light_count > 0 {
            report.lit_edges += 1;
        }
        report.max_lights = report.max_lights.max(scored_edge.scores.light_count);
        if land_cover.is_available() {
            report.land_samples += 1;
            match class {
                Some(class) => *report.land_classes.entry(class.code()).or_insert(0) += 1,
                None => report.land_unknown += 1,
            }
        }
        scored_graph.add_edge(edge.source(), edge.target(), scored_edge);
    }

    info!(
        "Lit edges: {}/{} (max lights on an edge: {})",
        report.lit_edges, report.edges, report.max_lights
    );
    if report.land_cover_available {
        info!(
            "Land cover samples: {} (unknown: {}) classes seen: {:?}",
            report.land_samples, report.land_unknown, report.land_classes
        );
    }

    Ok((ScoredNetwork::new(scored_graph, node_lookup), report))
}

fn score_edge(
    edge: &StreetEdge,
    prepared: PreparedEdge,
    light_count: u32,
    ranking: &HighwayRanking,
    land_cover: &dyn LandCoverSource,
    config: &ScoringConfig,
) -> (ScoredEdge, Option<NlcdClass>) {
    let PreparedEdge {
        geometry,
        length,
        straight_distance,
    } = prepared;
    let segment = &edge.segment;

    let highway = ranking.risk(segment.highway.as_slice());
    let class = midpoint(&geometry).and_then(|mid| land_cover.sample_class(mid.x(), mid.y()));
    let (land_risk, land_label) = components::land_risk(class);

    let components = ComponentScores {
        curve: components::curve_score(length, straight_distance),
        darkness: components::darkness_score(light_count, length, config.density_scale),
        highway: highway.risk,
        land: land_risk,
    };
    let safety_score = config.weights.combine(&components);

    let speed_kph = speed::resolve_speed(
        segment,
        highway.tag.as_deref().or(segment.highway.first().map(String::as_str)),
        &config.speeds,
    );
    let travel_time = speed::travel_time(length, speed_kph);

    let scored = ScoredEdge {
        key: edge.key,
        geometry,
        length,
        speed_kph,
        travel_time,
        name: segment.name.clone(),
        scores: EdgeScores {
            light_count,
            curve_score: components.curve,
            darkness_score: components.darkness,
            highway_risk: components.highway,
            land_risk: components.land,
            highway_tag: highway.tag,
            land_label: land_label.to_string(),
            safety_score,
            optimized_weight: optimized_weight(travel_time, safety_score),
        },
    };
    (scored, class)
}

/// Half-length point along the geometry, or the midpoint of its endpoints
fn midpoint(geometry: &LineString<f64>) -> Option<Point<f64>> {
    geometry
        .point_at_ratio_from_start(&Haversine, 0.5)
        .or_else(|| {
            let (first, last) = (geometry.0.first()?, geometry.0.last()?);
            Some(Point::new((first.x + last.x) / 2.0, (first.y + last.y) / 2.0))
        })
}

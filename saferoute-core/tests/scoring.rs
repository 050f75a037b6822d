mod common;

use geo::{LineString, Rect, coord};
use saferoute_core::model::{PointFeature, SegmentInput, StreetNetwork};
use saferoute_core::Error;
use saferoute_core::scoring::{
    LandCoverRaster, NoLandCover, PixelEncoding, ScoringConfig, score_network,
};

// A straight 100 m east-west street on the equator.
fn straight_street(highway: &str) -> StreetNetwork {
    let mut network = StreetNetwork::new();
    network.add_node(1, 0.0, 0.0);
    network.add_node(2, 0.0009, 0.0);
    network
        .add_segment(
            1,
            2,
            SegmentInput::default()
                .with_highway(highway)
                .with_length(100.0),
        )
        .unwrap();
    network
}

fn open_water() -> LandCoverRaster {
    let bounds = Rect::new(coord! { x: -0.01, y: -0.01 }, coord! { x: 0.01, y: 0.01 });
    LandCoverRaster::new(2, 2, vec![11; 4], bounds, PixelEncoding::ClassCode).unwrap()
}

#[test]
fn dark_motorway_over_water_scores_34() {
    let (network, report) = score_network(
        straight_street("motorway"),
        &[],
        &open_water(),
        &ScoringConfig::default(),
    )
    .unwrap();
    let edge = network.graph().edge_weights().next().unwrap();
    let scores = &edge.scores;

    assert_eq!(scores.curve_score, 0.0);
    assert_eq!(scores.darkness_score, 1.0);
    assert_eq!(scores.highway_risk, 0.0);
    assert_eq!(scores.land_risk, 0.2);
    assert_eq!(scores.land_label, "Open Water");
    assert_eq!(scores.highway_tag.as_deref(), Some("motorway"));
    assert!((scores.safety_score - 34.0).abs() < 1e-9);

    assert_eq!(report.land_samples, 1);
    assert_eq!(report.land_classes.get(&11), Some(&1));
}

#[test]
fn unknown_class_without_land_cover_scores_82() {
    let (network, report) = score_network(
        straight_street("bridleway"),
        &[],
        &NoLandCover,
        &ScoringConfig::default(),
    )
    .unwrap();
    let scores = &network.graph().edge_weights().next().unwrap().scores;

    assert_eq!(scores.highway_risk, 1.0);
    assert_eq!(scores.highway_tag.as_deref(), Some("bridleway"));
    assert_eq!(scores.land_risk, 0.6);
    assert!((scores.safety_score - 82.0).abs() < 1e-9);
    assert!(!report.land_cover_available);
}

#[test]
fn point_between_two_streets_lights_both() {
    let mut network = StreetNetwork::new();
    network.add_node(1, 0.0, 0.0);
    network.add_node(2, 0.001, 0.0);
    network.add_node(3, 0.0, 0.0002);
    network.add_node(4, 0.001, 0.0002);
    network.add_segment(1, 2, SegmentInput::default()).unwrap();
    network.add_segment(3, 4, SegmentInput::default()).unwrap();
    // ~11 m from each street, far from the other edges' reach
    let points = [PointFeature::new(0.0001, 0.0005)];

    let (scored, report) =
        score_network(network, &points, &NoLandCover, &ScoringConfig::default()).unwrap();
    let counts: Vec<u32> = scored
        .graph()
        .edge_weights()
        .map(|edge| edge.scores.light_count)
        .collect();

    assert_eq!(counts, vec![1, 1]);
    assert_eq!(report.lit_edges, 2);
    assert_eq!(report.max_lights, 1);
    assert!(report.projected);
}

#[test]
fn lights_reduce_darkness_only_where_attributed() {
    let (scored, report) = score_network(
        common::grid_network(6),
        &common::grid_lights(6),
        &NoLandCover,
        &ScoringConfig::default(),
    )
    .unwrap();

    assert!(report.lit_edges > 0);
    assert!(report.lit_edges < report.edges);
    for edge in scored.graph().edge_weights() {
        let scores = &edge.scores;
        if scores.light_count == 0 {
            assert_eq!(scores.darkness_score, 1.0);
        } else {
            assert!(scores.darkness_score < 1.0 && scores.darkness_score > 0.0);
        }
        assert!((0.0..=1.0).contains(&scores.highway_risk));
        assert!(scores.safety_score.is_finite() && scores.safety_score >= 0.0);
        assert!(scores.optimized_weight >= edge.travel_time);
    }
}

#[test]
fn scoring_is_deterministic() {
    let score = || {
        let (scored, _) = score_network(
            common::grid_network(5),
            &common::grid_lights(5),
            &open_water(),
            &ScoringConfig::default(),
        )
        .unwrap();
        scored
            .graph()
            .edge_weights()
            .map(|edge| edge.scores.safety_score.to_bits())
            .collect::<Vec<_>>()
    };
    assert_eq!(score(), score());
}

#[test]
fn custom_weights_change_composite() {
    let mut config = ScoringConfig::default();
    config.weights.darkness = 0.0;
    let (network, _) =
        score_network(straight_street("motorway"), &[], &open_water(), &config).unwrap();
    let scores = &network.graph().edge_weights().next().unwrap().scores;
    assert!((scores.safety_score - 4.0).abs() < 1e-9);
}

#[test]
fn summary_reflects_scores() {
    let (scored, _) = score_network(
        common::grid_network(4),
        &[],
        &NoLandCover,
        &ScoringConfig::default(),
    )
    .unwrap();
    let summary = scored.summary();
    assert_eq!(summary.nodes, 16);
    assert_eq!(summary.edges, 48);
    assert_eq!(summary.lit_edges, 0);
    assert!(summary.max_safety >= summary.mean_safety);
    assert!(summary.total_length_m > 0.0);
}

#[test]
fn negative_weights_are_rejected() {
    let mut config = ScoringConfig::default();
    config.weights.highway = -100.0;

    let result = score_network(straight_street("residential"), &[], &NoLandCover, &config);
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
}

#[test]
fn non_finite_density_scale_is_rejected() {
    let config = ScoringConfig {
        density_scale: f64::NAN,
        ..ScoringConfig::default()
    };
    let result = score_network(straight_street("residential"), &[], &NoLandCover, &config);
    assert!(matches!(result, Err(Error::InvalidConfig(_))));
}

#[test]
fn unusable_segment_geometry_is_reported() {
    let mut network = StreetNetwork::new();
    network.add_node(1, 0.0, 0.0);
    network.add_node(2, 0.001, 0.0);
    network.add_segment(1, 2, SegmentInput::default()).unwrap();
    network
        .add_segment(
            2,
            1,
            SegmentInput::default()
                .with_length(111.0)
                .with_geometry(LineString::new(vec![
                    coord! { x: 0.001, y: 0.0 },
                    coord! { x: f64::NAN, y: 0.0 },
                    coord! { x: 0.0, y: 0.0 },
                ])),
        )
        .unwrap();
    let points = [PointFeature::new(0.00005, 0.0005)];

    let (scored, report) =
        score_network(network, &points, &NoLandCover, &ScoringConfig::default()).unwrap();
    let counts: Vec<u32> = scored
        .graph()
        .edge_weights()
        .map(|edge| edge.scores.light_count)
        .collect();

    assert_eq!(report.skipped_segments, 1);
    assert!(!report.attribution_degraded);
    assert_eq!(counts, vec![1, 0]);
}

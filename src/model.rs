use std::path::PathBuf;

use saferoute_core::prelude::*;
use saferoute_core::NetworkSummary;

use crate::config::AppConfig;
use crate::error::AppError;

/// Loads and scores a street network
///
/// Land cover acquisition is outside this tool, so every edge gets the
/// neutral land risk.
pub fn load_scored_network(
    network_path: PathBuf,
    points_path: Option<PathBuf>,
    config: &AppConfig,
) -> Result<(ScoredNetwork, ScoringReport), AppError> {
    let mut build_config =
        NetworkBuildConfig::new(network_path).with_scoring(config.scoring.clone());
    if let Some(points_path) = points_path {
        build_config = build_config.with_points(points_path);
    }

    let (network, report) = build_scored_network(&build_config, &NoLandCover)?;
    let summary: NetworkSummary = network.summary();
    tracing::info!(
        nodes = summary.nodes,
        edges = summary.edges,
        lit_edges = summary.lit_edges,
        mean_safety = summary.mean_safety,
        max_safety = summary.max_safety,
        "Scored street network"
    );
    Ok((network, report))
}

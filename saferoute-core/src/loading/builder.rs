use log::{info, warn};

use super::config::NetworkBuildConfig;
use super::geojson::load_network_geojson;
use super::points::load_points;
use crate::model::ScoredNetwork;
use crate::scoring::{LandCoverSource, ScoringReport, score_network};
use crate::Error;

/// Loads a street network and scores it
///
/// Point features that cannot be loaded are reported and treated as absent,
/// so the network is still scored with every edge dark.
///
/// # Errors
///
/// Returns an error if the configuration is invalid or the street network
/// cannot be read.
pub fn build_scored_network(
    config: &NetworkBuildConfig,
    land_cover: &dyn LandCoverSource,
) -> Result<(ScoredNetwork, ScoringReport), Error> {
    validate_config(config)?;

    info!("Loading street network: {}", config.network_path.display());
    let import = load_network_geojson(&config.network_path)?;
    if import.network.edge_count() == 0 {
        warn!("Street network has no edges");
    }

    let points = match &config.points_path {
        Some(path) => load_points(path).unwrap_or_else(|e| {
            warn!("Point features unavailable ({e}); continuing without lights");
            Vec::new()
        }),
        None => Vec::new(),
    };

    let (network, report) = score_network(import.network, &points, land_cover, &config.scoring)?;
    drop(points);
    info!("Scored network created successfully");

    // Parsing and the attribution index allocate a lot of short-lived
    // memory that the allocator keeps around. Hand the free tail of the
    // heap back to the system.
    //
    // # Safety
    //
    // Only compiled for linux with glibc, where `malloc_trim` is available.
    #[cfg(all(target_os = "linux", target_env = "gnu"))]
    unsafe {
        if libc::malloc_trim(0) == 0 {
            log::debug!("No memory released by malloc_trim");
        } else {
            log::debug!("Successfully trimmed unused heap memory");
        }
    }

    Ok((network, report))
}

fn validate_config(config: &NetworkBuildConfig) -> Result<(), Error> {
    if !config.network_path.exists() {
        return Err(Error::InvalidData(format!(
            "Street network file not found: {}",
            config.network_path.display()
        )));
    }

    config
        .scoring
        .validate()
        .map_err(Error::InvalidConfig)
}

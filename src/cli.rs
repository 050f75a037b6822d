use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use saferoute_core::SafetyAlpha;
use serde::Serialize;
use serde_json::json;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::model::load_scored_network;
use crate::routing::{parse_coordinate, route_between, routes_to_geojson};

#[derive(Parser)]
#[command(name = "saferoute")]
#[command(about = "Street danger scoring and fastest/safest routing", long_about = None)]
#[command(version)]
pub struct Cli {
    /// TOML file with a `[scoring]` table
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Score every street of a network and write it as GeoJSON
    Score {
        /// GeoJSON street network (edges with `u`/`v` properties)
        #[arg(long)]
        network: PathBuf,
        /// Street light locations (.csv with lat,lon columns or .json)
        #[arg(long)]
        points: Option<PathBuf>,
        /// Scored network output
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Compute the fastest and the safety-weighted route
    Route {
        #[arg(long)]
        network: PathBuf,
        #[arg(long)]
        points: Option<PathBuf>,
        /// Start coordinate (lat,lon)
        #[arg(long, allow_hyphen_values = true)]
        from: String,
        /// End coordinate (lat,lon)
        #[arg(long, allow_hyphen_values = true)]
        to: String,
        /// Trade-off between time (0) and safety (1)
        #[arg(long, default_value_t = 0.5)]
        alpha: f64,
        /// Write both routes as GeoJSON features
        #[arg(long)]
        geojson: Option<PathBuf>,
    },
}

impl Cli {
    pub fn run(self) -> Result<(), AppError> {
        let config = AppConfig::load(self.config.as_deref())?;

        match self.command {
            Command::Score {
                network,
                points,
                output,
            } => {
                let (scored, report) = load_scored_network(network, points, &config)?;
                write_file(&output, &scored.to_geojson_string()?)?;
                tracing::info!("Wrote scored network to {}", output.display());

                print_json(&json!({
                    "report": report,
                    "summary": scored.summary(),
                }))
            }
            Command::Route {
                network,
                points,
                from,
                to,
                alpha,
                geojson,
            } => {
                let alpha = SafetyAlpha::new(alpha)?;
                let from = parse_coordinate(&from)?;
                let to = parse_coordinate(&to)?;

                let (scored, _) = load_scored_network(network, points, &config)?;
                let (routes, report) = route_between(&scored, &from, &to, alpha)?;

                if let Some(path) = geojson {
                    let collection = routes_to_geojson(&routes, &scored)?;
                    write_file(&path, &serde_json::to_string(&collection)?)?;
                    tracing::info!("Wrote routes to {}", path.display());
                }
                print_json(&report)
            }
        }
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), AppError> {
    fs::write(path, contents).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn print_json(value: &impl Serialize) -> Result<(), AppError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

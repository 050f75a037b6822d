//! Loading of street networks and point features, and building of the
//! scored network from them.

mod builder;
mod config;
pub mod geojson;
pub mod points;

pub use builder::build_scored_network;
pub use config::NetworkBuildConfig;
pub use geojson::{NetworkImport, load_network_geojson, parse_network_geojson};
pub use points::{load_points, parse_points_json, read_points_csv};

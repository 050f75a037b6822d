//! Command-line front-end for the `saferoute_core` scoring and routing engine.

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod routing;

pub use cli::{Cli, Command};
pub use config::AppConfig;
pub use error::AppError;

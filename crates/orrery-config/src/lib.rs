//! Configuration for the orrery shell.
//!
//! Settings persist to disk as `config.ron`. Every section is
//! `#[serde(default)]`, so old or partial files keep loading as fields are
//! added. Command-line flags override the loaded values.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CatalogConfig, ClockConfig, Config, DebugConfig, DisplayConfig, SimulationConfig,
};
pub use error::ConfigError;

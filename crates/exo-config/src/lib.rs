//! Configuration for the exoplanet viewer.
//!
//! Settings persist to disk as a RON file in the platform config directory.
//! Every section uses `#[serde(default)]`, so partially written files keep
//! loading as new settings are added. CLI flags override the loaded values.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CatalogConfig, Config, DebugConfig, InputConfig, RenderConfig, ViewerConfig, WindowConfig,
};
pub use error::ConfigError;

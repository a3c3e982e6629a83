//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Exoplanet viewer command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "exoplanet-viewer", about = "3D viewer for exoplanet catalog data")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Start in fullscreen.
    #[arg(long)]
    pub fullscreen: Option<bool>,

    /// Database location (http(s) URL, file: URI, or path).
    #[arg(long)]
    pub database_url: Option<String>,

    /// Maximum number of planets to load.
    #[arg(long)]
    pub max_records: Option<u32>,

    /// Seed for planet colours and starting phases.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(fs) = args.fullscreen {
            self.window.fullscreen = fs;
        }
        if let Some(ref url) = args.database_url {
            self.catalog.database_url = url.clone();
        }
        if let Some(max) = args.max_records {
            self.catalog.max_records = max;
        }
        if let Some(seed) = args.seed {
            self.viewer.seed = Some(seed);
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            width: Some(1920),
            database_url: Some("https://example.org/exoplanets.db".to_string()),
            seed: Some(99),
            ..Default::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.window.width, 1920);
        assert_eq!(
            config.catalog.database_url,
            "https://example.org/exoplanets.db"
        );
        assert_eq!(config.viewer.seed, Some(99));
        // Non-overridden fields retain defaults
        assert_eq!(config.window.height, 720);
        assert_eq!(config.catalog.max_records, 500);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from([
            "exoplanet-viewer",
            "--max-records",
            "20",
            "--log-level",
            "debug",
        ]);
        assert_eq!(args.max_records, Some(20));
        assert_eq!(args.log_level.as_deref(), Some("debug"));
        assert!(args.database_url.is_none());
    }
}

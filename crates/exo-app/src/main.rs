//! The binary entry point for the exoplanet viewer.

use clap::Parser;
use exo_app::platform::PlatformDirs;
use exo_config::{CliArgs, Config};

fn main() {
    let args = CliArgs::parse();

    let dirs = match PlatformDirs::resolve_and_create(args.config.as_deref()) {
        Ok(dirs) => dirs,
        Err(e) => {
            eprintln!("Failed to initialize platform directories: {e}");
            std::process::exit(1);
        }
    };

    let mut config = Config::load_or_create(&dirs.config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config, using defaults: {e}");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    exo_log::init_logging(Some(&dirs.log_dir), cfg!(debug_assertions), Some(&config));
    tracing::info!(
        config_dir = %dirs.config_dir.display(),
        database = %config.catalog.database_url,
        "Starting exoplanet viewer"
    );

    if let Err(e) = exo_app::window::run(config) {
        tracing::error!("Event loop failed: {e}");
        std::process::exit(1);
    }
}

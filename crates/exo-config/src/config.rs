//! Configuration structs with defaults and RON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level viewer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub window: WindowConfig,
    pub render: RenderConfig,
    /// Where the exoplanet database comes from and how much of it to read.
    pub catalog: CatalogConfig,
    /// Orbit layout and camera behaviour.
    pub viewer: ViewerConfig,
    pub input: InputConfig,
    pub debug: DebugConfig,
}

/// Window configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WindowConfig {
    /// Window width in logical pixels.
    pub width: u32,
    /// Window height in logical pixels.
    pub height: u32,
    /// Start in borderless fullscreen.
    pub fullscreen: bool,
    /// Enable vsync (PresentMode::Fifo).
    pub vsync: bool,
    pub title: String,
}

/// Rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Number of backdrop stars.
    pub star_count: u32,
    /// Seed for the backdrop star field.
    pub star_seed: u64,
    /// Icosphere subdivision level used for every body.
    pub sphere_subdivisions: u32,
    /// Luminance above which pixels contribute to bloom.
    pub bloom_threshold: f32,
    /// Width of the soft transition around the bloom threshold (0 = hard cut).
    pub bloom_soft_knee: f32,
    pub bloom_intensity: f32,
    /// Number of downsample/upsample mip levels.
    pub bloom_iterations: u32,
    pub bloom_radius: f32,
}

/// Data source configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogConfig {
    /// `http://` / `https://` URL, `file:` URI, or plain path to a SQLite file.
    pub database_url: String,
    /// Table holding one row per planet.
    pub table: String,
    /// Upper bound on the number of rows loaded.
    pub max_records: u32,
    /// Network request timeout in seconds.
    pub timeout_seconds: u32,
}

/// Orbit layout and camera transition settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    /// Orbit radius of the first planet.
    pub orbit_base_radius: f32,
    /// Added orbit radius per planet index.
    pub orbit_spacing: f32,
    /// Multiplier applied to frame time before advancing orbits.
    pub time_scale: f32,
    /// Fraction of the remaining distance the camera closes per frame.
    pub damping: f32,
    /// Distance below which a camera transition is considered settled.
    pub settle_threshold: f32,
    /// Camera distance from a selected planet, in multiples of its radius.
    pub standoff_factor: f32,
    /// Camera distance from the origin when nothing is selected.
    pub home_distance: f32,
    /// Fixed seed for planet colours and phases. `None` draws from entropy.
    pub seed: Option<u64>,
}

/// Input configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InputConfig {
    /// Mouse sensitivity multiplier for orbit rotation.
    pub mouse_sensitivity: f32,
    /// Zoom speed multiplier for the scroll wheel.
    pub zoom_speed: f32,
    /// Invert Y axis for camera rotation.
    pub invert_y: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Show frame-rate overlay.
    pub show_fps: bool,
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
            title: "Exoplanet Viewer".to_string(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            star_count: 2000,
            star_seed: 42,
            sphere_subdivisions: 3,
            bloom_threshold: 0.8,
            bloom_soft_knee: 0.5,
            bloom_intensity: 0.3,
            bloom_iterations: 5,
            bloom_radius: 1.0,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            database_url: "file:exoplanets.db".to_string(),
            table: "exoplanets".to_string(),
            max_records: 500,
            timeout_seconds: 30,
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            orbit_base_radius: 5.0,
            orbit_spacing: 2.0,
            time_scale: 1.0,
            damping: 0.1,
            settle_threshold: 0.01,
            standoff_factor: 5.0,
            home_distance: 20.0,
            seed: None,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 1.0,
            zoom_speed: 1.0,
            invert_y: false,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            show_fps: false,
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::io(&config_path))?;
            let config: Config = ron::from_str(&contents).map_err(|source| ConfigError::Parse {
                path: config_path.clone(),
                source,
            })?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::io(config_dir))?;

        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);
        let serialized = ron::ser::to_string_pretty(self, pretty)?;

        let config_path = config_dir.join(CONFIG_FILE);
        std::fs::write(&config_path, serialized).map_err(ConfigError::io(&config_path))
    }
}

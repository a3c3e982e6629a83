//! Orbit model for the exoplanet viewer.
//!
//! Each planet is placed on a circular orbit in the XZ plane. Its angular
//! speed is a closed-form mapping of the catalog orbital period: short
//! periods spin fast, long periods slow, on a log scale. Radii are a display
//! policy, not physics.

mod body;
mod layout;
mod motion;

pub use body::{CentralBody, OrbitingBody};
pub use layout::{OrbitLayout, body_rng};
pub use motion::{
    DEFAULT_DISPLAY_RADIUS, DEFAULT_PERIOD_DAYS, MAX_ANGULAR_SPEED, MAX_PERIOD_DAYS,
    MIN_ANGULAR_SPEED, MIN_PERIOD_DAYS, angular_speed, display_radius, effective_period,
};

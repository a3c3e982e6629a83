//! Exoplanet viewer application.
//!
//! Window and event loop, frame timing, pointer input, per-frame scene
//! composition and the imgui overlay.

pub mod frame_clock;
pub mod input;
pub mod overlay;
pub mod platform;
pub mod scene;
pub mod window;

//! Variable-rate frame clock.
//!
//! The viewer has no fixed-rate simulation: every frame advances orbits and
//! camera easing by the measured elapsed time. Stalls (window drags, a
//! debugger pause, a slow first frame) are clamped so bodies do not jump.

use std::time::Instant;
use tracing::warn;

/// Longest frame the scene will advance by, in seconds.
pub const MAX_FRAME_TIME: f32 = 0.25;

/// Weight of the newest frame in the smoothed FPS readout.
const FPS_SMOOTHING: f32 = 0.1;

/// Clamp a measured frame time into `[0, MAX_FRAME_TIME]`.
///
/// Non-finite input counts as an empty frame.
pub fn clamp_frame_time(frame_time: f32) -> f32 {
    if frame_time.is_finite() {
        frame_time.clamp(0.0, MAX_FRAME_TIME)
    } else {
        0.0
    }
}

pub struct FrameClock {
    previous_time: Instant,
    fps: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            previous_time: Instant::now(),
            fps: 0.0,
        }
    }

    /// Measure the time since the last tick and return it, clamped.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let frame_time = now.duration_since(self.previous_time).as_secs_f32();
        self.previous_time = now;

        if frame_time > MAX_FRAME_TIME {
            warn!(
                "Frame time {:.1}ms exceeds maximum, clamping to {:.1}ms",
                frame_time * 1000.0,
                MAX_FRAME_TIME * 1000.0
            );
        }
        self.record(frame_time)
    }

    /// Restart timing from now, so the next tick does not include setup time.
    pub fn reset(&mut self) {
        self.previous_time = Instant::now();
    }

    fn record(&mut self, frame_time: f32) -> f32 {
        let dt = clamp_frame_time(frame_time);
        if dt > 0.0 {
            let instant_fps = 1.0 / dt;
            self.fps = if self.fps == 0.0 {
                instant_fps
            } else {
                self.fps + (instant_fps - self.fps) * FPS_SMOOTHING
            };
        }
        dt
    }

    /// Exponentially smoothed frames per second.
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

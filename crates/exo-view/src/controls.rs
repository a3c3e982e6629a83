//! Mouse-driven orbit, pan and zoom around the look target.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::rig::CameraRig;

const MIN_POLAR: f32 = 1e-3;
const MAX_POLAR: f32 = PI - 1e-3;
/// Per-notch zoom factor at `zoom_speed = 1`.
const ZOOM_STEP: f32 = 0.95;
/// Rig changes smaller than this are treated as at rest.
const REST_EPSILON: f32 = 1e-6;

/// Damped orbit controls.
///
/// Input accumulates into pending deltas; each [`OrbitControls::update`]
/// applies a `damping` fraction of what is pending and keeps the rest, so a
/// flick keeps gliding for a few frames after the mouse stops.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub damping: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub invert_y: bool,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Pending (azimuth, polar) rotation in radians.
    pending_rotation: Vec2,
    pending_pan: Vec3,
    pending_zoom: f32,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            damping: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            invert_y: false,
            min_distance: 0.5,
            max_distance: 500.0,
            pending_rotation: Vec2::ZERO,
            pending_pan: Vec3::ZERO,
            pending_zoom: 1.0,
        }
    }
}

impl OrbitControls {
    pub fn new(rotate_speed: f32, zoom_speed: f32, invert_y: bool) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            invert_y,
            ..Default::default()
        }
    }

    /// Queue a rotation for a pointer drag of `delta` pixels.
    ///
    /// Dragging the full viewport height turns one full revolution.
    pub fn rotate(&mut self, delta: Vec2, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        let dy = if self.invert_y { -delta.y } else { delta.y };
        self.pending_rotation.x -= TAU * delta.x / height * self.rotate_speed;
        self.pending_rotation.y -= TAU * dy / height * self.rotate_speed;
    }

    /// Queue a screen-space pan for a drag of `delta` pixels.
    ///
    /// Scaled so the point under the cursor at target depth follows it.
    pub fn pan(&mut self, rig: &CameraRig, delta: Vec2, viewport_height: f32, fov_y: f32) {
        let height = viewport_height.max(1.0);
        let target_distance = rig.distance() * (fov_y * 0.5).tan();
        let (_, right, up) = rig.basis();
        let scale = 2.0 * target_distance / height;
        self.pending_pan += -right * delta.x * scale + up * delta.y * scale;
    }

    /// Queue a zoom for `notches` of scroll. Positive moves closer.
    pub fn zoom(&mut self, notches: f32) {
        self.pending_zoom *= ZOOM_STEP.powf(notches * self.zoom_speed);
    }

    /// Drop all pending motion.
    pub fn stop(&mut self) {
        self.pending_rotation = Vec2::ZERO;
        self.pending_pan = Vec3::ZERO;
        self.pending_zoom = 1.0;
    }

    pub fn is_at_rest(&self) -> bool {
        self.pending_rotation.length_squared() < REST_EPSILON * REST_EPSILON
            && self.pending_pan.length_squared() < REST_EPSILON * REST_EPSILON
            && (self.pending_zoom - 1.0).abs() < REST_EPSILON
    }

    /// Apply one frame of pending motion to `rig`. Returns `true` if it moved.
    pub fn update(&mut self, rig: &mut CameraRig) -> bool {
        if self.is_at_rest() {
            self.stop();
            return false;
        }

        let offset = rig.eye - rig.target;
        let radius = offset.length().max(f32::EPSILON);
        let mut azimuth = offset.x.atan2(offset.z);
        let mut polar = (offset.y / radius).clamp(-1.0, 1.0).acos();

        let step = self.damping;
        azimuth += self.pending_rotation.x * step;
        polar = (polar + self.pending_rotation.y * step).clamp(MIN_POLAR, MAX_POLAR);
        let radius = (radius * self.pending_zoom).clamp(self.min_distance, self.max_distance);
        rig.target += self.pending_pan * step;

        rig.eye = rig.target
            + Vec3::new(
                radius * polar.sin() * azimuth.sin(),
                radius * polar.cos(),
                radius * polar.sin() * azimuth.cos(),
            );

        self.pending_rotation *= 1.0 - step;
        self.pending_pan *= 1.0 - step;
        self.pending_zoom = 1.0;
        true
    }
}

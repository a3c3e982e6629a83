use glam::{Mat4, Vec3};

/// The camera's eye and the point it looks at.
///
/// Both [`crate::CameraController`] and [`crate::OrbitControls`] move these
/// two points; the renderer derives its view matrix from them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRig {
    pub eye: Vec3,
    pub target: Vec3,
}

impl CameraRig {
    pub fn new(eye: Vec3, target: Vec3) -> Self {
        Self { eye, target }
    }

    /// Eye on the +Z axis `distance` from the origin, looking at the origin.
    pub fn home(distance: f32) -> Self {
        Self::new(Vec3::new(0.0, 0.0, distance), Vec3::ZERO)
    }

    pub fn distance(&self) -> f32 {
        self.eye.distance(self.target)
    }

    /// Right-handed view matrix with +Y up.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    /// Unit vectors `(forward, right, up)` for the current view.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let forward = (self.target - self.eye).try_normalize().unwrap_or(Vec3::NEG_Z);
        let right = forward.cross(Vec3::Y).try_normalize().unwrap_or(Vec3::X);
        let up = right.cross(forward);
        (forward, right, up)
    }
}

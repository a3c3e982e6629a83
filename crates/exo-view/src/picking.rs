//! Cursor rays and ray-sphere picking.

use glam::{Mat4, Vec2, Vec3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit length.
    pub direction: Vec3,
}

impl Ray {
    /// Ray from `eye` through a cursor position in physical pixels, origin top-left.
    ///
    /// Any depth on the cursor's line unprojects to a point on the ray, so
    /// this holds for standard and reversed depth alike.
    pub fn from_cursor(
        cursor: Vec2,
        viewport: Vec2,
        eye: Vec3,
        inverse_view_proj: Mat4,
    ) -> Option<Self> {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return None;
        }
        let ndc = Vec2::new(
            2.0 * cursor.x / viewport.x - 1.0,
            1.0 - 2.0 * cursor.y / viewport.y,
        );
        let through = inverse_view_proj.project_point3(ndc.extend(0.5));
        let direction = (through - eye).try_normalize()?;
        Some(Self {
            origin: eye,
            direction,
        })
    }

    /// Distance along the ray to the first hit on a sphere, if any.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrt_d = discriminant.sqrt();
        let near = -b - sqrt_d;
        let far = -b + sqrt_d;
        if near >= 0.0 {
            Some(near)
        } else if far >= 0.0 {
            Some(far)
        } else {
            None
        }
    }
}

/// Index of the closest sphere hit by `ray`.
pub fn pick_sphere(ray: &Ray, spheres: impl IntoIterator<Item = (Vec3, f32)>) -> Option<usize> {
    spheres
        .into_iter()
        .enumerate()
        .filter_map(|(i, (center, radius))| ray.intersect_sphere(center, radius).map(|t| (i, t)))
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

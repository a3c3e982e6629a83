//! Renderable bodies: the fixed central body and the orbiting planets.

use glam::Vec3;

use crate::motion;

/// Gap between a body's surface and its name label.
const LABEL_GAP: f32 = 0.5;

/// The fixed reference body at the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct CentralBody {
    pub name: &'static str,
    pub radius: f32,
    pub color: [f32; 3],
}

impl CentralBody {
    /// Earth, the frame of reference every catalog radius is measured in.
    pub const EARTH: Self = Self {
        name: "Earth",
        radius: 1.0,
        // sRGB #008000 in linear space.
        color: [0.0, 0.215_860_5, 0.0],
    };

    pub fn position(&self) -> Vec3 {
        Vec3::ZERO
    }

    pub fn label_anchor(&self) -> Vec3 {
        Vec3::new(0.0, self.radius + LABEL_GAP, 0.0)
    }
}

/// A planet on a circular orbit around the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitingBody {
    /// Index of the catalog record this body renders.
    pub record_index: usize,
    /// Phase angle in radians. Only ever increases.
    pub phase: f64,
    /// Radians per time unit.
    pub angular_speed: f64,
    pub orbit_radius: f32,
    pub display_radius: f32,
    /// Linear RGB in `[0, 1]`.
    pub color: [f32; 3],
}

impl OrbitingBody {
    /// Body for a record's period and radius, starting at `phase`.
    pub fn new(
        record_index: usize,
        period_days: Option<f64>,
        radius_earth_radii: Option<f64>,
        orbit_radius: f32,
        phase: f64,
        color: [f32; 3],
    ) -> Self {
        Self {
            record_index,
            phase,
            angular_speed: motion::angular_speed(period_days),
            orbit_radius,
            display_radius: motion::display_radius(radius_earth_radii) as f32,
            color,
        }
    }

    /// Advance the phase by `elapsed` time units. Negative input is ignored.
    pub fn advance(&mut self, elapsed: f64) {
        if elapsed > 0.0 {
            self.phase += self.angular_speed * elapsed;
        }
    }

    /// Current centre in world space.
    pub fn position(&self) -> Vec3 {
        let (sin, cos) = self.phase.sin_cos();
        Vec3::new(
            self.orbit_radius * cos as f32,
            0.0,
            self.orbit_radius * sin as f32,
        )
    }

    /// Where the name label sits, just above the sphere.
    pub fn label_anchor(&self) -> Vec3 {
        self.position() + Vec3::new(0.0, self.display_radius + LABEL_GAP, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(phase: f64) -> OrbitingBody {
        OrbitingBody::new(0, Some(1.0), Some(2.0), 5.0, phase, [1.0; 3])
    }

    #[test]
    fn test_position_at_zero_phase() {
        let p = body(0.0).position();
        assert!((p - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn test_position_at_quarter_turn() {
        let p = body(std::f64::consts::FRAC_PI_2).position();
        assert!((p - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-5);
    }

    #[test]
    fn test_orbit_stays_on_circle_in_xz_plane() {
        let mut b = body(1.3);
        for _ in 0..200 {
            b.advance(7.0);
            let p = b.position();
            assert_eq!(p.y, 0.0);
            assert!((p.length() - 5.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_advance_uses_angular_speed() {
        let mut b = body(0.0);
        b.advance(10.0);
        assert!((b.phase - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_phase_is_monotonic() {
        let mut b = body(6.0);
        let before = b.phase;
        b.advance(-3.0);
        assert_eq!(b.phase, before);
        b.advance(100.0);
        assert!(b.phase > before);
    }

    #[test]
    fn test_defaults_applied_on_construction() {
        let b = OrbitingBody::new(3, None, None, 11.0, 0.0, [0.2; 3]);
        assert_eq!(b.display_radius, 0.5);
        assert_eq!(b.angular_speed, motion::angular_speed(Some(365.0)));
        assert!(b.display_radius > 0.0 && b.angular_speed > 0.0);
    }

    #[test]
    fn test_label_anchor_above_sphere() {
        let b = body(0.0);
        assert!((b.label_anchor() - Vec3::new(5.0, 1.5, 0.0)).length() < 1e-6);
        assert_eq!(CentralBody::EARTH.label_anchor(), Vec3::new(0.0, 1.5, 0.0));
    }

    #[test]
    fn test_earth_colour_is_linear_green() {
        let srgb = 128.0_f32 / 255.0;
        let linear = ((srgb + 0.055) / 1.055).powf(2.4);
        let [r, g, b] = CentralBody::EARTH.color;
        assert_eq!((r, b), (0.0, 0.0));
        assert!((g - linear).abs() < 1e-5, "g = {g}, expected {linear}");
    }
}

//! Procedural star backdrop.
//!
//! Stars are scattered uniformly over the sky from a fixed seed, so the same
//! config always yields the same sky. They are drawn as tiny unlit spheres on
//! a shell that travels with the camera.

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::body_pipeline::BodyInstance;

/// Distance of the star shell from the camera. Inside the far plane.
pub const SHELL_DISTANCE: f32 = 600.0;

#[derive(Clone, Debug, PartialEq)]
pub struct Star {
    /// Unit direction on the sky.
    pub direction: Vec3,
    /// In [0, 1]. Power-law distributed: many dim, few bright.
    pub brightness: f32,
    pub color: [f32; 3],
    /// Apparent radius in radians.
    pub angular_radius: f32,
}

impl Star {
    /// Instance on the camera-relative shell. Bright stars exceed 1.0 so they bloom.
    pub fn to_instance(&self) -> BodyInstance {
        let intensity = 0.3 + self.brightness * 2.5;
        BodyInstance::backdrop(
            self.direction * SHELL_DISTANCE,
            self.angular_radius * SHELL_DISTANCE,
            self.color.map(|c| c * intensity),
        )
    }
}

pub struct StarfieldGenerator {
    seed: u64,
    star_count: u32,
}

impl StarfieldGenerator {
    pub fn new(seed: u64, star_count: u32) -> Self {
        Self { seed, star_count }
    }

    pub fn generate(&self) -> Vec<Star> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        (0..self.star_count)
            .map(|_| {
                let theta = rng.random::<f32>() * std::f32::consts::TAU;
                let phi = (1.0 - 2.0 * rng.random::<f32>()).acos();
                let direction =
                    Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());

                let brightness = rng.random::<f32>().powf(4.0);
                Star {
                    direction,
                    brightness,
                    color: blackbody_to_rgb(3000.0 + brightness * 27000.0),
                    angular_radius: 0.0012 + brightness * 0.0025,
                }
            })
            .collect()
    }

    pub fn instances(&self) -> Vec<BodyInstance> {
        self.generate().iter().map(Star::to_instance).collect()
    }
}

/// Approximate RGB for a blackbody temperature in Kelvin (Tanner Helland fit).
pub fn blackbody_to_rgb(temperature_k: f32) -> [f32; 3] {
    let t = temperature_k / 100.0;
    let r = if t <= 66.0 {
        1.0
    } else {
        (329.698_73 * (t - 60.0).powf(-0.133_204_76) / 255.0).clamp(0.0, 1.0)
    };
    let g = if t <= 66.0 {
        (99.470_8 * t.ln() - 161.119_57).clamp(0.0, 255.0) / 255.0
    } else {
        (288.122_17 * (t - 60.0).powf(-0.075_514_85) / 255.0).clamp(0.0, 1.0)
    };
    let b = if t >= 66.0 {
        1.0
    } else if t <= 19.0 {
        0.0
    } else {
        (138.517_73 * (t - 10.0).ln() - 305.044_8).clamp(0.0, 255.0) / 255.0
    };
    [r, g, b]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_count() {
        assert_eq!(StarfieldGenerator::new(42, 2000).generate().len(), 2000);
        assert!(StarfieldGenerator::new(42, 0).generate().is_empty());
    }

    #[test]
    fn test_same_seed_same_sky() {
        let a = StarfieldGenerator::new(7, 100).generate();
        let b = StarfieldGenerator::new(7, 100).generate();
        let c = StarfieldGenerator::new(8, 100).generate();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_directions_are_unit_and_cover_both_hemispheres() {
        let stars = StarfieldGenerator::new(1, 1000).generate();
        assert!(stars.iter().all(|s| (s.direction.length() - 1.0).abs() < 1e-4));
        let above = stars.iter().filter(|s| s.direction.y > 0.0).count();
        assert!(above > 400 && above < 600, "{above} of 1000 above the horizon");
    }

    #[test]
    fn test_brightness_skews_dim() {
        let stars = StarfieldGenerator::new(3, 1000).generate();
        let bright = stars.iter().filter(|s| s.brightness > 0.5).count();
        assert!(bright < 200);
        assert!(stars.iter().all(|s| (0.0..=1.0).contains(&s.brightness)));
    }

    #[test]
    fn test_instances_sit_on_camera_relative_shell() {
        let instances = StarfieldGenerator::new(9, 50).instances();
        for star in &instances {
            assert!((star.center().length() - SHELL_DISTANCE).abs() < 0.1);
            assert_eq!(star.params[2], 1.0);
            assert!(star.radius() > 0.0);
        }
    }

    #[test]
    fn test_blackbody_extremes() {
        let cool = blackbody_to_rgb(3000.0);
        let hot = blackbody_to_rgb(30000.0);
        assert!(cool[0] > cool[2]);
        assert!(hot[2] >= hot[0]);
    }
}

//! Orbit radius spacing and random per-body appearance.

use std::f64::consts::TAU;

use exo_catalog::PlanetRecord;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::body::OrbitingBody;

/// Random source for body colours and starting phases.
///
/// A fixed seed gives a reproducible scene; `None` seeds from the thread RNG.
pub fn body_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_rng(&mut rand::rng()),
    }
}

/// Concentric, evenly spaced orbits: `base + index * spacing`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitLayout {
    pub base_radius: f32,
    pub spacing: f32,
}

impl Default for OrbitLayout {
    fn default() -> Self {
        Self {
            base_radius: 5.0,
            spacing: 2.0,
        }
    }
}

impl OrbitLayout {
    pub fn new(base_radius: f32, spacing: f32) -> Self {
        Self {
            base_radius,
            spacing,
        }
    }

    pub fn orbit_radius(&self, index: usize) -> f32 {
        self.base_radius + index as f32 * self.spacing
    }

    /// One body per record, in record order.
    pub fn build_bodies<R: Rng>(&self, records: &[PlanetRecord], rng: &mut R) -> Vec<OrbitingBody> {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let phase = rng.random_range(0.0..TAU);
                let color = [rng.random::<f32>(), rng.random::<f32>(), rng.random::<f32>()];
                OrbitingBody::new(
                    index,
                    record.orbital_period_days,
                    record.radius_earth_radii,
                    self.orbit_radius(index),
                    phase,
                    color,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(n: usize) -> Vec<PlanetRecord> {
        (0..n)
            .map(|i| PlanetRecord {
                orbital_period_days: Some(10.0 * (i + 1) as f64),
                radius_earth_radii: Some(i as f64),
                ..PlanetRecord::named(format!("planet-{i}"))
            })
            .collect()
    }

    #[test]
    fn test_orbit_radius_spacing() {
        let layout = OrbitLayout::default();
        assert_eq!(layout.orbit_radius(0), 5.0);
        assert_eq!(layout.orbit_radius(1), 7.0);
        assert_eq!(layout.orbit_radius(10), 25.0);
    }

    #[test]
    fn test_build_bodies_one_per_record() {
        let mut rng = body_rng(Some(1));
        let bodies = OrbitLayout::default().build_bodies(&records(4), &mut rng);
        assert_eq!(bodies.len(), 4);
        for (i, body) in bodies.iter().enumerate() {
            assert_eq!(body.record_index, i);
            assert!((0.0..TAU).contains(&body.phase));
            assert!(body.color.iter().all(|c| (0.0..1.0).contains(c)));
            assert!(body.display_radius > 0.0);
        }
        // Record 0 has radius 0, so it falls back to the default.
        assert_eq!(bodies[0].display_radius, 0.5);
        assert_eq!(bodies[2].display_radius, 1.0);
    }

    #[test]
    fn test_same_seed_same_scene() {
        let layout = OrbitLayout::default();
        let a = layout.build_bodies(&records(8), &mut body_rng(Some(42)));
        let b = layout.build_bodies(&records(8), &mut body_rng(Some(42)));
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seed_different_phases() {
        let layout = OrbitLayout::default();
        let a = layout.build_bodies(&records(8), &mut body_rng(Some(1)));
        let b = layout.build_bodies(&records(8), &mut body_rng(Some(2)));
        assert!(a.iter().zip(&b).any(|(x, y)| x.phase != y.phase));
    }

    #[test]
    fn test_empty_records_empty_scene() {
        let bodies = OrbitLayout::default().build_bodies(&[], &mut body_rng(None));
        assert!(bodies.is_empty());
    }
}

//! Asteroid belt generation.
//!
//! Two flat-ish bands of small rocks that circle the sun on fixed radii. Each
//! rock gets a random phase, radius, height and speed once at startup; only
//! the phase changes afterwards.

use std::f32::consts::TAU;
use std::ops::RangeInclusive;

use rand::Rng;

/// Per-rock orbital state. No parent, no spin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Asteroid {
    /// Radians, unwrapped.
    pub angle: f32,
    pub distance: f32,
    /// Fixed height above the ecliptic.
    pub vertical_offset: f32,
    pub speed_factor: f32,
}

/// Parameter ranges for one band.
#[derive(Debug, Clone, PartialEq)]
pub struct BeltSpec {
    pub name: &'static str,
    pub count: usize,
    pub distance: RangeInclusive<f32>,
    pub vertical_offset: RangeInclusive<f32>,
    pub speed_factor: RangeInclusive<f32>,
}

impl BeltSpec {
    /// Between Mars and Jupiter.
    pub fn inner() -> Self {
        Self {
            name: "inner belt",
            count: 800,
            distance: 45.0..=70.0,
            vertical_offset: -2.0..=2.0,
            speed_factor: 0.4..=0.8,
        }
    }

    /// Beyond Neptune.
    pub fn outer() -> Self {
        Self {
            name: "outer belt",
            count: 600,
            distance: 140.0..=180.0,
            vertical_offset: -3.0..=3.0,
            speed_factor: 0.1..=0.3,
        }
    }

    /// Roll `count` rocks.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Asteroid> {
        (0..self.count)
            .map(|_| Asteroid {
                angle: rng.gen_range(0.0..TAU),
                distance: rng.gen_range(self.distance.clone()),
                vertical_offset: rng.gen_range(self.vertical_offset.clone()),
                speed_factor: rng.gen_range(self.speed_factor.clone()),
            })
            .collect()
    }
}

/// Both default belts, inner first.
pub fn default_belts() -> [BeltSpec; 2] {
    [BeltSpec::inner(), BeltSpec::outer()]
}

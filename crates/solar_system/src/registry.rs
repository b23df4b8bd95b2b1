//! Static body parameters: sizes, orbit distances, speeds, rotation periods
//! and texture file names. Pure data.

/// Rotation periods are divided by this before converting to a per-frame
/// spin increment.
pub const TIME_SCALE: f32 = 500.0;

/// Period used for any name missing from [`ROTATION_PERIODS`].
pub const DEFAULT_ROTATION_PERIOD_HOURS: f32 = 24.0;

/// Sidereal rotation periods in hours. Negative = retrograde.
pub const ROTATION_PERIODS: &[(&str, f32)] = &[
    ("Mercury", 1407.6),
    ("Venus", -5832.5),
    ("Earth", 24.0),
    ("Mars", 24.6),
    ("Jupiter", 9.9),
    ("Saturn", 10.7),
    ("Uranus", -17.2),
    ("Neptune", 16.1),
    ("Moon", 655.7),
];

/// Rotation period for `name` (exact match), defaulting to 24 hours.
pub fn rotation_period(name: &str) -> f32 {
    ROTATION_PERIODS
        .iter()
        .find(|(body, _)| *body == name)
        .map(|&(_, hours)| hours)
        .unwrap_or(DEFAULT_ROTATION_PERIOD_HOURS)
}

/// Body-specific treatment attached right after the base planet is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanetExtras {
    None,
    /// Translucent atmosphere shell.
    Atmosphere,
    /// Night lights, specular oceans, cloud shell and a moon.
    EarthSystem,
    /// Flat ring annulus.
    Rings,
}

/// One row of the planet table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetSpec {
    pub name: &'static str,
    pub radius: f32,
    pub distance: f32,
    pub speed_factor: f32,
    pub texture: &'static str,
    /// Colour used if the texture cannot be loaded.
    pub fallback_color: [f32; 4],
}

impl PlanetSpec {
    /// Extras are selected by exact name.
    pub fn extras(&self) -> PlanetExtras {
        match self.name {
            "Venus" => PlanetExtras::Atmosphere,
            "Earth" => PlanetExtras::EarthSystem,
            "Saturn" => PlanetExtras::Rings,
            _ => PlanetExtras::None,
        }
    }
}

pub const PLANETS: [PlanetSpec; 8] = [
    PlanetSpec { name: "Mercury", radius: 1.0, distance: 18.0, speed_factor: 4.8, texture: "mercury.jpg", fallback_color: [0.55, 0.53, 0.5, 1.0] },
    PlanetSpec { name: "Venus", radius: 1.3, distance: 26.0, speed_factor: 3.8, texture: "venus.jpg", fallback_color: [0.9, 0.75, 0.5, 1.0] },
    PlanetSpec { name: "Earth", radius: 1.4, distance: 34.0, speed_factor: 3.2, texture: "earth_daymap.jpg", fallback_color: [0.2, 0.4, 0.8, 1.0] },
    PlanetSpec { name: "Mars", radius: 1.1, distance: 42.0, speed_factor: 2.6, texture: "mars.jpg", fallback_color: [0.75, 0.35, 0.2, 1.0] },
    PlanetSpec { name: "Jupiter", radius: 5.0, distance: 90.0, speed_factor: 1.5, texture: "jupiter.jpg", fallback_color: [0.8, 0.7, 0.55, 1.0] },
    PlanetSpec { name: "Saturn", radius: 4.5, distance: 110.0, speed_factor: 1.0, texture: "saturn.jpg", fallback_color: [0.85, 0.78, 0.6, 1.0] },
    PlanetSpec { name: "Uranus", radius: 3.0, distance: 130.0, speed_factor: 0.8, texture: "uranus.jpg", fallback_color: [0.6, 0.85, 0.9, 1.0] },
    PlanetSpec { name: "Neptune", radius: 2.7, distance: 150.0, speed_factor: 0.5, texture: "neptune.jpg", fallback_color: [0.3, 0.45, 0.9, 1.0] },
];

/// Earth's moon.
pub const MOON: PlanetSpec = PlanetSpec {
    name: "Moon",
    radius: 0.35,
    distance: 3.0,
    speed_factor: 5.0,
    texture: "moon.jpg",
    fallback_color: [0.7, 0.7, 0.7, 1.0],
};

pub const SUN_RADIUS: f32 = 12.0;
pub const SUN_TEXTURE: &str = "sun.jpg";
pub const SUN_FALLBACK_COLOR: [f32; 4] = [1.0, 0.85, 0.4, 1.0];
/// Radians per frame.
pub const SUN_SPIN_RATE: f32 = 0.001;

pub const BACKDROP_RADIUS: f32 = 2000.0;
pub const BACKDROP_TEXTURE: &str = "stars_milky_way.jpg";
/// Radians per frame.
pub const BACKDROP_SPIN_RATE: f32 = 0.00005;

pub const EARTH_NIGHT_TEXTURE: &str = "earth_nightmap.jpg";
pub const EARTH_CLOUDS_TEXTURE: &str = "earth_clouds.jpg";
pub const EARTH_SPECULAR_TEXTURE: &str = "earth_specular.tif";
pub const EARTH_NIGHT_EMISSIVE: f32 = 0.4;
pub const EARTH_SHININESS: f32 = 30.0;
pub const CLOUD_SCALE: f32 = 1.015;
pub const CLOUD_OPACITY: f32 = 0.6;

pub const VENUS_ATMOSPHERE_TEXTURE: &str = "venus_atmosphere.jpg";
pub const ATMOSPHERE_SCALE: f32 = 1.02;
pub const ATMOSPHERE_OPACITY: f32 = 0.5;

pub const SATURN_RING_TEXTURE: &str = "saturn_ring.png";
pub const RING_INNER_SCALE: f32 = 1.6;
pub const RING_OUTER_SCALE: f32 = 3.0;
pub const RING_OPACITY: f32 = 0.9;

/// Half width of each orbit guide annulus.
pub const ORBIT_GUIDE_HALF_WIDTH: f32 = 0.05;
/// 0x555555
pub const ORBIT_GUIDE_COLOR: [f32; 4] = [0.333, 0.333, 0.333, 1.0];

pub const ASTEROID_RADIUS: f32 = 0.15;
pub const ASTEROID_TEXTURE: &str = "asteroid.jpg";
pub const ASTEROID_FALLBACK_COLOR: [f32; 4] = [0.45, 0.42, 0.4, 1.0];

//! One-time construction of the solar system entities.

use std::f32::consts::TAU;

use engine_core::{Entity, Name, Spin, Transform, Vec3, World};
use rand::Rng;

use crate::asteroids::{default_belts, Asteroid};
use crate::components::{
    Appearance, Backdrop, CelestialBody, MaterialKind, MeshShape, Orbit, OrbitGuide, Overlay, OverlayKind, Sun,
};
use crate::kinematics::{spin_increment, OVERLAY_SPIN_RATE};
use crate::labels::Label;
use crate::registry::{self, PlanetExtras, PlanetSpec};

pub const PLANET_SEGMENTS: u32 = 64;
pub const MOON_SEGMENTS: u32 = 32;
pub const ASTEROID_SEGMENTS: u32 = 6;
pub const RING_SEGMENTS: u32 = 128;

/// Handles into the built world.
#[derive(Debug, Clone)]
pub struct Scene {
    pub sun: Entity,
    pub backdrop: Entity,
    /// Planets in table order, then the moon.
    pub bodies: Vec<Entity>,
    pub labels: Vec<Label>,
    pub asteroid_count: usize,
}

/// Spawn the backdrop, the sun, every planet with its guide, label and
/// extras, then both asteroid belts. Initial angles come from `rng`.
pub fn build_scene<R: Rng + ?Sized>(world: &mut World, rng: &mut R) -> Scene {
    let backdrop = world.spawn((
        Backdrop,
        Transform::from_position_scale(Vec3::ZERO, registry::BACKDROP_RADIUS),
        Spin::new(registry::BACKDROP_SPIN_RATE),
        Appearance::textured(
            MeshShape::Sphere { segments: PLANET_SEGMENTS },
            MaterialKind::Backdrop,
            registry::BACKDROP_TEXTURE,
            [0.02, 0.02, 0.04, 1.0],
        ),
    ));

    let sun = world.spawn((
        Sun,
        Name::new("Sun"),
        Transform::from_position_scale(Vec3::ZERO, registry::SUN_RADIUS),
        Spin::new(registry::SUN_SPIN_RATE),
        Appearance::textured(
            MeshShape::Sphere { segments: PLANET_SEGMENTS },
            MaterialKind::Unlit,
            registry::SUN_TEXTURE,
            registry::SUN_FALLBACK_COLOR,
        ),
    ));

    let mut scene = Scene {
        sun,
        backdrop,
        bodies: Vec::with_capacity(registry::PLANETS.len() + 1),
        labels: Vec::with_capacity(registry::PLANETS.len() + 1),
        asteroid_count: 0,
    };

    for spec in &registry::PLANETS {
        let planet = spawn_body(world, rng, spec, None, PLANET_SEGMENTS);
        scene.bodies.push(planet);

        world.spawn((
            OrbitGuide,
            Transform::default(),
            Appearance::flat(
                MeshShape::Annulus {
                    inner: spec.distance - registry::ORBIT_GUIDE_HALF_WIDTH,
                    outer: spec.distance + registry::ORBIT_GUIDE_HALF_WIDTH,
                    segments: RING_SEGMENTS,
                },
                MaterialKind::Unlit,
                registry::ORBIT_GUIDE_COLOR,
            ),
        ));

        scene.labels.push(Label::new(spec.name, planet));

        match spec.extras() {
            PlanetExtras::None => {}
            PlanetExtras::Atmosphere => add_atmosphere(world, planet, spec),
            PlanetExtras::EarthSystem => {
                let moon = add_earth_system(world, rng, planet, spec);
                scene.bodies.push(moon);
                scene.labels.push(Label::new(registry::MOON.name, moon));
            }
            PlanetExtras::Rings => add_rings(world, planet, spec),
        }
    }

    let asteroid_look = Appearance::textured(
        MeshShape::Sphere { segments: ASTEROID_SEGMENTS },
        MaterialKind::Lit,
        registry::ASTEROID_TEXTURE,
        registry::ASTEROID_FALLBACK_COLOR,
    );
    for belt in default_belts() {
        let rocks = belt.generate(rng);
        log::debug!("Generated {} rocks for the {}", rocks.len(), belt.name);
        scene.asteroid_count += rocks.len();
        world.spawn_batch(rocks.into_iter().map(|rock| (rock, asteroid_transform(&rock), asteroid_look)));
    }

    log::info!(
        "Built solar system: {} bodies, {} labels, {} asteroids",
        scene.bodies.len(),
        scene.labels.len(),
        scene.asteroid_count
    );
    scene
}

fn asteroid_transform(rock: &Asteroid) -> Transform {
    Transform::from_position_scale(
        Vec3::new(
            rock.angle.cos() * rock.distance,
            rock.vertical_offset,
            rock.angle.sin() * rock.distance,
        ),
        registry::ASTEROID_RADIUS,
    )
}

fn spawn_body<R: Rng + ?Sized>(
    world: &mut World,
    rng: &mut R,
    spec: &PlanetSpec,
    parent: Option<Entity>,
    segments: u32,
) -> Entity {
    let period = registry::rotation_period(spec.name);
    let angle = rng.gen_range(0.0..TAU);
    let offset = Vec3::new(angle.cos() * spec.distance, 0.0, angle.sin() * spec.distance);
    let center = parent
        .and_then(|p| world.get::<&Transform>(p).map(|t| t.position).ok())
        .unwrap_or(Vec3::ZERO);

    world.spawn((
        Name::new(spec.name),
        CelestialBody,
        Orbit { parent, distance: spec.distance, speed_factor: spec.speed_factor, angle },
        Spin::new(spin_increment(period)),
        Transform::from_position_scale(center + offset, spec.radius),
        Appearance::textured(
            MeshShape::Sphere { segments },
            MaterialKind::Lit,
            spec.texture,
            spec.fallback_color,
        ),
    ))
}

fn spawn_shell(world: &mut World, owner: Entity, kind: OverlayKind, scale: f32, appearance: Appearance) {
    let position = world.get::<&Transform>(owner).map(|t| t.position).unwrap_or(Vec3::ZERO);
    world.spawn((
        Overlay { owner, kind },
        Spin::new(OVERLAY_SPIN_RATE),
        Transform::from_position_scale(position, scale),
        appearance,
    ));
}

fn add_atmosphere(world: &mut World, planet: Entity, spec: &PlanetSpec) {
    spawn_shell(
        world,
        planet,
        OverlayKind::Atmosphere,
        spec.radius * registry::ATMOSPHERE_SCALE,
        Appearance::textured(
            MeshShape::Sphere { segments: PLANET_SEGMENTS },
            MaterialKind::Translucent { opacity: registry::ATMOSPHERE_OPACITY, lit: true },
            registry::VENUS_ATMOSPHERE_TEXTURE,
            [0.95, 0.85, 0.6, 1.0],
        ),
    );
}

/// Night lights and specular oceans on the planet itself, a cloud shell and
/// the moon. Returns the moon.
fn add_earth_system<R: Rng + ?Sized>(world: &mut World, rng: &mut R, planet: Entity, spec: &PlanetSpec) -> Entity {
    if let Ok(mut look) = world.get::<&mut Appearance>(planet) {
        look.night_texture = Some(registry::EARTH_NIGHT_TEXTURE);
        look.specular_texture = Some(registry::EARTH_SPECULAR_TEXTURE);
        look.emissive = registry::EARTH_NIGHT_EMISSIVE;
        look.shininess = registry::EARTH_SHININESS;
    }

    spawn_shell(
        world,
        planet,
        OverlayKind::Clouds,
        spec.radius * registry::CLOUD_SCALE,
        Appearance::textured(
            MeshShape::Sphere { segments: PLANET_SEGMENTS },
            MaterialKind::Translucent { opacity: registry::CLOUD_OPACITY, lit: true },
            registry::EARTH_CLOUDS_TEXTURE,
            [1.0, 1.0, 1.0, 1.0],
        ),
    );

    let moon = spawn_body(world, rng, &registry::MOON, Some(planet), MOON_SEGMENTS);
    // The moon also turns at the shell rate on top of its own period.
    if let Ok(mut spin) = world.get::<&mut Spin>(moon) {
        spin.rate += OVERLAY_SPIN_RATE;
    }
    moon
}

fn add_rings(world: &mut World, planet: Entity, spec: &PlanetSpec) {
    spawn_shell(
        world,
        planet,
        OverlayKind::Rings,
        1.0,
        Appearance::textured(
            MeshShape::Annulus {
                inner: spec.radius * registry::RING_INNER_SCALE,
                outer: spec.radius * registry::RING_OUTER_SCALE,
                segments: RING_SEGMENTS,
            },
            MaterialKind::Translucent { opacity: registry::RING_OPACITY, lit: false },
            registry::SATURN_RING_TEXTURE,
            [0.8, 0.72, 0.55, 1.0],
        ),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn build() -> (World, Scene) {
        let mut world = World::new();
        let scene = build_scene(&mut world, &mut StdRng::seed_from_u64(1));
        (world, scene)
    }

    fn body_named(world: &World, scene: &Scene, name: &str) -> Entity {
        scene
            .bodies
            .iter()
            .copied()
            .find(|&e| world.get::<&Name>(e).map(|n| n.as_str() == name).unwrap_or(false))
            .unwrap()
    }

    #[test]
    fn scene_has_expected_contents() {
        let (world, scene) = build();
        assert_eq!(world.query::<&Sun>().iter().count(), 1);
        assert_eq!(world.query::<&Backdrop>().iter().count(), 1);
        assert_eq!(world.query::<&CelestialBody>().iter().count(), 9);
        assert_eq!(scene.bodies.len(), 9);
        assert_eq!(scene.labels.len(), 9);
        assert_eq!(world.query::<&OrbitGuide>().iter().count(), 8);
        assert_eq!(world.query::<&Overlay>().iter().count(), 3);
        assert_eq!(world.query::<&Asteroid>().iter().count(), 1400);
        assert_eq!(scene.asteroid_count, 1400);
    }

    #[test]
    fn belts_split_by_distance() {
        let (world, _) = build();
        let mut inner = 0;
        let mut outer = 0;
        for (_, rock) in world.query::<&Asteroid>().iter() {
            if (45.0..=70.0).contains(&rock.distance) {
                assert!((-2.0..=2.0).contains(&rock.vertical_offset));
                inner += 1;
            } else {
                assert!((140.0..=180.0).contains(&rock.distance));
                assert!((-3.0..=3.0).contains(&rock.vertical_offset));
                outer += 1;
            }
        }
        assert_eq!((inner, outer), (800, 600));
    }

    #[test]
    fn moon_orbits_earth_and_shells_match_owners() {
        let (world, scene) = build();
        let earth = body_named(&world, &scene, "Earth");
        let moon = body_named(&world, &scene, "Moon");
        let orbit = *world.get::<&Orbit>(moon).unwrap();
        assert_eq!(orbit.parent, Some(earth));
        assert_eq!(orbit.distance, 3.0);

        let earth_look = *world.get::<&Appearance>(earth).unwrap();
        assert_eq!(earth_look.night_texture, Some("earth_nightmap.jpg"));
        assert_eq!(earth_look.shininess, 30.0);

        let mut kinds = Vec::new();
        for (_, (overlay, transform)) in world.query::<(&Overlay, &Transform)>().iter() {
            let owner = world.get::<&Name>(overlay.owner).unwrap().as_str().to_owned();
            let expected = match overlay.kind {
                OverlayKind::Atmosphere => 1.3 * 1.02,
                OverlayKind::Clouds => 1.4 * 1.015,
                OverlayKind::Rings => 1.0,
            };
            assert!((transform.scale.x - expected).abs() < 1e-5);
            kinds.push((overlay.kind, owner));
        }
        assert!(kinds.contains(&(OverlayKind::Atmosphere, "Venus".to_owned())));
        assert!(kinds.contains(&(OverlayKind::Clouds, "Earth".to_owned())));
        assert!(kinds.contains(&(OverlayKind::Rings, "Saturn".to_owned())));
    }

    #[test]
    fn moon_spins_at_period_plus_shell_rate() {
        let (world, scene) = build();
        let moon = body_named(&world, &scene, "Moon");
        let expected = spin_increment(655.7) + OVERLAY_SPIN_RATE;
        assert!((world.get::<&Spin>(moon).unwrap().rate - expected).abs() < 1e-9);

        let earth = body_named(&world, &scene, "Earth");
        assert_eq!(world.get::<&Spin>(earth).unwrap().rate, spin_increment(24.0));
    }

    #[test]
    fn labels_track_bodies_in_order() {
        let (world, scene) = build();
        let names: Vec<_> = scene.labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(
            names,
            ["Mercury", "Venus", "Earth", "Moon", "Mars", "Jupiter", "Saturn", "Uranus", "Neptune"]
        );
        for label in &scene.labels {
            let name = world.get::<&Name>(label.body).unwrap();
            assert_eq!(name.as_str(), label.text);
        }
    }

    #[test]
    fn bodies_start_on_their_orbit() {
        let (world, _) = build();
        for (_, (orbit, transform)) in world.query::<(&Orbit, &Transform)>().iter() {
            assert!((0.0..TAU).contains(&orbit.angle));
            if orbit.parent.is_none() {
                let r = Vec3::new(transform.position.x, 0.0, transform.position.z).length();
                assert!((r - orbit.distance).abs() < 1e-3);
            }
        }
    }
}

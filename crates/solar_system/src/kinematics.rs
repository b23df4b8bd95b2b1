//! Per-frame motion: orbits, spins, overlay shells and asteroids.
//!
//! Every step adds a fixed angle regardless of wall-clock time, so motion
//! speed follows the frame rate.

use std::f32::consts::TAU;

use engine_core::{Entity, Spin, Transform, Vec3, World};

use crate::asteroids::Asteroid;
use crate::components::{Orbit, Overlay};
use crate::registry::TIME_SCALE;

/// Angle added per frame per unit of speed for bodies orbiting the origin.
pub const ROOT_ORBIT_STEP: f32 = 0.001;
/// Angle added per frame per unit of speed for bodies orbiting a parent.
pub const CHILD_ORBIT_STEP: f32 = 0.02;
/// Spin of overlay shells, radians per frame.
pub const OVERLAY_SPIN_RATE: f32 = 0.002;

/// Per-frame spin for a body with the given rotation period in hours.
pub fn spin_increment(period_hours: f32) -> f32 {
    TAU / (period_hours * TIME_SCALE)
}

/// Position on a circle of `distance` around `center` at the given angle.
fn orbit_position(center: Vec3, angle: f32, distance: f32) -> Vec3 {
    center + Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance)
}

/// Advance the whole scene by one frame.
///
/// Root orbits are resolved before parented ones so a moon circles its
/// planet's position for this frame. Overlays copy their owner afterwards.
pub fn step(world: &mut World) {
    step_root_orbits(world);
    step_child_orbits(world);
    step_overlays(world);
    step_spins(world);
    step_asteroids(world);
}

fn step_root_orbits(world: &mut World) {
    for (_, (orbit, transform)) in world.query_mut::<(&mut Orbit, &mut Transform)>() {
        if orbit.parent.is_some() {
            continue;
        }
        orbit.angle += ROOT_ORBIT_STEP * orbit.speed_factor;
        transform.position = orbit_position(Vec3::ZERO, orbit.angle, orbit.distance);
    }
}

fn step_child_orbits(world: &mut World) {
    let children: Vec<(Entity, Entity)> = world
        .query::<&Orbit>()
        .iter()
        .filter_map(|(entity, orbit)| orbit.parent.map(|parent| (entity, parent)))
        .collect();

    for (child, parent) in children {
        let center = world.get::<&Transform>(parent).map(|t| t.position).ok();
        let Ok((orbit, transform)) = world.query_one_mut::<(&mut Orbit, &mut Transform)>(child) else {
            continue;
        };
        match center {
            Some(center) => {
                orbit.angle += CHILD_ORBIT_STEP * orbit.speed_factor;
                transform.position = orbit_position(center, orbit.angle, orbit.distance);
            }
            None => {
                // Falls back to a root orbit from now on; warns only once.
                log::warn!("Orbit parent {:?} of {:?} is gone, orbiting the origin", parent, child);
                orbit.parent = None;
                orbit.angle += ROOT_ORBIT_STEP * orbit.speed_factor;
                transform.position = orbit_position(Vec3::ZERO, orbit.angle, orbit.distance);
            }
        }
    }
}

fn step_overlays(world: &mut World) {
    let shells: Vec<(Entity, Entity)> = world
        .query::<&Overlay>()
        .iter()
        .map(|(entity, overlay)| (entity, overlay.owner))
        .collect();

    for (shell, owner) in shells {
        let Ok(position) = world.get::<&Transform>(owner).map(|t| t.position) else {
            continue;
        };
        if let Ok(mut transform) = world.get::<&mut Transform>(shell) {
            transform.position = position;
        }
    }
}

fn step_spins(world: &mut World) {
    for (_, (spin, transform)) in world.query_mut::<(&mut Spin, &mut Transform)>() {
        spin.step();
        transform.rotation = spin.rotation();
    }
}

fn step_asteroids(world: &mut World) {
    for (_, (rock, transform)) in world.query_mut::<(&mut Asteroid, &mut Transform)>() {
        rock.angle += ROOT_ORBIT_STEP * rock.speed_factor;
        transform.position = Vec3::new(
            rock.angle.cos() * rock.distance,
            rock.vertical_offset,
            rock.angle.sin() * rock.distance,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::OverlayKind;

    fn spawn_root(world: &mut World, distance: f32, speed_factor: f32, angle: f32) -> Entity {
        world.spawn((
            Transform::default(),
            Orbit { parent: None, distance, speed_factor, angle },
        ))
    }

    #[test]
    fn root_angle_grows_linearly() {
        let mut world = World::new();
        let planet = spawn_root(&mut world, 34.0, 3.2, 1.0);
        for _ in 0..250 {
            step(&mut world);
        }
        let orbit = *world.get::<&Orbit>(planet).unwrap();
        assert!((orbit.angle - (1.0 + 250.0 * 0.001 * 3.2)).abs() < 1e-4);

        let pos = world.get::<&Transform>(planet).unwrap().position;
        assert!((pos.x - orbit.angle.cos() * 34.0).abs() < 1e-3);
        assert!((pos.z - orbit.angle.sin() * 34.0).abs() < 1e-3);
        assert_eq!(pos.y, 0.0);
    }

    #[test]
    fn child_keeps_distance_from_moving_parent() {
        let mut world = World::new();
        let earth = spawn_root(&mut world, 34.0, 3.2, 0.3);
        let moon = world.spawn((
            Transform::default(),
            Orbit { parent: Some(earth), distance: 3.0, speed_factor: 5.0, angle: 0.0 },
        ));
        for _ in 0..100 {
            step(&mut world);
            let parent = world.get::<&Transform>(earth).unwrap().position;
            let child = world.get::<&Transform>(moon).unwrap().position;
            let offset = child - parent;
            assert!((Vec3::new(offset.x, 0.0, offset.z).length() - 3.0).abs() < 1e-3);
            assert_eq!(child.y, parent.y);
        }
        let orbit = *world.get::<&Orbit>(moon).unwrap();
        assert!((orbit.angle - 100.0 * 0.02 * 5.0).abs() < 1e-3);
    }

    #[test]
    fn orphaned_child_orbits_origin() {
        let mut world = World::new();
        let parent = spawn_root(&mut world, 10.0, 1.0, 0.0);
        let child = world.spawn((
            Transform::default(),
            Orbit { parent: Some(parent), distance: 2.0, speed_factor: 1.0, angle: 0.0 },
        ));
        world.despawn(parent).unwrap();
        step(&mut world);

        let orbit = *world.get::<&Orbit>(child).unwrap();
        assert_eq!(orbit.parent, None);
        let pos = world.get::<&Transform>(child).unwrap().position;
        assert!((Vec3::new(pos.x, 0.0, pos.z).length() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn spin_increment_follows_period_sign() {
        assert!((spin_increment(1407.6) - TAU / (1407.6 * 500.0)).abs() < 1e-12);
        assert!(spin_increment(-5832.5) < 0.0);
        assert!(spin_increment(-17.2) < 0.0);
        assert!(spin_increment(24.0) > 0.0);
    }

    #[test]
    fn spins_drive_rotation() {
        let mut world = World::new();
        let body = world.spawn((Transform::default(), Spin::new(spin_increment(-17.2))));
        for _ in 0..10 {
            step(&mut world);
        }
        let spin = *world.get::<&Spin>(body).unwrap();
        assert!((spin.angle - 10.0 * spin_increment(-17.2)).abs() < 1e-6);
        let rotation = world.get::<&Transform>(body).unwrap().rotation;
        assert!(rotation.abs_diff_eq(spin.rotation(), 1e-6));
    }

    #[test]
    fn overlays_sit_on_owner_and_spin() {
        let mut world = World::new();
        let owner = spawn_root(&mut world, 26.0, 3.8, 0.0);
        let shell = world.spawn((
            Transform::default(),
            Overlay { owner, kind: OverlayKind::Atmosphere },
            Spin::new(OVERLAY_SPIN_RATE),
        ));
        for frame in 1..=20 {
            step(&mut world);
            let a = world.get::<&Transform>(owner).unwrap().position;
            let b = world.get::<&Transform>(shell).unwrap().position;
            assert_eq!(a, b);
            let spin = world.get::<&Spin>(shell).unwrap().angle;
            assert!((spin - frame as f32 * 0.002).abs() < 1e-5);
        }
    }

    #[test]
    fn built_moon_spins_period_plus_shell_rate_each_frame() {
        use crate::scene::build_scene;
        use engine_core::Name;
        use rand::{rngs::StdRng, SeedableRng};

        let mut world = World::new();
        let scene = build_scene(&mut world, &mut StdRng::seed_from_u64(1));
        step(&mut world);

        let moon = scene
            .bodies
            .iter()
            .copied()
            .find(|&e| world.get::<&Name>(e).map(|n| n.as_str() == "Moon").unwrap_or(false))
            .unwrap();
        let angle = world.get::<&Spin>(moon).unwrap().angle;
        let expected = TAU / (655.7 * 500.0) + 0.002;
        assert!((angle - expected).abs() < 1e-7, "moon spin {angle}, expected {expected}");
    }

    #[test]
    fn asteroid_height_is_fixed() {
        let mut world = World::new();
        let rock = world.spawn((
            Transform::default(),
            Asteroid { angle: 0.5, distance: 60.0, vertical_offset: -1.25, speed_factor: 0.6 },
        ));
        for _ in 0..500 {
            step(&mut world);
            assert_eq!(world.get::<&Transform>(rock).unwrap().position.y, -1.25);
        }
        let state = *world.get::<&Asteroid>(rock).unwrap();
        assert!((state.angle - (0.5 + 500.0 * 0.001 * 0.6)).abs() < 1e-4);
        assert_eq!(state.vertical_offset, -1.25);
    }
}

//! Screen-space name tags that follow bodies around.

use engine_core::{Entity, Mat4, Transform, Vec2, Vec3, World};

/// Text pinned to a body's projected position.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub body: Entity,
    /// Physical pixels, origin top-left. Stale while hidden.
    pub screen_position: Vec2,
    pub visible: bool,
}

impl Label {
    pub fn new(text: impl Into<String>, body: Entity) -> Self {
        Self {
            text: text.into(),
            body,
            screen_position: Vec2::ZERO,
            visible: false,
        }
    }
}

/// Project a world point to window pixels. `None` when the point is behind
/// the camera, past the far plane, or the projection degenerates.
pub fn project_to_screen(view_proj: Mat4, point: Vec3, viewport: Vec2) -> Option<Vec2> {
    let ndc = view_proj.project_point3(point);
    if !ndc.is_finite() || ndc.z >= 1.0 {
        return None;
    }
    Some(Vec2::new(
        (ndc.x * 0.5 + 0.5) * viewport.x,
        (-ndc.y * 0.5 + 0.5) * viewport.y,
    ))
}

/// Refresh every label from its body's current position.
pub fn update_labels(world: &World, labels: &mut [Label], view_proj: Mat4, viewport: Vec2) {
    for label in labels.iter_mut() {
        let position = match world.get::<&Transform>(label.body) {
            Ok(transform) => transform.position,
            Err(_) => {
                label.visible = false;
                continue;
            }
        };
        match project_to_screen(view_proj, position, viewport) {
            Some(screen) => {
                label.screen_position = screen;
                label.visible = true;
            }
            None => label.visible = false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);

    fn view_proj_from(eye: Vec3) -> Mat4 {
        let proj = Mat4::perspective_rh(75f32.to_radians(), VIEWPORT.x / VIEWPORT.y, 0.1, 3000.0);
        let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        proj * view
    }

    #[test]
    fn point_in_front_lands_at_expected_pixel() {
        let vp = view_proj_from(Vec3::new(0.0, 0.0, 10.0));
        let centre = project_to_screen(vp, Vec3::ZERO, VIEWPORT).unwrap();
        assert!((centre - Vec2::new(400.0, 300.0)).length() < 1e-3);

        let right_up = project_to_screen(vp, Vec3::new(1.0, 1.0, 0.0), VIEWPORT).unwrap();
        assert!(right_up.x > 400.0);
        assert!(right_up.y < 300.0);
    }

    #[test]
    fn point_behind_camera_is_hidden() {
        let vp = view_proj_from(Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(project_to_screen(vp, Vec3::new(0.0, 0.0, 20.0), VIEWPORT), None);
    }

    #[test]
    fn point_past_far_plane_is_hidden() {
        let vp = view_proj_from(Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(project_to_screen(vp, Vec3::new(0.0, 0.0, -4000.0), VIEWPORT), None);
    }

    #[test]
    fn labels_follow_bodies_and_hide_when_missing() {
        let mut world = World::new();
        let near = world.spawn((Transform::from_position(Vec3::ZERO),));
        let behind = world.spawn((Transform::from_position(Vec3::new(0.0, 0.0, 50.0)),));
        let gone = world.spawn((Transform::default(),));
        world.despawn(gone).unwrap();

        let mut labels = vec![Label::new("Near", near), Label::new("Behind", behind), Label::new("Gone", gone)];
        labels[2].visible = true;
        update_labels(&world, &mut labels, view_proj_from(Vec3::new(0.0, 0.0, 10.0)), VIEWPORT);

        assert!(labels[0].visible);
        assert!((labels[0].screen_position - Vec2::new(400.0, 300.0)).length() < 1e-3);
        assert!(!labels[1].visible);
        assert!(!labels[2].visible);
    }
}

//! Orbit and free-fly camera controllers. Exactly one drives the camera each frame.

use std::f32::consts::{PI, TAU};

use glam::{EulerRot, Quat, Vec2, Vec3};
use input::{ElementState, InputEvent, KeyCode, MouseButton, MovementIntent};
use renderer::Camera;

use crate::config::ViewerConfig;

/// Keeps the orbit camera off the poles, where look-at is undefined.
const POLAR_EPSILON: f32 = 1e-6;
/// Dolly factor per wheel step.
const ZOOM_SCALE: f32 = 0.95;
const TOGGLE_KEY: KeyCode = KeyCode::KeyV;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    Orbit,
    Fly,
}

impl CameraMode {
    pub fn label(self) -> &'static str {
        match self {
            CameraMode::Orbit => "Orbit view",
            CameraMode::Fly => "Fly view",
        }
    }
}

/// Spherical orbit around a fixed target with damped inertia.
///
/// Drags and wheel steps accumulate into pending deltas; every `update`
/// applies `damping` of the pending rotation and keeps the rest.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    radius: f32,
    /// Azimuth around +Y, measured from +Z towards +X.
    theta: f32,
    /// Polar angle from +Y.
    phi: f32,
    pending_theta: f32,
    pending_phi: f32,
    pending_scale: f32,
    pub damping: f32,
    pub rotate_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    drag_from: Option<Vec2>,
}

impl OrbitControls {
    pub fn new(target: Vec3, config: &ViewerConfig) -> Self {
        Self {
            target,
            radius: 1.0,
            theta: 0.0,
            phi: PI / 2.0,
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_scale: 1.0,
            damping: config.orbit_damping,
            rotate_speed: config.orbit_rotate_speed,
            min_distance: config.min_distance,
            max_distance: config.max_distance.max(config.min_distance),
            drag_from: None,
        }
    }

    /// Adopt the camera's current position as the orbit state and drop any
    /// pending motion.
    pub fn sync_from(&mut self, camera: &Camera) {
        let offset = camera.position() - self.target;
        self.radius = offset.length();
        if self.radius > 0.0 {
            self.theta = offset.x.atan2(offset.z);
            self.phi = (offset.y / self.radius).clamp(-1.0, 1.0).acos();
        } else {
            self.theta = 0.0;
            self.phi = PI / 2.0;
        }
        self.pending_theta = 0.0;
        self.pending_phi = 0.0;
        self.pending_scale = 1.0;
        self.drag_from = None;
    }

    pub fn distance(&self) -> f32 {
        self.radius
    }

    pub fn begin_drag(&mut self, cursor: Vec2) {
        self.drag_from = Some(cursor);
    }

    pub fn end_drag(&mut self) {
        self.drag_from = None;
    }

    /// Pointer motion while dragging. One full viewport height of travel
    /// is one full turn.
    pub fn drag_to(&mut self, cursor: Vec2, viewport_height: f32) {
        let Some(from) = self.drag_from else {
            return;
        };
        let delta = cursor - from;
        let height = viewport_height.max(1.0);
        self.pending_theta -= TAU * delta.x / height * self.rotate_speed;
        self.pending_phi -= TAU * delta.y / height * self.rotate_speed;
        self.drag_from = Some(cursor);
    }

    /// Wheel input; positive lines move toward the target.
    pub fn zoom(&mut self, lines: f32) {
        if lines > 0.0 {
            self.pending_scale *= ZOOM_SCALE;
        } else if lines < 0.0 {
            self.pending_scale /= ZOOM_SCALE;
        }
    }

    /// Apply one frame of damped motion and aim the camera at the target.
    pub fn update(&mut self, camera: &mut Camera) {
        self.theta += self.pending_theta * self.damping;
        self.phi += self.pending_phi * self.damping;
        self.phi = self.phi.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);

        if self.pending_scale != 1.0 {
            // Limits bound zoom steps only. A radius adopted from fly mode
            // outside them is kept and can only be zoomed back toward them.
            let nearest = self.min_distance.min(self.radius);
            let farthest = self.max_distance.max(self.radius);
            self.radius = (self.radius * self.pending_scale).clamp(nearest, farthest);
            self.pending_scale = 1.0;
        }

        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        let offset = Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta) * self.radius;
        camera.transform.position = self.target + offset;
        camera.transform.look_at(self.target, Vec3::Y);

        self.pending_theta *= 1.0 - self.damping;
        self.pending_phi *= 1.0 - self.damping;
    }

    /// Remaining rotation not yet applied.
    #[cfg(test)]
    pub fn pending_rotation(&self) -> Vec2 {
        Vec2::new(self.pending_theta, self.pending_phi)
    }
}

/// First-person flight driven by held keys and left-button drags.
#[derive(Debug, Clone)]
pub struct FlyControls {
    pub yaw: f32,
    pub pitch: f32,
    pub speed: f32,
    pub sensitivity: f32,
    drag_from: Option<Vec2>,
}

impl FlyControls {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            speed: config.fly_speed,
            sensitivity: config.look_sensitivity,
            drag_from: None,
        }
    }

    pub fn begin_drag(&mut self, cursor: Vec2) {
        self.drag_from = Some(cursor);
    }

    pub fn end_drag(&mut self) {
        self.drag_from = None;
    }

    pub fn drag_to(&mut self, cursor: Vec2) {
        let Some(from) = self.drag_from else {
            return;
        };
        let delta = cursor - from;
        self.yaw -= delta.x * self.sensitivity;
        self.pitch = (self.pitch - delta.y * self.sensitivity).clamp(-PI / 2.0, PI / 2.0);
        self.drag_from = Some(cursor);
    }

    /// Move along the current view, then set the orientation from yaw/pitch.
    pub fn update(&self, camera: &mut Camera, movement: &MovementIntent) {
        let forward = camera.forward();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let transform = &mut camera.transform;
        transform.position += forward * movement.forward_axis() * self.speed;
        transform.position += right * movement.strafe_axis() * self.speed;
        transform.position.y += movement.vertical_axis() * self.speed;
        transform.rotation = Quat::from_euler(EulerRot::YXZ, self.yaw, self.pitch, 0.0);
    }
}

/// Owns both controllers and routes input to the active one.
#[derive(Debug, Clone)]
pub struct CameraController {
    mode: CameraMode,
    pub orbit: OrbitControls,
    pub fly: FlyControls,
}

impl CameraController {
    /// Starts in orbit mode around the origin, synced to `camera`.
    pub fn new(camera: &Camera, config: &ViewerConfig) -> Self {
        let mut orbit = OrbitControls::new(Vec3::ZERO, config);
        orbit.sync_from(camera);
        Self {
            mode: CameraMode::Orbit,
            orbit,
            fly: FlyControls::new(config),
        }
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    /// Switch modes. Returning to orbit re-reads the camera position so the
    /// view does not jump.
    pub fn toggle(&mut self, camera: &Camera) -> CameraMode {
        self.orbit.end_drag();
        self.fly.end_drag();
        self.mode = match self.mode {
            CameraMode::Orbit => CameraMode::Fly,
            CameraMode::Fly => {
                self.orbit.sync_from(camera);
                CameraMode::Orbit
            }
        };
        log::info!("Camera mode: {}", self.mode.label());
        self.mode
    }

    /// Route one queued event. `cursor` is the pointer position after the
    /// event was applied to the input state.
    pub fn handle_event(&mut self, event: &InputEvent, camera: &Camera, cursor: Vec2, viewport_height: f32) {
        if event.is_key_down(TOGGLE_KEY) {
            self.toggle(camera);
            return;
        }

        match (*event, self.mode) {
            (InputEvent::MouseButton { button: MouseButton::Left, state }, CameraMode::Orbit) => match state {
                ElementState::Pressed => self.orbit.begin_drag(cursor),
                ElementState::Released => self.orbit.end_drag(),
            },
            (InputEvent::MouseButton { button: MouseButton::Left, state }, CameraMode::Fly) => match state {
                ElementState::Pressed => self.fly.begin_drag(cursor),
                ElementState::Released => self.fly.end_drag(),
            },
            (InputEvent::CursorMoved { position }, CameraMode::Orbit) => {
                self.orbit.drag_to(position, viewport_height)
            }
            (InputEvent::CursorMoved { position }, CameraMode::Fly) => self.fly.drag_to(position),
            (InputEvent::Scroll { lines }, CameraMode::Orbit) => self.orbit.zoom(lines),
            (InputEvent::FocusLost, _) => {
                self.orbit.end_drag();
                self.fly.end_drag();
            }
            _ => {}
        }
    }

    /// Run the active controller for this frame.
    pub fn update(&mut self, camera: &mut Camera, movement: &MovementIntent) {
        match self.mode {
            CameraMode::Orbit => self.orbit.update(camera),
            CameraMode::Fly => self.fly.update(camera, movement),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Camera, CameraController) {
        let config = ViewerConfig::default();
        let mut camera = Camera::new(Vec3::from(config.camera_position));
        let mut controller = CameraController::new(&camera, &config);
        controller.update(&mut camera, &MovementIntent::default());
        (camera, controller)
    }

    fn key(key: KeyCode, state: ElementState, repeat: bool) -> InputEvent {
        InputEvent::Key { key, state, repeat }
    }

    fn toggle(controller: &mut CameraController, camera: &Camera) {
        controller.handle_event(&key(KeyCode::KeyV, ElementState::Pressed, false), camera, Vec2::ZERO, 720.0);
        controller.handle_event(&key(KeyCode::KeyV, ElementState::Released, false), camera, Vec2::ZERO, 720.0);
    }

    #[test]
    fn orbit_start_keeps_initial_position_and_faces_origin() {
        let (camera, controller) = setup();
        assert_eq!(controller.mode(), CameraMode::Orbit);
        assert!((camera.position() - Vec3::new(0.0, 100.0, 250.0)).length() < 1e-3);
        let to_origin = (-camera.position()).normalize();
        assert!(camera.forward().dot(to_origin) > 0.9999);
    }

    fn park_in_fly_mode(controller: &mut CameraController, camera: &mut Camera, key: KeyCode, frames: usize) -> Vec3 {
        toggle(controller, camera);
        assert_eq!(controller.mode(), CameraMode::Fly);
        let mut movement = MovementIntent::default();
        movement.apply_key(key, ElementState::Pressed);
        for _ in 0..frames {
            controller.update(camera, &movement);
        }
        camera.position()
    }

    #[test]
    fn fly_round_trip_restores_orbit_without_moving() {
        let (mut camera, mut controller) = setup();
        let parked = park_in_fly_mode(&mut controller, &mut camera, KeyCode::KeyW, 10);

        toggle(&mut controller, &camera);
        assert_eq!(controller.mode(), CameraMode::Orbit);
        controller.update(&mut camera, &MovementIntent::default());
        assert!((camera.position() - parked).length() < 1e-3);
        assert!((controller.orbit.distance() - parked.length()).abs() < 1e-3);
    }

    #[test]
    fn orbit_resync_beyond_max_distance_keeps_position() {
        let (mut camera, mut controller) = setup();
        // Straight up for 1200 frames ends near the starfield, past max_distance.
        let parked = park_in_fly_mode(&mut controller, &mut camera, KeyCode::Space, 1200);
        assert!(parked.length() > controller.orbit.max_distance);

        toggle(&mut controller, &camera);
        for _ in 0..3 {
            controller.update(&mut camera, &MovementIntent::default());
        }
        assert!((camera.position() - parked).length() < 1e-2);

        // Zooming out cannot push further; zooming in moves one step closer.
        controller.handle_event(&InputEvent::Scroll { lines: -1.0 }, &camera, Vec2::ZERO, 720.0);
        controller.update(&mut camera, &MovementIntent::default());
        assert!((controller.orbit.distance() - parked.length()).abs() < 1e-2);
        controller.handle_event(&InputEvent::Scroll { lines: 1.0 }, &camera, Vec2::ZERO, 720.0);
        controller.update(&mut camera, &MovementIntent::default());
        assert!((controller.orbit.distance() - parked.length() * 0.95).abs() < 1e-2);
    }

    #[test]
    fn orbit_resync_inside_min_distance_keeps_position() {
        let (mut camera, mut controller) = setup();
        toggle(&mut controller, &camera);
        camera.transform.position = Vec3::new(1.0, 2.0, 2.0);
        toggle(&mut controller, &camera);
        controller.update(&mut camera, &MovementIntent::default());
        assert!((camera.position() - Vec3::new(1.0, 2.0, 2.0)).length() < 1e-4);
        assert!((controller.orbit.distance() - 3.0).abs() < 1e-4);
    }

    #[test]
    fn key_repeat_does_not_toggle() {
        let (camera, mut controller) = setup();
        controller.handle_event(&key(KeyCode::KeyV, ElementState::Pressed, false), &camera, Vec2::ZERO, 720.0);
        controller.handle_event(&key(KeyCode::KeyV, ElementState::Pressed, true), &camera, Vec2::ZERO, 720.0);
        controller.handle_event(&key(KeyCode::KeyV, ElementState::Pressed, true), &camera, Vec2::ZERO, 720.0);
        assert_eq!(controller.mode(), CameraMode::Fly);
    }

    #[test]
    fn pitch_is_clamped_under_any_drag() {
        let (camera, mut controller) = setup();
        toggle(&mut controller, &camera);
        let press = InputEvent::MouseButton { button: MouseButton::Left, state: ElementState::Pressed };
        controller.handle_event(&press, &camera, Vec2::new(100.0, 100.0), 720.0);

        controller.handle_event(&InputEvent::CursorMoved { position: Vec2::new(100.0, -5000.0) }, &camera, Vec2::ZERO, 720.0);
        assert!((controller.fly.pitch - PI / 2.0).abs() < 1e-6);
        controller.handle_event(&InputEvent::CursorMoved { position: Vec2::new(400.0, 9000.0) }, &camera, Vec2::ZERO, 720.0);
        assert!((controller.fly.pitch + PI / 2.0).abs() < 1e-6);
        assert!((controller.fly.yaw + 300.0 * 0.002).abs() < 1e-5);
    }

    #[test]
    fn fly_drag_ignored_without_button() {
        let (camera, mut controller) = setup();
        toggle(&mut controller, &camera);
        controller.handle_event(&InputEvent::CursorMoved { position: Vec2::new(50.0, 50.0) }, &camera, Vec2::ZERO, 720.0);
        controller.handle_event(&InputEvent::CursorMoved { position: Vec2::new(250.0, 90.0) }, &camera, Vec2::ZERO, 720.0);
        assert_eq!((controller.fly.yaw, controller.fly.pitch), (0.0, 0.0));
    }

    #[test]
    fn opposing_keys_leave_camera_in_place() {
        let (mut camera, mut controller) = setup();
        toggle(&mut controller, &camera);
        let mut movement = MovementIntent::default();
        for k in [KeyCode::KeyW, KeyCode::KeyS, KeyCode::KeyA, KeyCode::KeyD, KeyCode::Space, KeyCode::ShiftLeft] {
            movement.apply_key(k, ElementState::Pressed);
        }
        let before = camera.position();
        controller.update(&mut camera, &movement);
        assert!((camera.position() - before).length() < 1e-6);
    }

    #[test]
    fn fly_moves_along_view_then_orients() {
        let (mut camera, mut controller) = setup();
        toggle(&mut controller, &camera);
        // Fly starts with yaw = pitch = 0, looking down -Z.
        let mut movement = MovementIntent::default();
        movement.apply_key(KeyCode::Space, ElementState::Pressed);
        controller.update(&mut camera, &movement);
        assert!((camera.position().y - 101.5).abs() < 1e-4);
        assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-5);

        movement = MovementIntent::default();
        movement.apply_key(KeyCode::KeyD, ElementState::Pressed);
        let before = camera.position();
        controller.update(&mut camera, &movement);
        assert!((camera.position() - before - Vec3::new(1.5, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn orbit_zoom_respects_limits() {
        let (mut camera, mut controller) = setup();
        for _ in 0..500 {
            controller.handle_event(&InputEvent::Scroll { lines: 1.0 }, &camera, Vec2::ZERO, 720.0);
            controller.update(&mut camera, &MovementIntent::default());
        }
        assert!((controller.orbit.distance() - controller.orbit.min_distance).abs() < 1e-4);
        for _ in 0..500 {
            controller.handle_event(&InputEvent::Scroll { lines: -1.0 }, &camera, Vec2::ZERO, 720.0);
            controller.update(&mut camera, &MovementIntent::default());
        }
        assert!((controller.orbit.distance() - controller.orbit.max_distance).abs() < 1e-2);
    }

    #[test]
    fn orbit_drag_decays_with_damping() {
        let (mut camera, mut controller) = setup();
        let press = InputEvent::MouseButton { button: MouseButton::Left, state: ElementState::Pressed };
        controller.handle_event(&press, &camera, Vec2::new(0.0, 0.0), 720.0);
        controller.handle_event(&InputEvent::CursorMoved { position: Vec2::new(72.0, 0.0) }, &camera, Vec2::ZERO, 720.0);
        let release = InputEvent::MouseButton { button: MouseButton::Left, state: ElementState::Released };
        controller.handle_event(&release, &camera, Vec2::new(72.0, 0.0), 720.0);

        let initial = controller.orbit.pending_rotation().x;
        assert!((initial + TAU * 0.1).abs() < 1e-5);
        controller.update(&mut camera, &MovementIntent::default());
        assert!((controller.orbit.pending_rotation().x - initial * 0.95).abs() < 1e-6);
        for _ in 0..400 {
            controller.update(&mut camera, &MovementIntent::default());
        }
        assert!(controller.orbit.pending_rotation().x.abs() < 1e-6);
        // Distance is untouched by rotation.
        assert!((controller.orbit.distance() - Vec3::new(0.0, 100.0, 250.0).length()).abs() < 1e-3);
    }

    #[test]
    fn orbit_ignores_fly_only_input() {
        let (mut camera, mut controller) = setup();
        let mut movement = MovementIntent::default();
        movement.apply_key(KeyCode::KeyW, ElementState::Pressed);
        let before = camera.position();
        controller.update(&mut camera, &movement);
        assert!((camera.position() - before).length() < 1e-3);
    }
}

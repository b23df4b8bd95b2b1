//! Perspective camera and the per-frame uniform shared by scene shaders.

use bytemuck::{Pod, Zeroable};
use engine_core::Transform;
use glam::{Mat4, Vec3};

/// Perspective camera. Orientation lives entirely in `transform`; the
/// controllers in the viewer decide how it changes.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera transform (position and rotation).
    pub transform: Transform,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            transform: Transform::default(),
            fov_degrees: 75.0,
            near: 0.1,
            far: 3000.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl Camera {
    /// Create a new camera at the given position.
    pub fn new(position: Vec3) -> Self {
        Self {
            transform: Transform::from_position(position),
            ..Default::default()
        }
    }

    /// Update aspect ratio (call on window resize).
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    /// World-to-view matrix. Built from the rotation directly so a camera
    /// looking straight up or down stays well defined.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.transform.rotation, self.transform.position).inverse()
    }

    /// Get the projection matrix (depth 0..1).
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// Get the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn forward(&self) -> Vec3 {
        self.transform.forward()
    }
}

/// Point light at the sun plus a flat ambient term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub light_position: Vec3,
    pub light_color: Vec3,
    pub light_intensity: f32,
    pub ambient: Vec3,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            light_position: Vec3::ZERO,
            light_color: Vec3::ONE,
            light_intensity: 2.5,
            // 0x222222
            ambient: Vec3::splat(0x22 as f32 / 255.0),
        }
    }
}

/// Camera and light data for GPU (group 0).
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    /// w unused
    pub position: [f32; 4],
    /// xyz = light position, w = intensity
    pub light_position: [f32; 4],
    /// rgb = light colour, w unused
    pub light_color: [f32; 4],
    /// rgb = ambient, w unused
    pub ambient: [f32; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 4],
            light_position: [0.0; 4],
            light_color: [1.0; 4],
            ambient: [0.0; 4],
        }
    }

    pub fn update(&mut self, camera: &Camera, lighting: &Lighting) {
        self.view_proj = camera.view_projection_matrix().to_cols_array_2d();
        self.position = camera.position().extend(1.0).to_array();
        self.light_position = lighting.light_position.extend(lighting.light_intensity).to_array();
        self.light_color = lighting.light_color.extend(1.0).to_array();
        self.ambient = lighting.ambient.extend(1.0).to_array();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn view_matrix_moves_camera_to_origin() {
        let mut camera = Camera::new(Vec3::new(0.0, 100.0, 250.0));
        camera.transform.look_at(Vec3::ZERO, Vec3::Y);
        let eye = camera.view_matrix().transform_point3(camera.position());
        assert!(eye.length() < 1e-3);
        // Target is straight ahead (-Z in view space).
        let target = camera.view_matrix().transform_point3(Vec3::ZERO);
        assert!(target.x.abs() < 1e-3 && target.y.abs() < 1e-3 && target.z < 0.0);
    }

    #[test]
    fn looking_straight_down_is_finite() {
        let mut camera = Camera::new(Vec3::new(0.0, 50.0, 0.0));
        camera.transform.rotation = Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2);
        assert!(camera.view_projection_matrix().is_finite());
    }

    #[test]
    fn aspect_ignores_zero_height() {
        let mut camera = Camera::default();
        camera.set_aspect(800, 0);
        assert_eq!(camera.aspect, 800.0);
    }
}

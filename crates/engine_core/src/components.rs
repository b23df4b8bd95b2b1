//! Common ECS components used across the viewer.

use glam::Quat;

/// Rotation about the local Y axis, advanced by a fixed amount every frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Spin {
    /// Accumulated angle in radians. Never wrapped.
    pub angle: f32,
    /// Radians added per frame. Negative for retrograde rotation.
    pub rate: f32,
}

impl Spin {
    pub fn new(rate: f32) -> Self {
        Self { angle: 0.0, rate }
    }

    /// Advance one frame.
    pub fn step(&mut self) {
        self.angle += self.rate;
    }

    /// Rotation quaternion for the current angle.
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.angle)
    }
}

/// Display name shown in labels and logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//! Viewer configuration (window, camera, controls, assets). Loaded from config.ron at startup.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Persistent viewer settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Window width in logical pixels.
    #[serde(default = "default_window_width")]
    pub window_width: u32,
    /// Window height in logical pixels.
    #[serde(default = "default_window_height")]
    pub window_height: u32,
    /// Vertical field of view in degrees.
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    #[serde(default = "default_camera_position")]
    pub camera_position: [f32; 3],
    /// Free-fly movement per frame.
    #[serde(default = "default_fly_speed")]
    pub fly_speed: f32,
    /// Radians of yaw/pitch per pixel of drag in fly mode.
    #[serde(default = "default_look_sensitivity")]
    pub look_sensitivity: f32,
    #[serde(default = "default_orbit_damping")]
    pub orbit_damping: f32,
    #[serde(default = "default_orbit_rotate_speed")]
    pub orbit_rotate_speed: f32,
    #[serde(default = "default_min_distance")]
    pub min_distance: f32,
    #[serde(default = "default_max_distance")]
    pub max_distance: f32,
    /// Directory holding the body textures.
    #[serde(default = "default_texture_dir")]
    pub texture_dir: PathBuf,
    /// Fixed seed for initial orbit angles and belts; random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_true")]
    pub show_labels: bool,
    #[serde(default = "default_true")]
    pub show_help: bool,
}

fn default_window_width() -> u32 {
    1280
}
fn default_window_height() -> u32 {
    720
}
fn default_fov() -> f32 {
    75.0
}
fn default_near() -> f32 {
    0.1
}
fn default_far() -> f32 {
    3000.0
}
fn default_camera_position() -> [f32; 3] {
    [0.0, 100.0, 250.0]
}
fn default_fly_speed() -> f32 {
    1.5
}
fn default_look_sensitivity() -> f32 {
    0.002
}
fn default_orbit_damping() -> f32 {
    0.05
}
fn default_orbit_rotate_speed() -> f32 {
    1.0
}
fn default_min_distance() -> f32 {
    5.0
}
fn default_max_distance() -> f32 {
    1500.0
}
fn default_texture_dir() -> PathBuf {
    PathBuf::from("assets/textures")
}
fn default_true() -> bool {
    true
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            fov_degrees: default_fov(),
            near: default_near(),
            far: default_far(),
            camera_position: default_camera_position(),
            fly_speed: default_fly_speed(),
            look_sensitivity: default_look_sensitivity(),
            orbit_damping: default_orbit_damping(),
            orbit_rotate_speed: default_orbit_rotate_speed(),
            min_distance: default_min_distance(),
            max_distance: default_max_distance(),
            texture_dir: default_texture_dir(),
            seed: None,
            show_labels: true,
            show_help: true,
        }
    }
}

impl ViewerConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        let path = config_path();
        match std::fs::read_to_string(&path) {
            Ok(data) => Self::parse(&data).unwrap_or_else(|e| {
                log::warn!("Invalid config at {:?}: {}, using defaults", path, e);
                Self::default()
            }),
            Err(_) => {
                log::debug!("No config at {:?}, using defaults", path);
                Self::default()
            }
        }
    }

    pub fn parse(data: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(data)
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = ViewerConfig::parse("(fly_speed: 3.0, seed: Some(7))").unwrap();
        assert_eq!(config.fly_speed, 3.0);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.fov_degrees, 75.0);
        assert_eq!(config.camera_position, [0.0, 100.0, 250.0]);
        assert_eq!(config.texture_dir, PathBuf::from("assets/textures"));
        assert!(config.show_labels);
    }

    #[test]
    fn empty_struct_equals_default() {
        assert_eq!(ViewerConfig::parse("()").unwrap(), ViewerConfig::default());
    }

    #[test]
    fn malformed_input_is_an_error() {
        assert!(ViewerConfig::parse("(fly_speed: \"fast\")").is_err());
    }
}

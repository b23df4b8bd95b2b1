//! The simulated solar system: body tables, scene construction, per-frame
//! kinematics and label projection. No GPU or windowing code lives here.

pub mod asteroids;
pub mod components;
pub mod kinematics;
pub mod labels;
pub mod registry;
pub mod scene;

pub use asteroids::{Asteroid, BeltSpec};
pub use components::*;
pub use labels::{project_to_screen, update_labels, Label};
pub use scene::{build_scene, Scene};

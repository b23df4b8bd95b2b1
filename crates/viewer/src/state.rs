//! Application state owned by the winit handler.

use std::sync::Arc;

use anyhow::Result;
use engine_core::{Time, Transform};
use glam::Vec3;
use hecs::World;
use input::{InputQueue, InputState, MovementIntent};
use rand::{rngs::StdRng, SeedableRng};
use renderer::{Camera, Lighting, Renderer};
use solar_system::{build_scene, Scene};
use winit::window::Window;

use crate::camera_control::CameraController;
use crate::config::ViewerConfig;
use crate::render::GpuScene;

/// Everything the frame loop reads or mutates.
pub struct AppState {
    pub config: ViewerConfig,

    // Simulation
    pub world: World,
    pub scene: Scene,
    pub time: Time,

    // Camera
    pub camera: Camera,
    pub lighting: Lighting,
    pub controller: CameraController,

    // Input (handlers push, the frame drains)
    pub input_queue: InputQueue,
    pub input: InputState,
    pub movement: MovementIntent,

    // Rendering
    pub renderer: Renderer,
    pub gpu_scene: GpuScene,

    pub running: bool,
}

impl AppState {
    pub async fn new(window: Arc<Window>, config: ViewerConfig) -> Result<Self> {
        let renderer = Renderer::new(window).await?;

        let mut world = World::new();
        let scene = match config.seed {
            Some(seed) => {
                log::info!("Building scene with seed {}", seed);
                build_scene(&mut world, &mut StdRng::seed_from_u64(seed))
            }
            None => build_scene(&mut world, &mut rand::thread_rng()),
        };

        if !config.texture_dir.is_dir() {
            log::warn!(
                "Texture directory {:?} not found, bodies will use flat colours",
                config.texture_dir
            );
        }
        let gpu_scene = GpuScene::build(&renderer, &world, &config.texture_dir);

        let (width, height) = renderer.dimensions();
        let mut camera = Camera {
            transform: Transform::from_position(Vec3::from(config.camera_position)),
            fov_degrees: config.fov_degrees,
            near: config.near,
            far: config.far,
            ..Default::default()
        };
        camera.set_aspect(width, height);
        let controller = CameraController::new(&camera, &config);

        Ok(Self {
            config,
            world,
            scene,
            time: Time::new(),
            camera,
            lighting: Lighting::default(),
            controller,
            input_queue: InputQueue::new(),
            input: InputState::new(),
            movement: MovementIntent::new(),
            renderer,
            gpu_scene,
            running: true,
        })
    }

    /// Overlay glyph scale for the window's DPI, kept integral so the
    /// bitmap font stays crisp.
    pub fn hud_scale(&self) -> f32 {
        (self.renderer.window.scale_factor() as f32 * 2.0).round().max(1.0)
    }
}

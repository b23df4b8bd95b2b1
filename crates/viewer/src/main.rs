//! Animated, explorable solar system: orbiting planets, an asteroid belt and
//! two camera modes in a native window.

mod camera_control;
mod config;
mod events;
mod hud;
mod render;
mod state;
mod update;

use anyhow::Result;
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use state::AppState;

/// Application handler for winit.
struct App {
    state: Option<AppState>,
}

impl App {
    fn new() -> Self {
        Self { state: None }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_none() {
            let config = config::ViewerConfig::load();
            let window_attrs = Window::default_attributes()
                .with_title("Solar System")
                .with_inner_size(winit::dpi::LogicalSize::new(config.window_width, config.window_height));

            let window = match event_loop.create_window(window_attrs) {
                Ok(w) => Arc::new(w),
                Err(e) => {
                    log::error!("Failed to create window: {}", e);
                    event_loop.exit();
                    return;
                }
            };

            match pollster::block_on(AppState::new(window.clone(), config)) {
                Ok(s) => {
                    self.state = Some(s);
                    window.request_redraw();
                }
                Err(e) => {
                    log::error!("Failed to initialize viewer: {}", e);
                    event_loop.exit();
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(state) = &mut self.state {
            if state.handle_window_event(event) || !state.running {
                event_loop.exit();
            }
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("╔══════════════════════════════════════════════════╗");
    println!("║                  Solar System                    ║");
    println!("╠══════════════════════════════════════════════════╣");
    println!("║  ORBIT VIEW:                                     ║");
    println!("║    Left drag   - Rotate    │  Wheel  - Zoom      ║");
    println!("║  FLY VIEW (V to toggle):                         ║");
    println!("║    WASD        - Move      │  Space  - Up        ║");
    println!("║    Left drag   - Look      │  Shift  - Down      ║");
    println!("║  Escape        - Quit                            ║");
    println!("╚══════════════════════════════════════════════════╝");

    log::info!("Starting solar system viewer");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new();
    event_loop.run_app(&mut app)?;

    Ok(())
}

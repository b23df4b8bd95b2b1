//! Window event handling. Input is only queued here; the frame drains it.

use glam::Vec2;
use input::InputEvent;
use winit::event::{MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::state::AppState;

/// Pixel scroll distance treated as one wheel line.
const PIXELS_PER_LINE: f32 = 40.0;

impl AppState {
    /// Handle a window event. Returns true if the app should exit.
    pub(crate) fn handle_window_event(&mut self, event: WindowEvent) -> bool {
        match event {
            WindowEvent::CloseRequested => {
                self.running = false;
                true
            }
            WindowEvent::Resized(size) => {
                self.renderer.resize(size);
                self.camera.set_aspect(size.width, size.height);
                false
            }
            WindowEvent::Focused(false) => {
                self.input_queue.push(InputEvent::FocusLost);
                false
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    if key == KeyCode::Escape && event.state.is_pressed() {
                        log::info!("Escape pressed, exiting");
                        self.running = false;
                        return true;
                    }
                    self.input_queue.push(InputEvent::Key {
                        key,
                        state: event.state,
                        repeat: event.repeat,
                    });
                }
                false
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.input_queue.push(InputEvent::MouseButton { button, state });
                false
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input_queue.push(InputEvent::CursorMoved {
                    position: Vec2::new(position.x as f32, position.y as f32),
                });
                false
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                };
                if lines != 0.0 {
                    self.input_queue.push(InputEvent::Scroll { lines });
                }
                false
            }
            WindowEvent::RedrawRequested => {
                self.update();
                if let Err(e) = crate::render::run(self) {
                    log::error!("Render error: {}", e);
                }
                if !self.running {
                    return true;
                }
                self.renderer.window.request_redraw();
                false
            }
            _ => false,
        }
    }
}

//! Input handling for keyboard and mouse.

mod events;
mod movement;

pub use events::{InputEvent, InputQueue};
pub use movement::MovementIntent;

use glam::Vec2;

/// Pointer state accumulated from drained events. Held keys live in
/// [`MovementIntent`]; drags are tracked by whoever consumes the buttons.
#[derive(Debug, Default)]
pub struct InputState {
    /// Last known cursor position in window pixels.
    mouse_position: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one event into the pointer state.
    pub fn apply(&mut self, event: &InputEvent) {
        if let InputEvent::CursorMoved { position } = *event {
            self.mouse_position = position;
        }
    }

    /// Get the mouse position in window coordinates.
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }
}

// Re-export for convenience
pub use winit::event::{ElementState, MouseButton};
pub use winit::keyboard::KeyCode;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_cursor_across_other_events() {
        let mut input = InputState::new();
        input.apply(&InputEvent::CursorMoved { position: Vec2::new(10.0, 20.0) });
        input.apply(&InputEvent::MouseButton { button: MouseButton::Left, state: ElementState::Pressed });
        input.apply(&InputEvent::Scroll { lines: 1.0 });
        input.apply(&InputEvent::FocusLost);
        assert_eq!(input.mouse_position(), Vec2::new(10.0, 20.0));
    }
}

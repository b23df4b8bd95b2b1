//! Input events recorded by the window handlers and consumed once per frame.

use std::collections::VecDeque;

use glam::Vec2;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

/// A single user input, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key {
        key: KeyCode,
        state: ElementState,
        /// Set by the OS for auto-repeat while a key is held.
        repeat: bool,
    },
    MouseButton {
        button: MouseButton,
        state: ElementState,
    },
    /// Cursor position in physical window pixels.
    CursorMoved { position: Vec2 },
    /// Wheel movement in lines; positive scrolls up (away from the user).
    Scroll { lines: f32 },
    /// The window lost keyboard focus; release events for held keys and
    /// buttons will not arrive.
    FocusLost,
}

impl InputEvent {
    /// True for a fresh key-down of `key` (repeats excluded).
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        matches!(
            self,
            InputEvent::Key { key: k, state: ElementState::Pressed, repeat: false } if *k == key
        )
    }
}

/// FIFO of input events. Event handlers only push; the frame loop drains.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    /// Take every queued event, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = InputEvent> + '_ {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_order_and_empties() {
        let mut queue = InputQueue::new();
        queue.push(InputEvent::Scroll { lines: 1.0 });
        queue.push(InputEvent::CursorMoved { position: Vec2::new(3.0, 4.0) });
        assert_eq!(queue.len(), 2);

        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(drained[0], InputEvent::Scroll { lines: 1.0 });
        assert_eq!(drained[1], InputEvent::CursorMoved { position: Vec2::new(3.0, 4.0) });
        assert!(queue.is_empty());
    }

    #[test]
    fn key_down_ignores_repeat_and_release() {
        let down = InputEvent::Key { key: KeyCode::KeyV, state: ElementState::Pressed, repeat: false };
        let repeat = InputEvent::Key { key: KeyCode::KeyV, state: ElementState::Pressed, repeat: true };
        let up = InputEvent::Key { key: KeyCode::KeyV, state: ElementState::Released, repeat: false };
        assert!(down.is_key_down(KeyCode::KeyV));
        assert!(!down.is_key_down(KeyCode::KeyW));
        assert!(!repeat.is_key_down(KeyCode::KeyV));
        assert!(!up.is_key_down(KeyCode::KeyV));
    }
}

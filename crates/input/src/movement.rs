//! Held-key movement flags for free-fly navigation.

use winit::event::ElementState;
use winit::keyboard::KeyCode;

use crate::InputEvent;

/// Six independent 0/1 flags. Opposing flags may both be set and cancel out.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MovementIntent {
    pub forward: f32,
    pub backward: f32,
    pub left: f32,
    pub right: f32,
    pub up: f32,
    pub down: f32,
}

impl MovementIntent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or clear the flag bound to `key`. Returns false for unbound keys.
    pub fn apply_key(&mut self, key: KeyCode, state: ElementState) -> bool {
        let value = if state.is_pressed() { 1.0 } else { 0.0 };
        let flag = match key {
            KeyCode::KeyW => &mut self.forward,
            KeyCode::KeyS => &mut self.backward,
            KeyCode::KeyA => &mut self.left,
            KeyCode::KeyD => &mut self.right,
            KeyCode::ShiftLeft => &mut self.down,
            KeyCode::Space => &mut self.up,
            _ => return false,
        };
        *flag = value;
        true
    }

    /// Feed a queued event; focus loss clears every flag, other non-key
    /// events are ignored.
    pub fn apply(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::Key { key, state, .. } => self.apply_key(key, state),
            InputEvent::FocusLost => {
                if *self != Self::default() {
                    log::debug!("Focus lost, releasing held movement keys");
                }
                *self = Self::default();
                true
            }
            _ => false,
        }
    }

    /// forward - backward
    pub fn forward_axis(&self) -> f32 {
        self.forward - self.backward
    }

    /// right - left
    pub fn strafe_axis(&self) -> f32 {
        self.right - self.left
    }

    /// up - down
    pub fn vertical_axis(&self) -> f32 {
        self.up - self.down
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_set_and_clear_flags() {
        let mut intent = MovementIntent::new();
        assert!(intent.apply_key(KeyCode::KeyW, ElementState::Pressed));
        assert!(intent.apply_key(KeyCode::Space, ElementState::Pressed));
        assert_eq!(intent.forward_axis(), 1.0);
        assert_eq!(intent.vertical_axis(), 1.0);

        intent.apply_key(KeyCode::KeyW, ElementState::Released);
        assert_eq!(intent.forward_axis(), 0.0);
        assert_eq!(intent.up, 1.0);
    }

    #[test]
    fn opposing_keys_cancel() {
        let mut intent = MovementIntent::new();
        intent.apply_key(KeyCode::KeyW, ElementState::Pressed);
        intent.apply_key(KeyCode::KeyS, ElementState::Pressed);
        intent.apply_key(KeyCode::KeyA, ElementState::Pressed);
        intent.apply_key(KeyCode::KeyD, ElementState::Pressed);
        assert_eq!(intent.forward, 1.0);
        assert_eq!(intent.backward, 1.0);
        assert_eq!(intent.forward_axis(), 0.0);
        assert_eq!(intent.strafe_axis(), 0.0);
        assert_eq!(intent.vertical_axis(), 0.0);
    }

    #[test]
    fn unbound_keys_and_right_shift_are_ignored() {
        let mut intent = MovementIntent::new();
        assert!(!intent.apply_key(KeyCode::KeyV, ElementState::Pressed));
        assert!(!intent.apply_key(KeyCode::ShiftRight, ElementState::Pressed));
        assert_eq!(intent, MovementIntent::default());
    }

    #[test]
    fn apply_reads_key_events_only() {
        let mut intent = MovementIntent::new();
        let shift = InputEvent::Key { key: KeyCode::ShiftLeft, state: ElementState::Pressed, repeat: false };
        assert!(intent.apply(&shift));
        assert!(!intent.apply(&InputEvent::Scroll { lines: 2.0 }));
        assert_eq!(intent.vertical_axis(), -1.0);
    }

    #[test]
    fn focus_loss_clears_all_flags() {
        let mut intent = MovementIntent::new();
        intent.apply_key(KeyCode::KeyW, ElementState::Pressed);
        intent.apply_key(KeyCode::Space, ElementState::Pressed);
        assert!(intent.apply(&InputEvent::FocusLost));
        assert_eq!(intent, MovementIntent::default());
    }
}

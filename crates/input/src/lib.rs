#![warn(missing_docs)]
//! Keyboard and mouse state for the desktop window.

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Input state tracking for a single frame.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently pressed.
    keys_pressed: HashSet<KeyCode>,
    /// Keys pressed this frame (edge-triggered).
    keys_just_pressed: HashSet<KeyCode>,
    /// Keys released this frame (edge-triggered).
    keys_just_released: HashSet<KeyCode>,

    /// Mouse buttons currently pressed.
    mouse_buttons: HashSet<MouseButton>,
    /// Mouse buttons pressed this frame.
    mouse_just_pressed: HashSet<MouseButton>,

    /// Last cursor position in physical pixels, once the cursor has entered.
    cursor: Option<Vec2>,
    /// Cursor movement since last frame.
    cursor_delta: Vec2,

    /// Mouse wheel delta in notches.
    pub mouse_wheel_delta: f32,
}

impl InputState {
    /// Create a new input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a window event to update input state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(keycode),
                        state,
                        ..
                    },
                ..
            } => match state {
                ElementState::Pressed => self.press_key(*keycode),
                ElementState::Released => self.release_key(*keycode),
            },
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => self.press_button(*button),
                ElementState::Released => self.release_button(*button),
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.move_cursor(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => self.cursor = None,
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll(match delta {
                    MouseScrollDelta::LineDelta(_x, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                });
            }
            WindowEvent::Focused(false) => self.release_all(),
            _ => {}
        }
    }

    /// Record a key press. Auto-repeat does not re-trigger.
    pub fn press_key(&mut self, key: KeyCode) {
        if self.keys_pressed.insert(key) {
            self.keys_just_pressed.insert(key);
        }
    }

    /// Record a key release.
    pub fn release_key(&mut self, key: KeyCode) {
        if self.keys_pressed.remove(&key) {
            self.keys_just_released.insert(key);
        }
    }

    /// Record a mouse button press.
    pub fn press_button(&mut self, button: MouseButton) {
        if self.mouse_buttons.insert(button) {
            self.mouse_just_pressed.insert(button);
        }
    }

    /// Record a mouse button release.
    pub fn release_button(&mut self, button: MouseButton) {
        self.mouse_buttons.remove(&button);
    }

    /// Record a cursor position in physical pixels.
    pub fn move_cursor(&mut self, position: Vec2) {
        if let Some(previous) = self.cursor {
            self.cursor_delta += position - previous;
        }
        self.cursor = Some(position);
    }

    /// Record wheel movement in notches.
    pub fn scroll(&mut self, notches: f32) {
        self.mouse_wheel_delta += notches;
    }

    /// Drop every held key and button, reporting held keys as released.
    pub fn release_all(&mut self) {
        let held: Vec<_> = self.keys_pressed.drain().collect();
        self.keys_just_released.extend(held);
        self.mouse_buttons.clear();
    }

    /// Reset per-frame state once the frame has consumed it.
    pub fn begin_frame(&mut self) {
        self.keys_just_pressed.clear();
        self.keys_just_released.clear();
        self.mouse_just_pressed.clear();
        self.cursor_delta = Vec2::ZERO;
        self.mouse_wheel_delta = 0.0;
    }

    /// Check if a key is currently pressed.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Check if a key was just pressed this frame.
    pub fn key_just_pressed(&self, key: KeyCode) -> bool {
        self.keys_just_pressed.contains(&key)
    }

    /// Check if a key was just released this frame.
    pub fn key_just_released(&self, key: KeyCode) -> bool {
        self.keys_just_released.contains(&key)
    }

    /// Check if a mouse button is currently pressed.
    pub fn mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }

    /// Check if a mouse button was just pressed this frame.
    pub fn mouse_button_just_pressed(&self, button: MouseButton) -> bool {
        self.mouse_just_pressed.contains(&button)
    }

    /// Cursor position, if the cursor is over the window.
    pub fn cursor_position(&self) -> Option<Vec2> {
        self.cursor
    }

    /// Cursor movement this frame while `button` is held, else zero.
    pub fn drag_delta(&self, button: MouseButton) -> Vec2 {
        if self.mouse_button_pressed(button) {
            self.cursor_delta
        } else {
            Vec2::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_state_creation() {
        let input = InputState::new();
        assert_eq!(input.mouse_wheel_delta, 0.0);
        assert!(input.cursor_position().is_none());
        assert_eq!(input.drag_delta(MouseButton::Left), Vec2::ZERO);
    }

    #[test]
    fn key_edges_are_reported_once() {
        let mut input = InputState::new();
        input.press_key(KeyCode::KeyC);
        input.press_key(KeyCode::KeyC);
        assert!(input.key_just_pressed(KeyCode::KeyC));

        input.begin_frame();
        input.press_key(KeyCode::KeyC);
        assert!(input.key_pressed(KeyCode::KeyC));
        assert!(!input.key_just_pressed(KeyCode::KeyC));

        input.release_key(KeyCode::KeyC);
        assert!(input.key_just_released(KeyCode::KeyC));
        assert!(!input.key_pressed(KeyCode::KeyC));
    }

    #[test]
    fn drag_needs_a_held_button() {
        let mut input = InputState::new();
        input.move_cursor(Vec2::new(10.0, 10.0));
        input.move_cursor(Vec2::new(15.0, 8.0));
        assert_eq!(input.drag_delta(MouseButton::Left), Vec2::ZERO);

        input.press_button(MouseButton::Left);
        assert_eq!(input.drag_delta(MouseButton::Left), Vec2::new(5.0, -2.0));
        assert_eq!(input.drag_delta(MouseButton::Right), Vec2::ZERO);
        assert!(input.mouse_button_just_pressed(MouseButton::Left));
    }

    #[test]
    fn begin_frame_resets_deltas() {
        let mut input = InputState::new();
        input.move_cursor(Vec2::ZERO);
        input.move_cursor(Vec2::new(3.0, 4.0));
        input.scroll(2.0);
        input.press_button(MouseButton::Left);

        input.begin_frame();

        assert_eq!(input.drag_delta(MouseButton::Left), Vec2::ZERO);
        assert_eq!(input.mouse_wheel_delta, 0.0);
        assert_eq!(input.cursor_position(), Some(Vec2::new(3.0, 4.0)));
    }

    #[test]
    fn losing_focus_releases_keys() {
        let mut input = InputState::new();
        input.press_key(KeyCode::Space);
        input.press_button(MouseButton::Right);
        input.release_all();
        assert!(!input.key_pressed(KeyCode::Space));
        assert!(input.key_just_released(KeyCode::Space));
        assert!(!input.mouse_button_pressed(MouseButton::Right));
    }
}

//! Keyboard and mouse state collected from window events.
//!
//! The viewer feeds every [`WindowEvent`] into [`Input::handle_event`], reads
//! what happened during the frame, then calls [`Input::begin_frame`] to clear
//! the per-frame state.

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Other,
}

impl From<WinitMouseButton> for MouseButton {
    fn from(btn: WinitMouseButton) -> Self {
        match btn {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

/// Input state tracking for keyboard and mouse.
#[derive(Debug, Default)]
pub struct Input {
    keys_held: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,

    buttons_held: HashSet<MouseButton>,

    /// Cursor position in window pixels, once the cursor has been seen.
    cursor: Option<Vec2>,
    /// Cursor movement accumulated this frame.
    cursor_delta: Vec2,
    /// Wheel notches accumulated this frame; positive scrolls up.
    scroll_delta: f32,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a key went down this frame. Auto-repeat does not count.
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    pub fn button_held(&self, button: MouseButton) -> bool {
        self.buttons_held.contains(&button)
    }

    /// Cursor movement since the last [`begin_frame`](Self::begin_frame).
    pub fn cursor_delta(&self) -> Vec2 {
        self.cursor_delta
    }

    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }

    /// Clear per-frame state. Held keys and buttons persist.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.cursor_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => self.press_key(key),
                        ElementState::Released => self.release_key(key),
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = MouseButton::from(*button);
                match state {
                    ElementState::Pressed => {
                        self.buttons_held.insert(button);
                    }
                    ElementState::Released => {
                        self.buttons_held.remove(&button);
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.move_cursor(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => {
                self.cursor = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll_delta += match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
            }
            WindowEvent::Focused(false) => {
                self.keys_held.clear();
                self.buttons_held.clear();
            }
            _ => {}
        }
    }

    fn press_key(&mut self, key: KeyCode) {
        // Only a fresh press counts, not auto-repeat
        if self.keys_held.insert(key) {
            self.keys_pressed.insert(key);
        }
    }

    fn release_key(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
    }

    fn move_cursor(&mut self, position: Vec2) {
        if let Some(last) = self.cursor {
            self.cursor_delta += position - last;
        }
        self.cursor = Some(position);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_press_is_per_frame() {
        let mut input = Input::new();
        input.press_key(KeyCode::Space);
        assert!(input.key_pressed(KeyCode::Space));
        assert!(input.key_held(KeyCode::Space));

        input.begin_frame();
        assert!(!input.key_pressed(KeyCode::Space));
        assert!(input.key_held(KeyCode::Space));

        // Auto-repeat while held
        input.press_key(KeyCode::Space);
        assert!(!input.key_pressed(KeyCode::Space));

        input.release_key(KeyCode::Space);
        input.press_key(KeyCode::Space);
        assert!(input.key_pressed(KeyCode::Space));
    }

    #[test]
    fn test_cursor_delta_accumulates() {
        let mut input = Input::new();
        input.move_cursor(Vec2::new(100.0, 100.0));
        assert_eq!(input.cursor_delta(), Vec2::ZERO);

        input.move_cursor(Vec2::new(110.0, 95.0));
        input.move_cursor(Vec2::new(115.0, 90.0));
        assert_eq!(input.cursor_delta(), Vec2::new(15.0, -10.0));

        input.begin_frame();
        assert_eq!(input.cursor_delta(), Vec2::ZERO);
        assert_eq!(input.cursor, Some(Vec2::new(115.0, 90.0)));
    }

    #[test]
    fn test_cursor_left_resets_tracking() {
        let mut input = Input::new();
        input.move_cursor(Vec2::new(10.0, 10.0));
        input.handle_event(&WindowEvent::CursorLeft {
            device_id: unsafe { winit::event::DeviceId::dummy() },
        });
        input.move_cursor(Vec2::new(500.0, 500.0));
        assert_eq!(input.cursor_delta(), Vec2::ZERO);
    }

    #[test]
    fn test_focus_loss_releases_everything() {
        let mut input = Input::new();
        input.press_key(KeyCode::KeyR);
        input.buttons_held.insert(MouseButton::Left);
        input.handle_event(&WindowEvent::Focused(false));
        assert!(!input.key_held(KeyCode::KeyR));
        assert!(!input.button_held(MouseButton::Left));
    }
}

use std::collections::HashSet;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

use super::controller::{Button, Controller};

/// Pixels per wheel "line" for touchpads reporting pixel deltas
const PIXELS_PER_LINE: f32 = 40.0;

/// Pointer state fed by winit window events
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Currently pressed buttons
    pressed: HashSet<Button>,
    /// Current pointer position (relative to window)
    pointer_position: Option<(f32, f32)>,
    /// Pointer movement delta since last reset
    pointer_delta: (f32, f32),
    /// Wheel movement since last reset
    wheel_delta: f32,
}

impl InputState {
    /// Create input state with no pressed buttons
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a winit WindowEvent and update internal state
    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(btn) = Self::mouse_button_to_button(*button) {
                    match state {
                        ElementState::Pressed => self.press(btn),
                        ElementState::Released => self.release(btn),
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.move_pointer(position.x as f32, position.y as f32);
            }
            WindowEvent::CursorLeft { .. } => {
                self.pointer_position = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / PIXELS_PER_LINE,
                };
                self.scroll(lines);
            }
            WindowEvent::Focused(false) => {
                // Buttons released outside the window never report
                self.pressed.clear();
            }
            _ => {}
        }
    }

    /// Mark a button as held
    pub fn press(&mut self, button: Button) {
        let _ = self.pressed.insert(button);
    }

    /// Mark a button as released
    pub fn release(&mut self, button: Button) {
        let _ = self.pressed.remove(&button);
    }

    /// Record a pointer position, accumulating the delta from the previous one
    pub fn move_pointer(&mut self, x: f32, y: f32) {
        if let Some((old_x, old_y)) = self.pointer_position {
            self.pointer_delta.0 += x - old_x;
            self.pointer_delta.1 += y - old_y;
        }
        self.pointer_position = Some((x, y));
    }

    /// Accumulate wheel movement in lines
    pub fn scroll(&mut self, lines: f32) {
        self.wheel_delta += lines;
    }

    /// Reset per-frame state (pointer and wheel deltas)
    /// Call this at the end of each frame after processing input
    pub fn reset_deltas(&mut self) {
        self.pointer_delta = (0.0, 0.0);
        self.wheel_delta = 0.0;
    }

    /// Get current pointer position (if available)
    pub fn pointer_position(&self) -> Option<(f32, f32)> {
        self.pointer_position
    }

    /// Map winit MouseButton to Button
    fn mouse_button_to_button(button: MouseButton) -> Option<Button> {
        match button {
            MouseButton::Left => Some(Button::MouseLeft),
            MouseButton::Middle => Some(Button::MouseMiddle),
            MouseButton::Right => Some(Button::MouseRight),
            _ => None,
        }
    }
}

impl Controller for InputState {
    fn is_down(&self, button: Button) -> bool {
        self.pressed.contains(&button)
    }

    fn pointer_delta(&self) -> (f32, f32) {
        self.pointer_delta
    }

    fn wheel_delta(&self) -> f32 {
        self.wheel_delta
    }
}

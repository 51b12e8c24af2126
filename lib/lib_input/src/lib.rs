//! Per-frame input state assembled from [`InputEvent`]s.

use std::collections::HashMap;

use lib_math::Vec2;
use lib_window::{ButtonCode, InputEvent, KeyCode, MouseButton};

mod axis;
mod button;
mod value;
pub use axis::*;
pub use button::*;
pub use value::*;

/// Maximum number of typed characters kept per frame.
pub const TEXT_BUF_LEN: usize = 32;

#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys: HashMap<KeyCode, Button>,
    mouse_buttons: HashMap<MouseButton, Button>,
    gamepad: HashMap<ButtonCode, (Value, Button)>,
    mouse_pos: Vec2,
    wheel: Vec2,
    text: String,
    text_len: usize,
    text_pos: usize,
    close_requested: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn event(&mut self, event: &InputEvent) {
        match event {
            InputEvent::CloseRequested => self.close_requested = true,

            InputEvent::Key {
                code,
                is_held,
                repeat,
                text,
            } => {
                if !repeat {
                    self.keys.entry(*code).or_default().set_held(*is_held);
                }

                if *is_held && let Some(text) = text {
                    self.push_text(text);
                }
            }

            InputEvent::MouseButton { button, is_held } => {
                self.mouse_buttons
                    .entry(*button)
                    .or_default()
                    .set_held(*is_held);
            }

            InputEvent::MouseMoved(pos) => self.mouse_pos = *pos,

            InputEvent::MouseWheel(delta) => self.wheel += *delta,

            InputEvent::GamepadButton { button, value } => {
                let (stored, state) = self.gamepad.entry(*button).or_default();
                *stored = Value(*value);
                state.set_held(stored.is_held());
            }

            InputEvent::GamepadDisconnected => {
                for (value, state) in self.gamepad.values_mut() {
                    *value = Value(0.0);
                    state.set_held(false);
                }
            }

            _ => {}
        }
    }

    /// Clears per-frame edges, the wheel delta and the typed text.
    pub fn end_frame(&mut self) {
        for button in self.keys.values_mut() {
            button.end_frame();
        }
        for button in self.mouse_buttons.values_mut() {
            button.end_frame();
        }
        for (_, button) in self.gamepad.values_mut() {
            button.end_frame();
        }

        self.wheel = Vec2::ZERO;
        self.text.clear();
        self.text_len = 0;
        self.text_pos = 0;
        self.close_requested = false;
    }

    pub fn key(&self, code: KeyCode) -> Button {
        self.keys.get(&code).copied().unwrap_or_default()
    }

    pub fn is_key_down(&self, code: KeyCode) -> bool {
        self.key(code).is_held
    }

    pub fn is_key_pressed(&self, code: KeyCode) -> bool {
        self.key(code).is_pressed
    }

    pub fn is_key_released(&self, code: KeyCode) -> bool {
        self.key(code).is_released
    }

    pub fn key_axis(&self, positive: KeyCode, negative: KeyCode) -> i8 {
        Axis::new(self.key(positive), self.key(negative)).value()
    }

    pub fn mouse_button(&self, button: MouseButton) -> Button {
        self.mouse_buttons.get(&button).copied().unwrap_or_default()
    }

    pub fn is_mouse_down(&self, button: MouseButton) -> bool {
        self.mouse_button(button).is_held
    }

    pub fn is_mouse_pressed(&self, button: MouseButton) -> bool {
        self.mouse_button(button).is_pressed
    }

    pub fn is_mouse_released(&self, button: MouseButton) -> bool {
        self.mouse_button(button).is_released
    }

    pub fn gamepad_button(&self, button: ButtonCode) -> Button {
        self.gamepad
            .get(&button)
            .map(|(_, state)| *state)
            .unwrap_or_default()
    }

    pub fn gamepad_value(&self, button: ButtonCode) -> Value {
        self.gamepad
            .get(&button)
            .map(|(value, _)| *value)
            .unwrap_or_default()
    }

    pub fn gamepad_axis(&self, positive: ButtonCode, negative: ButtonCode) -> f32 {
        Axis::new(self.gamepad_value(positive), self.gamepad_value(negative)).value()
    }

    /// Cursor position in window pixels.
    pub fn mouse_pos(&self) -> Vec2 {
        self.mouse_pos
    }

    /// Wheel movement accumulated this frame.
    pub fn wheel(&self) -> Vec2 {
        self.wheel
    }

    /// Text typed this frame.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Drains the next typed character, or `None` once the frame's text is consumed.
    pub fn next_char(&mut self) -> Option<char> {
        let ch = self.text.chars().nth(self.text_pos)?;
        self.text_pos += 1;
        Some(ch)
    }

    pub fn close_requested(&self) -> bool {
        self.close_requested
    }

    fn push_text(&mut self, text: &str) {
        for ch in text.chars().filter(|ch| !ch.is_control()) {
            if self.text_len == TEXT_BUF_LEN {
                break;
            }
            self.text.push(ch);
            self.text_len += 1;
        }
    }
}

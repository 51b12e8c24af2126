use lib_math::{Vec2, vec2};
use winit::{
    event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent},
    keyboard::{KeyCode, PhysicalKey, SmolStr},
};

/// Raw input as seen by the application, independent of the device it came from.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    CloseRequested,
    Key {
        code: KeyCode,
        is_held: bool,
        repeat: bool,
        text: Option<SmolStr>,
    },
    MouseButton {
        button: MouseButton,
        is_held: bool,
    },
    MouseMoved(Vec2),
    MouseWheel(Vec2),
    GamepadButton {
        button: ButtonCode,
        value: f32,
    },
    GamepadDisconnected,
}

/// Gamepad inputs, with each stick split into four half-axis buttons.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonCode {
    LeftStickRight,
    LeftStickLeft,
    LeftStickUp,
    LeftStickDown,
    RightStickRight,
    RightStickLeft,
    RightStickUp,
    RightStickDown,
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
    South,
    East,
    North,
    West,
    LeftTrigger,
    LeftTrigger2,
    RightTrigger,
    RightTrigger2,
    Start,
    Select,
    LeftThumb,
    RightThumb,
    C,
    Z,
    Mode,
    Unknown,
}

impl InputEvent {
    pub fn from_window_event(event: &WindowEvent) -> Option<Self> {
        match event {
            WindowEvent::CloseRequested => Some(Self::CloseRequested),

            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        text,
                        ..
                    },
                ..
            } => Some(Self::Key {
                code: *code,
                is_held: state.is_pressed(),
                repeat: *repeat,
                text: text.clone(),
            }),

            WindowEvent::MouseInput { state, button, .. } => Some(Self::MouseButton {
                button: *button,
                is_held: *state == ElementState::Pressed,
            }),

            WindowEvent::CursorMoved { position, .. } => {
                Some(Self::MouseMoved(vec2(position.x as f32, position.y as f32)))
            }

            WindowEvent::MouseWheel { delta, .. } => Some(Self::MouseWheel(match delta {
                MouseScrollDelta::LineDelta(x, y) => vec2(*x, *y),
                MouseScrollDelta::PixelDelta(position) => {
                    vec2(position.x as f32, position.y as f32)
                }
            })),

            _ => None,
        }
    }
}

/// Translates one `gilrs` event into zero, one or two [`InputEvent`]s.
///
/// A stick axis moving produces one event for each of its two half-axis buttons.
pub fn gamepad_events(event: gilrs::EventType) -> Vec<InputEvent> {
    match event {
        gilrs::EventType::AxisChanged(axis, value, _) => {
            let Some((positive, negative)) = axis_buttons(axis) else {
                return Vec::new();
            };

            vec![
                InputEvent::GamepadButton {
                    button: positive,
                    value: value.max(0.0),
                },
                InputEvent::GamepadButton {
                    button: negative,
                    value: (-value).max(0.0),
                },
            ]
        }

        gilrs::EventType::ButtonChanged(button, value, _) => vec![InputEvent::GamepadButton {
            button: button_code(button),
            value,
        }],

        gilrs::EventType::Disconnected => vec![InputEvent::GamepadDisconnected],

        _ => Vec::new(),
    }
}

/// The (positive, negative) half-axis buttons of a stick axis.
pub fn axis_buttons(axis: gilrs::Axis) -> Option<(ButtonCode, ButtonCode)> {
    match axis {
        gilrs::Axis::LeftStickX => Some((ButtonCode::LeftStickRight, ButtonCode::LeftStickLeft)),
        gilrs::Axis::LeftStickY => Some((ButtonCode::LeftStickUp, ButtonCode::LeftStickDown)),
        gilrs::Axis::RightStickX => {
            Some((ButtonCode::RightStickRight, ButtonCode::RightStickLeft))
        }
        gilrs::Axis::RightStickY => Some((ButtonCode::RightStickUp, ButtonCode::RightStickDown)),
        gilrs::Axis::Unknown => Some((ButtonCode::Unknown, ButtonCode::Unknown)),
        gilrs::Axis::DPadX | gilrs::Axis::DPadY | gilrs::Axis::LeftZ | gilrs::Axis::RightZ => None,
    }
}

pub fn button_code(button: gilrs::Button) -> ButtonCode {
    match button {
        gilrs::Button::South => ButtonCode::South,
        gilrs::Button::East => ButtonCode::East,
        gilrs::Button::North => ButtonCode::North,
        gilrs::Button::West => ButtonCode::West,
        gilrs::Button::C => ButtonCode::C,
        gilrs::Button::Z => ButtonCode::Z,
        gilrs::Button::LeftTrigger => ButtonCode::LeftTrigger,
        gilrs::Button::RightTrigger => ButtonCode::RightTrigger,
        gilrs::Button::LeftTrigger2 => ButtonCode::LeftTrigger2,
        gilrs::Button::RightTrigger2 => ButtonCode::RightTrigger2,
        gilrs::Button::Select => ButtonCode::Select,
        gilrs::Button::Start => ButtonCode::Start,
        gilrs::Button::Mode => ButtonCode::Mode,
        gilrs::Button::LeftThumb => ButtonCode::LeftThumb,
        gilrs::Button::RightThumb => ButtonCode::RightThumb,
        gilrs::Button::DPadUp => ButtonCode::DPadUp,
        gilrs::Button::DPadDown => ButtonCode::DPadDown,
        gilrs::Button::DPadLeft => ButtonCode::DPadLeft,
        gilrs::Button::DPadRight => ButtonCode::DPadRight,
        gilrs::Button::Unknown => ButtonCode::Unknown,
    }
}

//! Windowing layer: `winit` re-exports plus platform-neutral input events.

mod input;
pub use input::*;

pub use winit::{
    application, dpi, error, event, event_loop,
    event::MouseButton,
    keyboard::{self, KeyCode, PhysicalKey, SmolStr},
    window::{self, Window, WindowAttributes},
};

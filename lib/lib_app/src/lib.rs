//! Application runner: window, GPU device and surface, event loop and frame orchestration.

use std::{error::Error, time::Duration};

use lib_gpu::{Device, Queue, TextureFormat};
use lib_input::InputState;
use lib_renderer::{RenderContext, Renderer};
use lib_window::{InputEvent, Window};

mod config;
mod error;
mod runner;
pub use config::*;
pub use error::*;

pub trait AppHandler: Sized {
    /// Window and renderer settings, read once before the window is created.
    fn config() -> AppConfig {
        AppConfig::default()
    }

    /// Called once the window and renderer exist. Load textures and fonts here.
    fn new(renderer: &mut Renderer, ctx: AppContext<'_>) -> Result<Self, AppError>;

    /// Called once per frame, after the frame's events. Input edges are cleared afterwards.
    fn update(&mut self, _delta_time: Duration, _input: &InputState, _ctx: AppContext<'_>) -> AppFlow {
        AppFlow::Continue
    }

    fn event(&mut self, event: &InputEvent, _ctx: AppContext<'_>) -> AppFlow {
        match event {
            InputEvent::CloseRequested => AppFlow::Exit,
            _ => AppFlow::Continue,
        }
    }

    /// Called between `begin_frame` and `end_frame`.
    fn draw(&mut self, renderer: &mut Renderer, input: &InputState, ctx: AppContext<'_>);
}

#[derive(Debug, Clone, Copy)]
pub struct AppContext<'a> {
    pub window: &'a Window,
    pub device: &'a Device,
    pub queue: &'a Queue,
    pub surface_format: TextureFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppFlow {
    Continue,
    Exit,
}

impl<'a> From<AppContext<'a>> for RenderContext<'a> {
    fn from(value: AppContext<'a>) -> Self {
        Self {
            device: value.device,
            queue: value.queue,
            surface_format: value.surface_format,
        }
    }
}

/// Installs `env_logger`, defaulting to `info` unless `RUST_LOG` says otherwise.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .filter_module("wgpu_hal", log::LevelFilter::Error)
        .try_init();
}

/// Runs `T` until it exits or a fatal error occurs.
pub fn run<T: AppHandler>() -> Result<(), AppError> {
    runner::run::<T>()
}

/// `err` followed by each of its sources, separated by `: `.
pub(crate) fn error_report(err: &dyn Error) -> String {
    let mut report = err.to_string();
    let mut source = err.source();
    while let Some(err) = source {
        report.push_str(": ");
        report.push_str(&err.to_string());
        source = err.source();
    }

    report
}

#[macro_export]
macro_rules! app_main {
    ($App:ty) => {
        fn main() {
            $crate::init_logging();

            if let Err(err) = $crate::run::<$App>() {
                $crate::hidden::exit_with(&err);
            }
        }
    };
}

#[doc(hidden)]
pub mod hidden {
    use crate::{AppError, error_report};

    pub fn exit_with(err: &AppError) -> ! {
        log::error!("{}", error_report(err));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_includes_sources() {
        let err = AppError::Config(ConfigError::Io {
            path: "app.toml".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        });

        assert_eq!(error_report(&err), "failed to read app.toml: denied");
    }
}

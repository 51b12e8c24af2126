use lib_gpu::{CreateSurfaceError, RequestAdapterError, RequestDeviceError};
use lib_renderer::RendererError;
use lib_window::error::{EventLoopError, OsError};
use thiserror::Error;

use crate::ConfigError;

/// Failures that stop the application.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("event loop failed")]
    EventLoop(#[from] EventLoopError),

    #[error("failed to create window")]
    Window(#[from] OsError),

    #[error("failed to create surface")]
    Surface(#[from] CreateSurfaceError),

    #[error("no suitable GPU adapter")]
    Adapter(#[from] RequestAdapterError),

    #[error("failed to create GPU device")]
    Device(#[from] RequestDeviceError),

    #[error("surface is not supported by the adapter")]
    SurfaceUnsupported,

    #[error(transparent)]
    Renderer(#[from] RendererError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

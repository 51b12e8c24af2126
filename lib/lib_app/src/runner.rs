use std::{sync::Arc, time::Instant};

use gilrs::Gilrs;
use lib_gpu::{
    Device, DeviceDescriptor, Instance, PollType, PresentMode, Queue, RequestAdapterOptions,
    Surface, SurfaceConfiguration, SurfaceError, TextureViewDescriptor,
};
use lib_input::InputState;
use lib_renderer::Renderer;
use lib_window::{
    InputEvent, WindowAttributes,
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    gamepad_events,
    window::{Window, WindowId},
};

use crate::{AppContext, AppError, AppFlow, AppHandler};

pub fn run<T: AppHandler>() -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;

    let mut runner = Runner::<T>::Uninitialized;
    event_loop.run_app(&mut runner)?;

    match runner {
        Runner::Failed(err) => Err(err),
        _ => Ok(()),
    }
}

enum Runner<T: AppHandler> {
    Uninitialized,
    Initialized(Box<InitializedRunner<T>>),
    Failed(AppError),
}

struct InitializedRunner<T: AppHandler> {
    window: Arc<Window>,
    device: Device,
    queue: Queue,
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
    gilrs: Option<Gilrs>,
    renderer: Renderer,
    input: InputState,
    app: T,
    last_instant: Instant,
}

impl<T: AppHandler> ApplicationHandler for Runner<T> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Runner::Uninitialized = self else {
            return;
        };

        *self = match InitializedRunner::new(event_loop) {
            Ok(runner) => Runner::Initialized(Box::new(runner)),
            Err(err) => {
                event_loop.exit();
                Runner::Failed(err)
            }
        };
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Runner::Initialized(init_self) = self else {
            return;
        };

        init_self.tick(event_loop);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Runner::Initialized(init_self) = self else {
            return;
        };

        init_self.window_event(event_loop, &event);
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        let Runner::Initialized(init_self) = self else {
            return;
        };

        init_self.renderer.shutdown();
        log::info!("shut down");
    }
}

impl<T: AppHandler> InitializedRunner<T> {
    fn new(event_loop: &ActiveEventLoop) -> Result<Self, AppError> {
        let config = T::config();

        let window = Arc::new(
            event_loop.create_window(
                WindowAttributes::default()
                    .with_title(config.window.title.as_str())
                    .with_inner_size(LogicalSize::new(config.window.width, config.window.height))
                    .with_resizable(config.window.resizable),
            )?,
        );

        let instance = Instance::default();

        let surface = instance.create_surface(window.clone())?;

        let adapter = pollster::block_on(instance.request_adapter(&RequestAdapterOptions {
            compatible_surface: Some(&surface),
            ..Default::default()
        }))?;

        let info = adapter.get_info();
        log::info!("using {} ({:?})", info.name, info.backend);

        let (device, queue) =
            pollster::block_on(adapter.request_device(&DeviceDescriptor::default()))?;

        let size = window.inner_size();
        let mut surface_config = surface
            .get_default_config(&adapter, size.width.max(1), size.height.max(1))
            .ok_or(AppError::SurfaceUnsupported)?;

        // Textures are uploaded as Rgba8Unorm, so colors pass through unconverted.
        let capabilities = surface.get_capabilities(&adapter);
        if let Some(format) = capabilities.formats.iter().find(|format| !format.is_srgb()) {
            surface_config.format = *format;
        }

        surface_config.present_mode = if config.window.vsync {
            PresentMode::AutoVsync
        } else {
            PresentMode::AutoNoVsync
        };

        surface.configure(&device, &surface_config);

        let gilrs = match Gilrs::new() {
            Ok(gilrs) => Some(gilrs),
            Err(err) => {
                log::warn!("gamepad support disabled: {err}");
                None
            }
        };

        let ctx = AppContext {
            window: &window,
            device: &device,
            queue: &queue,
            surface_format: surface_config.format,
        };

        let mut renderer = Renderer::new(ctx.into(), &config.renderer);
        let app = T::new(&mut renderer, ctx)?;

        Ok(Self {
            window,
            device,
            queue,
            surface,
            surface_config,
            gilrs,
            renderer,
            input: InputState::new(),
            app,
            last_instant: Instant::now(),
        })
    }

    fn tick(&mut self, event_loop: &ActiveEventLoop) {
        self.poll_gilrs_events(event_loop);

        let now = Instant::now();
        let delta_time = now.duration_since(self.last_instant);
        self.last_instant = now;

        handle_appflow!(
            event_loop,
            self.app.update(delta_time, &self.input, app_context!(self))
        );

        self.input.end_frame();
        self.window.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, event: &WindowEvent) {
        if let Some(input_event) = InputEvent::from_window_event(event) {
            self.input.event(&input_event);

            handle_appflow!(
                event_loop,
                self.app.event(&input_event, app_context!(self))
            );
        }

        match event {
            WindowEvent::RedrawRequested => self.redraw(),
            WindowEvent::Resized(size) => self.resize(*size),
            _ => {}
        }
    }

    fn redraw(&mut self) {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => Some(texture),
            Err(err @ (SurfaceError::Lost | SurfaceError::Outdated)) => {
                log::debug!("reconfiguring surface: {err}");
                self.surface.configure(&self.device, &self.surface_config);
                None
            }
            Err(err) => {
                log::debug!("no surface texture this frame: {err}");
                None
            }
        };

        let target = surface_texture
            .as_ref()
            .map(|texture| texture.texture.create_view(&TextureViewDescriptor::default()));

        if let Err(err) = self.renderer.begin_frame(target) {
            log::error!("{err}");
            return;
        }

        self.app
            .draw(&mut self.renderer, &self.input, app_context!(self));

        match self.renderer.end_frame() {
            Ok(stats) => log::trace!("{stats:?}"),
            Err(err) => log::error!("{err}"),
        }

        if let Some(texture) = surface_texture {
            self.window.pre_present_notify();
            texture.present();
        }

        if let Err(err) = self.device.poll(PollType::Poll) {
            log::warn!("failed to poll device: {err}");
        }
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }

        self.surface_config.width = size.width;
        self.surface_config.height = size.height;

        self.surface.configure(&self.device, &self.surface_config);
    }

    fn poll_gilrs_events(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gilrs) = &mut self.gilrs else {
            return;
        };

        while let Some(event) = gilrs.next_event() {
            for input_event in gamepad_events(event.event) {
                self.input.event(&input_event);

                handle_appflow!(
                    event_loop,
                    self.app.event(&input_event, app_context!(self))
                );
            }
        }
    }
}

macro_rules! app_context {
    ($runner:expr) => {
        AppContext {
            window: &$runner.window,
            device: &$runner.device,
            queue: &$runner.queue,
            surface_format: $runner.surface_config.format,
        }
    };
}

macro_rules! handle_appflow {
    ($event_loop:expr, $flow:expr) => {
        match $flow {
            AppFlow::Continue => {}
            AppFlow::Exit => {
                $event_loop.exit();
                return;
            }
        }
    };
}

use app_context;
use handle_appflow;

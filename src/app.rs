//! Application event loop and the demo lifecycle.
//!
//! Every program in this repository is a [`Demo`]: a struct holding its
//! GPU resources, created once and driven by the winit event loop. All
//! mutable state that window callbacks touch lives in an explicit
//! [`AppState`] owned by the handler; there are no free-standing globals.
//!
//! # Lifecycle
//!
//! 1. `Demo::init` is called once with a ready [`Context`]; create
//!    pipelines, buffers and textures here and configure camera or clear
//!    colour on the context.
//! 2. `window_event` / `device_event` are called per winit input event
//!    (after the shared camera-controller wiring has seen it).
//! 3. `update` runs every frame with the elapsed time.
//! 4. `render` receives the frame's target view and command encoder and
//!    records its own render pass(es).

use std::{iter, sync::Arc};

use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    window::Window,
};

use crate::{
    context::{Context, MouseButtonState},
    data_structures::texture::Texture,
};

/// A self-contained rendering demo driven by [`run`].
pub trait Demo {
    /// Build the demo's GPU resources. The context is fully initialized;
    /// failures here abort the program with a descriptive error.
    fn init(ctx: &mut Context) -> anyhow::Result<Self>
    where
        Self: Sized;

    /// Window events (keyboard, cursor, ...), after the shared wiring.
    fn window_event(&mut self, _ctx: &mut Context, _event: &WindowEvent) {}

    /// Raw device events (relative mouse motion and the like).
    fn device_event(&mut self, _ctx: &mut Context, _event: &DeviceEvent) {}

    /// Per-frame state update with the elapsed time since the last frame.
    fn update(&mut self, _ctx: &mut Context, _dt: Duration) {}

    /// Record render passes for this frame.
    fn render(
        &mut self,
        ctx: &Context,
        view: &wgpu::TextureView,
        encoder: &mut wgpu::CommandEncoder,
    );
}

/// Application state bundle: GPU context, the demo, and surface status.
struct AppState<D: Demo> {
    ctx: Context,
    demo: D,
    is_surface_configured: bool,
}

impl<D: Demo> AppState<D> {
    fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        // The only async in this crate is wgpu's own setup; resolve it
        // here and stay synchronous everywhere else.
        let mut ctx = futures::executor::block_on(Context::new(window))?;
        let demo = D::init(&mut ctx)?;
        Ok(Self {
            ctx,
            demo,
            is_surface_configured: false,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.ctx.config.width = width;
            self.ctx.config.height = height;
            self.is_surface_configured = true;
            self.ctx.projection.resize(width, height);
            self.ctx
                .surface
                .configure(&self.ctx.device, &self.ctx.config);
            self.ctx.depth_texture = Texture::create_depth_texture(
                &self.ctx.device,
                [self.ctx.config.width, self.ctx.config.height],
                "depth_texture",
            );
        }
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured.
        if !self.is_surface_configured {
            return Ok(());
        }

        let output = self.ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        self.demo.render(&self.ctx, &view, &mut encoder);

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

struct App<D: Demo> {
    title: String,
    state: Option<AppState<D>>,
    // Initialization happens inside `resumed`, which cannot return an
    // error; park it here so `run` can.
    init_error: Option<anyhow::Error>,
    last_time: Instant,
}

impl<D: Demo> ApplicationHandler for App<D> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let window_attributes = Window::default_attributes().with_title(self.title.clone());
        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("could not create a window: {}", e);
                self.init_error = Some(e.into());
                event_loop.exit();
                return;
            }
        };

        match AppState::new(window) {
            Ok(mut state) => {
                let size = state.ctx.window.inner_size();
                state.resize(size.width, size.height);
                state.ctx.window.request_redraw();
                self.state = Some(state);
            }
            Err(e) => {
                log::error!("app initialization failed: {:#}", e);
                self.init_error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            // Mouse-look only while the right button is held.
            if let MouseButtonState::Right = state.ctx.mouse.pressed {
                state.ctx.camera.controller.handle_mouse(dx, dy);
            }
        }
        state.demo.device_event(&mut state.ctx, &event);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let state = match &mut self.state {
            Some(state) => state,
            None => return,
        };

        state.ctx.camera.controller.handle_window_events(&event);

        if let WindowEvent::CursorMoved { position, .. } = event {
            state.ctx.mouse.coords = position;
        }

        state.demo.window_event(&mut state.ctx, &event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => match (button, button_state.is_pressed()) {
                (MouseButton::Left, true) => state.ctx.mouse.pressed = MouseButtonState::Left,
                (MouseButton::Right, true) => state.ctx.mouse.pressed = MouseButtonState::Right,
                (_, false) => state.ctx.mouse.pressed = MouseButtonState::None,
                _ => (),
            },
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();

                match state.render() {
                    Ok(_) => {
                        // Advance the camera and push the shared uniforms
                        // for the next frame.
                        state
                            .ctx
                            .camera
                            .controller
                            .update(&mut state.ctx.camera.camera, dt);
                        state
                            .ctx
                            .camera
                            .uniform
                            .update_view_proj(&state.ctx.camera.camera, &state.ctx.projection);
                        state.ctx.queue.write_buffer(
                            &state.ctx.camera.buffer,
                            0,
                            bytemuck::cast_slice(&[state.ctx.camera.uniform]),
                        );
                        state.ctx.queue.write_buffer(
                            &state.ctx.light.buffer,
                            0,
                            bytemuck::cast_slice(&[state.ctx.light.uniform]),
                        );
                        state.demo.update(&mut state.ctx, dt);
                    }
                    // Reconfigure the surface if it's lost or outdated.
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("unable to render: {}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Run a demo until its window closes.
pub fn run<D: Demo>(title: &str) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    }

    let event_loop = EventLoop::new()?;
    let mut app: App<D> = App {
        title: title.to_string(),
        state: None,
        init_error: None,
        last_time: Instant::now(),
    };
    event_loop.run_app(&mut app)?;

    match app.init_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

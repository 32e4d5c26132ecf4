//! Flow control and application event loop.
//!
//! A "flow" represents one part of a demo (the zoo, the sky, the sound
//! triggers, the title screen...) that handles user input, updates its state
//! and provides renderable objects each frame. The engine runs all flows side
//! by side and shares one user state `S` between them.
//!
//! # User-facing types
//!
//! - [`GraphicsFlow<S>`] is the trait for flows that handle events and rendering
//! - [`Out`] lets a hook reconfigure the [`Context`] after it returns
//! - [`run`] opens the window, builds the flows and drives the loop
//!
//! # Lifecycle Flow
//!
//! The event loop follows this pattern each frame:
//! 1. Collect window/device events
//! 2. Call `on_<device/window>_events` on all flows for event distribution
//! 3. Collect every flow's `on_render()` and draw the batches (models, then sky)
//! 4. Draw the GUI (feature `ui`)
//! 5. Present the frame
//! 6. Update the camera and the flows (via `on_update` / `on_tick`)

use std::{fmt::Debug, iter, pin::Pin, sync::Arc};

use anyhow::Context as _;
use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, MouseButton, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::{
    config::DemoConfig,
    context::{Context, InitContext},
    data_structures::{model::DrawModel, texture::Texture},
    render::{Flat, Instanced},
};

/// Output of every lifecycle hook.
///
/// `Out::Configure` can be used to modify the Context during runtime for
/// instance to change the tick speed, the clear colour or the window title.
///
/// `Empty` is the default output used when nothing needs to change.
pub enum Out {
    Configure(Box<dyn FnOnce(&mut Context)>),
    Empty,
}

impl Default for Out {
    fn default() -> Self {
        Self::Empty
    }
}

impl Debug for Out {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Out::Configure(_) => f.write_str("Configure(|&mut Context| -> {...})"),
            Out::Empty => f.write_str("Empty"),
        }
    }
}

/// Trait for implementing one part of a demo.
///
/// # Lifecycle
///
/// 1. `on_init()` is called once when the flow is created; configure context (clear color, etc.)
/// 2. `on_window_events()` and `on_device_events()` are called for each winit input event
/// 3. `on_update()` is called every frame
/// 4. `on_tick()` is called every `tick_duration_millis`
/// 5. `on_render()` is called each frame and specifies how to render `self`
/// 6. `on_gui()` (feature `ui`) is called each frame inside an imgui frame
pub trait GraphicsFlow<S> {
    /// Initialize the flow and configure the context.
    fn on_init(&mut self, _ctx: &mut Context, _state: &mut S) -> Out {
        Out::Empty
    }

    /// Update state every frame.
    ///
    /// Called every frame with the elapsed time `dt`.
    fn on_update(&mut self, ctx: &Context, state: &mut S, dt: Duration) -> Out;

    /// Update state periodically.
    ///
    /// Called every `tick_duration_millis` milliseconds (configurable via context).
    fn on_tick(&mut self, _ctx: &Context, _state: &mut S) -> Out {
        Out::Empty
    }

    /// Handle raw device events (mouse motion and other hardware input).
    fn on_device_events(&mut self, _ctx: &Context, _state: &mut S, _event: &DeviceEvent) -> Out {
        Out::Empty
    }

    /// Handle window events (keyboard, mouse buttons, window resizing, etc.).
    fn on_window_events(&mut self, _ctx: &Context, _state: &mut S, _event: &WindowEvent) -> Out {
        Out::Empty
    }

    /// Return renderable objects for this flow.
    ///
    /// Called each frame. The engine batches all flows' renders per pipeline.
    fn on_render(&self, state: &S) -> crate::render::Render<'_>;

    /// Build immediate mode widgets.
    #[cfg(feature = "ui")]
    fn on_gui(&mut self, _ctx: &Context, _state: &mut S, _ui: &imgui::Ui) {}
}

impl<S> Debug for dyn GraphicsFlow<S> + 'static {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("GraphicsFlow")
    }
}

/// Type alias for a flow constructor (factory function).
///
/// A flow constructor takes an `InitContext` and asynchronously returns a
/// boxed `GraphicsFlow`, or the reason it could not be built.
pub type FlowConstructor<S> = Box<
    dyn FnOnce(InitContext) -> Pin<Box<dyn Future<Output = anyhow::Result<Box<dyn GraphicsFlow<S>>>>>>,
>;

/// Wraps an async closure into a [`FlowConstructor`].
pub fn constructor<S, F, Fut>(f: F) -> FlowConstructor<S>
where
    S: 'static,
    F: FnOnce(InitContext) -> Fut + 'static,
    Fut: Future<Output = anyhow::Result<Box<dyn GraphicsFlow<S>>>> + 'static,
{
    Box::new(
        move |ctx| -> Pin<Box<dyn Future<Output = anyhow::Result<Box<dyn GraphicsFlow<S>>>>>> {
            Box::pin(f(ctx))
        },
    )
}

/// Application state bundle: GPU context, app state, and surface status.
pub struct AppState<State: 'static> {
    pub(crate) ctx: Context,
    state: State,
    is_surface_configured: bool,
    #[cfg(feature = "ui")]
    gui: crate::gui::Gui,
}

impl<State> AppState<State> {
    async fn new(window: Arc<Window>, config: &DemoConfig, state: State) -> anyhow::Result<Self> {
        let ctx = Context::new(window, config)
            .await
            .context("App initialization failed. Cannot create the main context")?;
        #[cfg(feature = "ui")]
        let gui = crate::gui::Gui::new(&ctx);
        let mut app_state = Self {
            ctx,
            state,
            is_surface_configured: false,
            #[cfg(feature = "ui")]
            gui,
        };
        let size = app_state.ctx.window.inner_size();
        app_state.resize(size.width, size.height);
        Ok(app_state)
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

    fn render(
        &mut self,
        graphics_flows: &mut [Box<dyn GraphicsFlow<State>>],
    ) -> Result<(), wgpu::SurfaceError> {
        // invoke main render loop
        self.ctx.window.request_redraw();

        // Rendering requires the surface to be configured
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
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.ctx.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let mut basics: Vec<Instanced> = Vec::new();
            let mut skies: Vec<Flat> = Vec::new();
            graphics_flows.iter().for_each(|flow| {
                flow.on_render(&self.state)
                    .set_pipelines(&mut basics, &mut skies);
            });

            render_pass.set_pipeline(&self.ctx.pipelines.basic);
            for instanced in basics {
                if instanced.amount == 0 || instanced.instance.size() == 0 {
                    log::warn!("you attemted to render something with zero instances");
                    continue;
                }
                render_pass.set_vertex_buffer(1, instanced.instance.slice(..));
                render_pass.draw_model_instanced(
                    instanced.model,
                    0..instanced.amount as u32,
                    &self.ctx.camera.bind_group,
                    &self.ctx.light.bind_group,
                );
            }

            render_pass.set_pipeline(&self.ctx.pipelines.sky);
            for sky in skies {
                render_pass.set_bind_group(0, &self.ctx.camera.bind_group, &[]);
                render_pass.set_bind_group(1, sky.group, &[]);
                render_pass.set_vertex_buffer(0, sky.vertex.slice(..));
                render_pass.set_index_buffer(sky.index.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..sky.amount as u32, 0, 0..1);
            }
        }

        #[cfg(feature = "ui")]
        {
            let ctx = &self.ctx;
            let state = &mut self.state;
            self.gui.draw(ctx, &mut encoder, &view, |ui| {
                graphics_flows
                    .iter_mut()
                    .for_each(|flow| flow.on_gui(ctx, state, ui));
            });
        }

        self.ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}

pub struct App<State: 'static> {
    async_runtime: tokio::runtime::Runtime,
    config: DemoConfig,
    initial_state: Option<State>,
    state: Option<AppState<State>>,
    // This will hold the fully initialized flows once they are ready.
    graphics_flows: Vec<Box<dyn GraphicsFlow<State>>>,
    // We use Option to `take()` it after use.
    constructors: Option<Vec<FlowConstructor<State>>>,
    last_time: Instant,
    time_since_tick: Duration,
    error: Option<anyhow::Error>,
}

impl<State: 'static> App<State> {
    fn new(
        config: DemoConfig,
        state: State,
        constructors: Vec<FlowConstructor<State>>,
    ) -> anyhow::Result<Self> {
        let async_runtime = tokio::runtime::Runtime::new()?;
        Ok(Self {
            async_runtime,
            config,
            initial_state: Some(state),
            state: None,
            graphics_flows: Vec::new(),
            constructors: Some(constructors),
            last_time: Instant::now(),
            time_since_tick: Duration::from_millis(0),
            error: None,
        })
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> anyhow::Result<()> {
        let window_attributes = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(event_loop.create_window(window_attributes)?);

        let constructors = self.constructors.take().unwrap_or_default();
        let state = self
            .initial_state
            .take()
            .context("the application state was already consumed")?;
        let config = &self.config;

        let init_future = async move {
            let app_state = AppState::new(window, config, state).await?;
            let flow_futures: Vec<_> = constructors
                .into_iter()
                // The clone in into() leverages the internal Arcs of Device and Queue and thus only clones the ref
                .map(|constructor| constructor((&app_state.ctx).into()))
                .collect();
            let flows = futures::future::join_all(flow_futures)
                .await
                .into_iter()
                .collect::<anyhow::Result<Vec<_>>>()?;
            anyhow::Ok((app_state, flows))
        };

        let (mut app_state, flows) = self.async_runtime.block_on(init_future)?;
        self.graphics_flows = flows;
        for flow in self.graphics_flows.iter_mut() {
            let out = flow.on_init(&mut app_state.ctx, &mut app_state.state);
            handle_flow_output(&mut app_state.ctx, out);
        }
        self.last_time = Instant::now();
        self.state = Some(app_state);
        Ok(())
    }
}

impl<State: 'static> ApplicationHandler for App<State> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.error.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            log::error!("{e:#}");
            self.error = Some(e);
            event_loop.exit();
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
            state.ctx.camera.controller.handle_mouse(dx, dy);
        }
        self.graphics_flows.iter_mut().for_each(|f| {
            let out = f.on_device_events(&state.ctx, &mut state.state, &event);
            handle_flow_output(&mut state.ctx, out);
        });
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

        #[cfg(feature = "ui")]
        let captured = state.gui.handle_input(&state.ctx.window, &event);
        #[cfg(not(feature = "ui"))]
        let captured = false;

        if !captured {
            state.ctx.camera.controller.handle_window_events(&event);
            if let WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: button_state,
                ..
            } = event
            {
                state.ctx.window.set_cursor_visible(!button_state.is_pressed());
            }

            self.graphics_flows.iter_mut().for_each(|f| {
                let out = f.on_window_events(&state.ctx, &mut state.state, &event);
                handle_flow_output(&mut state.ctx, out);
            });
        }

        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size.width, size.height),
            WindowEvent::RedrawRequested => {
                let dt = self.last_time.elapsed();
                self.last_time = Instant::now();
                self.time_since_tick += dt;

                match state.render(&mut self.graphics_flows) {
                    Ok(_) => {
                        if self.time_since_tick
                            >= Duration::from_millis(state.ctx.tick_duration_millis)
                        {
                            self.graphics_flows.iter_mut().for_each(|f| {
                                let out = f.on_tick(&state.ctx, &mut state.state);
                                handle_flow_output(&mut state.ctx, out);
                            });
                            self.time_since_tick = Duration::from_millis(0);
                        }
                        state
                            .ctx
                            .camera
                            .update(&state.ctx.queue, &state.ctx.projection, dt);
                        self.graphics_flows.iter_mut().for_each(|f| {
                            let out = f.on_update(&state.ctx, &mut state.state, dt);
                            handle_flow_output(&mut state.ctx, out);
                        });
                    }
                    // Reconfigure the surface if it's lost or outdated
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.ctx.window.inner_size();
                        state.resize(size.width, size.height);
                    }
                    Err(e) => {
                        log::error!("Unable to render {}", e);
                    }
                }
            }
            _ => {}
        }
    }
}

fn handle_flow_output(ctx: &mut Context, out: Out) {
    match out {
        Out::Configure(f) => f(ctx),
        Out::Empty => (),
    }
}

/// Opens the window described by `config`, builds the flows and runs the event
/// loop until the window is closed.
///
/// Returns the first error raised while creating the GPU context or any flow.
pub fn run<State: 'static>(
    config: DemoConfig,
    state: State,
    constructors: Vec<FlowConstructor<State>>,
) -> anyhow::Result<()> {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    };

    let event_loop = EventLoop::new()?;
    let mut app: App<State> = App::new(config, state, constructors)?;

    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

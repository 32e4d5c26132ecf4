//! ImGui integration and the debug overlay flow.
//!
//! Flows draw their widgets in [`GraphicsFlow::on_gui`]; [`Gui`] wraps the
//! imgui context, forwards window input to it and renders the frame on top of
//! the scene.

use imgui::{Condition, MouseCursor};
use imgui_wgpu::{Renderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use instant::{Duration, Instant};
use winit::{
    event::{Event, WindowEvent},
    window::Window,
};

use crate::{
    context::Context,
    flow::{GraphicsFlow, Out},
    overlay::{OverlayInput, OverlayModel},
    render::Render,
    scene::ZooState,
    title::Stage,
};

pub struct Gui {
    context: imgui::Context,
    platform: WinitPlatform,
    renderer: Renderer,
    last_frame: Instant,
    last_cursor: Option<MouseCursor>,
}

impl Gui {
    pub fn new(ctx: &Context) -> Self {
        let mut context = imgui::Context::create();
        context.set_ini_filename(None);

        // DPI is locked, the overlay is laid out in physical pixels
        let mut platform = WinitPlatform::new(&mut context);
        platform.attach_window(context.io_mut(), &ctx.window, HiDpiMode::Locked(1.0));

        context.fonts().add_font(&[imgui::FontSource::DefaultFontData {
            config: Some(imgui::FontConfig {
                oversample_h: 1,
                pixel_snap_h: true,
                size_pixels: 16.0,
                ..Default::default()
            }),
        }]);

        let renderer_config = RendererConfig {
            texture_format: ctx.config.format,
            ..Default::default()
        };
        let renderer = Renderer::new(&mut context, &ctx.device, &ctx.queue, renderer_config);

        Self {
            context,
            platform,
            renderer,
            last_frame: Instant::now(),
            last_cursor: None,
        }
    }

    /// Returns whether imgui keeps the event for itself. Releases are never kept.
    pub fn handle_input(&mut self, window: &Window, event: &WindowEvent) -> bool {
        match event {
            WindowEvent::CursorMoved { .. }
            | WindowEvent::MouseInput { .. }
            | WindowEvent::MouseWheel { .. }
            | WindowEvent::KeyboardInput { .. }
            | WindowEvent::Focused(_)
            | WindowEvent::Resized(_) => {
                let wrapped: Event<()> = Event::WindowEvent {
                    window_id: window.id(),
                    event: event.clone(),
                };
                self.platform
                    .handle_event(self.context.io_mut(), window, &wrapped);
                let io = self.context.io();
                OverlayInput::from(event).captured(io.want_capture_mouse, io.want_capture_keyboard)
            }
            _ => false,
        }
    }

    /// Builds one imgui frame with `run_ui` and renders it over `view`.
    pub fn draw<F>(
        &mut self,
        ctx: &Context,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        run_ui: F,
    ) where
        F: FnOnce(&imgui::Ui),
    {
        let now = Instant::now();
        self.context
            .io_mut()
            .update_delta_time(now.duration_since(self.last_frame).max(Duration::from_micros(1)));
        self.last_frame = now;

        if let Err(e) = self.platform.prepare_frame(self.context.io_mut(), &ctx.window) {
            log::error!("Skipping the GUI frame: {e}");
            return;
        }

        let ui = self.context.frame();
        run_ui(&ui);
        if self.last_cursor != ui.mouse_cursor() {
            self.last_cursor = ui.mouse_cursor();
            self.platform.prepare_render(&ui, &ctx.window);
        }

        let draw_data = self.context.render();
        if draw_data.display_size[0] <= 0.0 || draw_data.display_size[1] <= 0.0 {
            return;
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("GUI Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    // keep the scene underneath
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if let Err(e) = self
            .renderer
            .render(draw_data, &ctx.queue, &ctx.device, &mut render_pass)
        {
            log::error!("Failed to render the GUI: {e:?}");
        }
    }
}

/// Camera position readout and controls help.
#[derive(Debug, Default)]
pub struct OverlayFlow;

impl OverlayFlow {
    pub fn new() -> Self {
        Self
    }
}

impl GraphicsFlow<ZooState> for OverlayFlow {
    fn on_update(&mut self, _ctx: &Context, _state: &mut ZooState, _dt: Duration) -> Out {
        Out::Empty
    }

    fn on_render(&self, _state: &ZooState) -> Render<'_> {
        Render::None
    }

    fn on_gui(&mut self, ctx: &Context, state: &mut ZooState, ui: &imgui::Ui) {
        if state.stage != Stage::Zoo {
            return;
        }
        let model = OverlayModel::new(ctx.camera.camera.position, ctx.window_size());

        ui.window(model.camera.title)
            .size(model.camera.size, Condition::FirstUseEver)
            .position(model.camera.position, Condition::FirstUseEver)
            .build(|| model.camera.lines.iter().for_each(|line| ui.text(line)));

        // pinned to the bottom right corner, also after resizing
        ui.window(model.info.title)
            .size(model.info.size, Condition::Always)
            .position(model.info.position, Condition::Always)
            .resizable(false)
            .build(|| model.info.lines.iter().for_each(|line| ui.text(line)));
    }
}

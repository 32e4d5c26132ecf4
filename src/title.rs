//! Title screen shown before the zoo.

use instant::Duration;
use winit::{
    event::{ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

use crate::{
    config::CameraConfig,
    context::Context,
    flow::{GraphicsFlow, Out},
    render::Render,
    scene::ZooState,
};

/// What the demo currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    Title,
    #[default]
    Zoo,
}

impl Stage {
    /// Enter leaves the title screen; nothing leads back to it.
    pub fn on_key(self, key: KeyCode, state: ElementState) -> Stage {
        match (self, key, state) {
            (Stage::Title, KeyCode::Enter | KeyCode::NumpadEnter, ElementState::Pressed) => {
                Stage::Zoo
            }
            (stage, _, _) => stage,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TitleScreen {
    pub title: String,
    pub names: Vec<String>,
    pub prompt: String,
}

impl Default for TitleScreen {
    fn default() -> Self {
        Self {
            title: "LOREM IPSUM ZOO".to_string(),
            names: (1..=4).map(|i| format!("Lorem {i}")).collect(),
            prompt: "Press ENTER to start".to_string(),
        }
    }
}

impl TitleScreen {
    /// Title, names and prompt, top to bottom.
    pub fn lines(&self) -> Vec<&str> {
        std::iter::once(self.title.as_str())
            .chain(self.names.iter().map(String::as_str))
            .chain(std::iter::once(self.prompt.as_str()))
            .collect()
    }

    /// Window title used while the title screen is up.
    pub fn caption(&self) -> String {
        format!("{} - {}", self.title, self.prompt)
    }
}

/// Keeps the demo on a black screen until Enter is pressed.
pub struct TitleFlow {
    screen: TitleScreen,
    window_title: String,
    clear_colour: [f64; 4],
    camera: CameraConfig,
}

impl TitleFlow {
    /// `window_title` and `clear_colour` are restored when the zoo starts, and
    /// the camera is put back at its start so keys pressed on the title screen
    /// do not move it.
    pub fn new(
        screen: TitleScreen,
        window_title: String,
        clear_colour: [f64; 4],
        camera: CameraConfig,
    ) -> Self {
        Self {
            screen,
            window_title,
            clear_colour,
            camera,
        }
    }

    pub fn screen(&self) -> &TitleScreen {
        &self.screen
    }
}

impl GraphicsFlow<ZooState> for TitleFlow {
    fn on_init(&mut self, _ctx: &mut Context, state: &mut ZooState) -> Out {
        if state.stage != Stage::Title {
            return Out::Empty;
        }
        for line in self.screen.lines() {
            log::info!("{line}");
        }
        let caption = self.screen.caption();
        Out::Configure(Box::new(move |ctx: &mut Context| {
            ctx.clear_colour = wgpu::Color::BLACK;
            ctx.set_window_title(&caption);
        }))
    }

    fn on_window_events(&mut self, _ctx: &Context, state: &mut ZooState, event: &WindowEvent) -> Out {
        let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(key),
                    state: key_state,
                    ..
                },
            ..
        } = event
        else {
            return Out::Empty;
        };
        let next = state.stage.on_key(*key, *key_state);
        if next == state.stage {
            return Out::Empty;
        }
        state.stage = next;
        log::info!("Entering the zoo");
        let window_title = self.window_title.clone();
        let [r, g, b, a] = self.clear_colour;
        let start = self.camera.camera();
        Out::Configure(Box::new(move |ctx: &mut Context| {
            ctx.clear_colour = wgpu::Color { r, g, b, a };
            ctx.set_window_title(&window_title);
            ctx.camera.camera = start;
            ctx.camera.controller.reset();
        }))
    }

    fn on_update(&mut self, _ctx: &Context, _state: &mut ZooState, _dt: Duration) -> Out {
        Out::Empty
    }

    fn on_render(&self, _state: &ZooState) -> Render<'_> {
        Render::None
    }

    #[cfg(feature = "ui")]
    fn on_gui(&mut self, _ctx: &Context, state: &mut ZooState, ui: &imgui::Ui) {
        if state.stage != Stage::Title {
            return;
        }
        ui.window("##title")
            .title_bar(false)
            .resizable(false)
            .movable(false)
            .bg_alpha(0.0)
            .position([10.0, 200.0], imgui::Condition::Always)
            .size([400.0, 260.0], imgui::Condition::Always)
            .build(|| {
                ui.set_window_font_scale(2.0);
                ui.text(&self.screen.title);
                ui.set_window_font_scale(1.0);
                ui.spacing();
                for name in &self.screen.names {
                    ui.text(name);
                }
                ui.spacing();
                ui.spacing();
                ui.text(&self.screen.prompt);
            });
    }
}

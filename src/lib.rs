//! zoo-ngin
//!
//! A handful of zoo walk-through demos built on a small instancing engine.
//! Models are imported from glTF or OBJ files, placed by hand in a fixed scene
//! graph and rendered under a skydome. Demos can additionally play sounds when
//! the camera walks up to an enclosure and draw an imgui debug overlay
//! (feature `ui`).
//!
//! High-level modules
//! - `audio`: proximity sound triggers and their rodio backend
//! - `camera`: fly camera, controller and uniforms for view/projection
//! - `config`: demo configuration and the built-in presets
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: engine data models (meshes, instances, textures, scene graph)
//! - `flow`: high level flow control (scenes / update loop)
//! - `overlay`: what the debug overlay shows, independent of the GUI backend
//! - `pipelines`: render pipelines (lit models, skydome) and the light uniform
//! - `resources`: asset lookup and model/texture import
//! - `render`: render composition for pipeline batching
//! - `scene`: hand placed zoo layout and the zoo flow
//! - `sky`: skydome geometry and flow
//! - `title`: title screen stage

pub mod audio;
pub mod camera;
pub mod config;
pub mod context;
pub mod data_structures;
pub mod flow;
#[cfg(feature = "ui")]
pub mod gui;
pub mod overlay;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;
pub mod sky;
pub mod title;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use winit::event::DeviceEvent;
pub use winit::event::WindowEvent;

use crate::{
    audio::ProximitySoundFlow,
    config::DemoConfig,
    flow::{FlowConstructor, GraphicsFlow, constructor},
    scene::{ZooState, zoo::ZooFlow},
    sky::SkyFlow,
    title::{Stage, TitleFlow},
};

fn boxed<F: GraphicsFlow<ZooState> + 'static>(flow: F) -> Box<dyn GraphicsFlow<ZooState>> {
    Box::new(flow)
}

/// Assemble the flows a [`DemoConfig`] asks for and run the event loop.
pub fn run_demo(config: DemoConfig) -> anyhow::Result<()> {
    let stage = match config.title_screen {
        Some(_) => Stage::Title,
        None => Stage::Zoo,
    };
    let mut constructors: Vec<FlowConstructor<ZooState>> = Vec::new();

    if let Some(screen) = config.title_screen.clone() {
        let window_title = config.title.clone();
        let clear_colour = config.clear_colour;
        let camera = config.camera;
        constructors.push(constructor(move |_| async move {
            Ok::<_, anyhow::Error>(boxed(TitleFlow::new(
                screen,
                window_title,
                clear_colour,
                camera,
            )))
        }));
    }

    let exhibits = config.exhibits.clone();
    let controlled = config.controlled.clone();
    constructors.push(constructor(move |ctx| async move {
        let zoo = ZooFlow::new(&ctx, exhibits, controlled).await?;
        Ok::<_, anyhow::Error>(boxed(zoo))
    }));

    if let Some(sky) = config.sky.clone() {
        constructors.push(constructor(move |ctx| async move {
            let sky = SkyFlow::new(&ctx, &sky).await?;
            Ok::<_, anyhow::Error>(boxed(sky))
        }));
    }

    if !config.sounds.is_empty() {
        let sounds = config.sounds.clone();
        constructors.push(constructor(move |_| async move {
            Ok::<_, anyhow::Error>(boxed(ProximitySoundFlow::new(&sounds)))
        }));
    }

    if config.overlay {
        #[cfg(feature = "ui")]
        constructors.push(constructor(move |_| async move {
            Ok::<_, anyhow::Error>(boxed(gui::OverlayFlow::new()))
        }));
        #[cfg(not(feature = "ui"))]
        log::warn!("The debug overlay needs the `ui` feature; continuing without it.");
    }

    flow::run(config, ZooState::new(stage), constructors)
}

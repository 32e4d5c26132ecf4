//! Proximity sounds.
//!
//! A [`ProximitySoundSystem`] holds a fixed set of triggers, each a clip bound
//! to a sphere in the world. Every frame the camera position is checked against
//! all triggers and clips start when the camera walks in. Playback goes through
//! an [`AudioBackend`]; the demos use [`RodioBackend`].

use std::path::Path;

use instant::Duration;

use crate::{
    config::{SoundTriggerConfig, SoundsConfig},
    context::Context,
    flow::{GraphicsFlow, Out},
    render::Render,
    resources::{asset_root, resolve_in},
    scene::ZooState,
    title::Stage,
};

mod proximity;
mod rodio_backend;

pub use proximity::{DEFAULT_COOLDOWN, ProximitySoundSystem, ProximityTrigger, RetriggerPolicy};
pub use rodio_backend::RodioBackend;

/// Loads and plays clips.
pub trait AudioBackend {
    /// A decoded or decodable clip, loaded once per trigger.
    type Clip;
    /// Handle of one playback of a clip.
    type Voice;

    fn load(&mut self, path: &Path) -> anyhow::Result<Self::Clip>;
    fn play(&mut self, clip: &Self::Clip) -> anyhow::Result<Self::Voice>;
    fn is_playing(&self, voice: &Self::Voice) -> bool;
}

impl ProximitySoundSystem<RodioBackend> {
    pub fn with_default_output() -> anyhow::Result<Self> {
        Ok(Self::new(RodioBackend::open_default()?))
    }
}

impl<B: AudioBackend> ProximitySoundSystem<B> {
    /// Adds the configured triggers with clips below `root` and returns how many
    /// were added. Triggers that fail are logged and skipped.
    pub fn add_triggers(&mut self, root: &Path, triggers: &[SoundTriggerConfig]) -> usize {
        triggers
            .iter()
            .filter(|trigger| {
                self.add_trigger(trigger.position, trigger.radius, &resolve_in(root, &trigger.clip))
                    .is_ok()
            })
            .count()
    }
}

/// Feeds the camera position into a [`ProximitySoundSystem`] while the zoo is shown.
pub struct ProximitySoundFlow {
    system: Option<ProximitySoundSystem<RodioBackend>>,
}

impl ProximitySoundFlow {
    /// Without an output device the flow stays silent.
    pub fn new(sounds: &SoundsConfig) -> Self {
        let mut system = match ProximitySoundSystem::with_default_output() {
            Ok(system) => system.with_policy(sounds.policy),
            Err(e) => {
                log::warn!("Audio disabled: {e:#}");
                return Self { system: None };
            }
        };
        let active = system.add_triggers(&asset_root(), &sounds.triggers);
        log::info!(
            "{active} of {} sound triggers active",
            sounds.triggers.len()
        );
        Self {
            system: Some(system),
        }
    }

    pub fn system(&self) -> Option<&ProximitySoundSystem<RodioBackend>> {
        self.system.as_ref()
    }
}

impl GraphicsFlow<ZooState> for ProximitySoundFlow {
    fn on_update(&mut self, ctx: &Context, state: &mut ZooState, _dt: Duration) -> Out {
        if state.stage != Stage::Zoo {
            return Out::Empty;
        }
        if let Some(system) = &mut self.system {
            system.update(ctx.camera.camera.position);
        }
        Out::Empty
    }

    fn on_render(&self, _state: &ZooState) -> Render<'_> {
        Render::None
    }

    #[cfg(feature = "ui")]
    fn on_gui(&mut self, ctx: &Context, state: &mut ZooState, ui: &imgui::Ui) {
        let Some(system) = &self.system else {
            return;
        };
        if state.stage != Stage::Zoo {
            return;
        }
        let listener = ctx.camera.camera.position;
        ui.window("Sounds")
            .size([260.0, 160.0], imgui::Condition::FirstUseEver)
            .position([220.0, 70.0], imgui::Condition::FirstUseEver)
            .build(|| {
                for trigger in system.triggers() {
                    let name = trigger
                        .path
                        .file_stem()
                        .map(|s| s.to_string_lossy())
                        .unwrap_or_default();
                    let status = if trigger.is_playing() { "playing" } else { "" };
                    ui.text(format!(
                        "{name}: {:.1} / {:.0} {status}",
                        trigger.distance_to(listener),
                        trigger.radius
                    ));
                }
            });
    }
}

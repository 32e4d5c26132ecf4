use std::path::{Path, PathBuf};

use anyhow::bail;
use cgmath::{MetricSpace, Point3};
use instant::{Duration, Instant};

use super::AudioBackend;

pub const DEFAULT_COOLDOWN: Duration = Duration::from_secs(10);

/// When a trigger may play again after it has played once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetriggerPolicy {
    /// Play whenever the listener is inside, the clip has finished and the
    /// cooldown has passed since the last start.
    Cooldown(Duration),
    /// Play once per visit; the listener has to leave the radius to re-arm it.
    OnReentry,
}

impl Default for RetriggerPolicy {
    fn default() -> Self {
        Self::Cooldown(DEFAULT_COOLDOWN)
    }
}

/// A sound source bound to a spot in the world.
pub struct ProximityTrigger<B: AudioBackend> {
    pub position: Point3<f32>,
    pub radius: f32,
    pub path: PathBuf,
    clip: B::Clip,
    voice: Option<B::Voice>,
    playing: bool,
    last_played: Option<Instant>,
    armed: bool,
}

impl<B: AudioBackend> ProximityTrigger<B> {
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// `None` until the trigger has started once.
    pub fn last_played(&self) -> Option<Instant> {
        self.last_played
    }

    pub fn distance_to(&self, listener: Point3<f32>) -> f32 {
        self.position.distance(listener)
    }

    pub fn contains(&self, listener: Point3<f32>) -> bool {
        self.distance_to(listener) < self.radius
    }

    fn is_due(&self, policy: RetriggerPolicy, now: Instant) -> bool {
        match policy {
            RetriggerPolicy::Cooldown(cooldown) => self
                .last_played
                .is_none_or(|last| now.saturating_duration_since(last) >= cooldown),
            RetriggerPolicy::OnReentry => self.armed,
        }
    }
}

/// Starts clips when the listener walks up to their trigger.
pub struct ProximitySoundSystem<B: AudioBackend> {
    backend: B,
    policy: RetriggerPolicy,
    triggers: Vec<ProximityTrigger<B>>,
}

impl<B: AudioBackend> ProximitySoundSystem<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            policy: RetriggerPolicy::default(),
            triggers: Vec::new(),
        }
    }

    pub fn with_policy(mut self, policy: RetriggerPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> RetriggerPolicy {
        self.policy
    }

    /// Loads `path` and registers a trigger for it. A clip that cannot be
    /// loaded is reported and leaves the system unchanged.
    pub fn add_trigger<P: Into<Point3<f32>>>(
        &mut self,
        position: P,
        radius: f32,
        path: &Path,
    ) -> anyhow::Result<usize> {
        if !(radius.is_finite() && radius > 0.0) {
            log::error!("Ignoring sound {}: radius {radius} is not positive", path.display());
            bail!("invalid trigger radius {radius} for {}", path.display());
        }
        let clip = match self.backend.load(path) {
            Ok(clip) => clip,
            Err(e) => {
                log::error!("Could not load sound {}: {e:#}", path.display());
                return Err(e);
            }
        };
        self.triggers.push(ProximityTrigger {
            position: position.into(),
            radius,
            path: path.to_path_buf(),
            clip,
            voice: None,
            playing: false,
            last_played: None,
            armed: true,
        });
        Ok(self.triggers.len() - 1)
    }

    pub fn update(&mut self, listener: Point3<f32>) -> Vec<usize> {
        self.update_at(listener, Instant::now())
    }

    /// Runs one frame of trigger checks with `now` as the current time and
    /// returns the indices of the triggers that started playing.
    pub fn update_at(&mut self, listener: Point3<f32>, now: Instant) -> Vec<usize> {
        let mut started = Vec::new();
        for (index, trigger) in self.triggers.iter_mut().enumerate() {
            trigger.playing = trigger
                .voice
                .as_ref()
                .is_some_and(|voice| self.backend.is_playing(voice));
            if !trigger.playing {
                trigger.voice = None;
            }

            if !trigger.contains(listener) {
                trigger.armed = true;
                continue;
            }
            if trigger.playing || !trigger.is_due(self.policy, now) {
                continue;
            }

            // A failed start still counts as an attempt so the error is not
            // repeated every frame.
            trigger.last_played = Some(now);
            trigger.armed = false;
            match self.backend.play(&trigger.clip) {
                Ok(voice) => {
                    log::info!("Playing {}", trigger.path.display());
                    trigger.voice = Some(voice);
                    trigger.playing = true;
                    started.push(index);
                }
                Err(e) => log::error!("Could not play {}: {e:#}", trigger.path.display()),
            }
        }
        started
    }

    pub fn triggers(&self) -> &[ProximityTrigger<B>] {
        &self.triggers
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Silent;

    impl AudioBackend for Silent {
        type Clip = ();
        type Voice = ();

        fn load(&mut self, _path: &Path) -> anyhow::Result<()> {
            Ok(())
        }

        fn play(&mut self, _clip: &()) -> anyhow::Result<()> {
            Ok(())
        }

        fn is_playing(&self, _voice: &()) -> bool {
            false
        }
    }

    #[test]
    fn rejects_non_positive_radius() {
        let mut system = ProximitySoundSystem::new(Silent);
        let origin: Point3<f32> = Point3::new(0.0, 0.0, 0.0);
        assert!(system.add_trigger(origin, 0.0, Path::new("a.wav")).is_err());
        assert!(system.add_trigger(origin, f32::NAN, Path::new("a.wav")).is_err());
        assert!(system.triggers().is_empty());
    }

    #[test]
    fn boundary_is_outside() {
        let mut system = ProximitySoundSystem::new(Silent);
        let origin: Point3<f32> = Point3::new(0.0, 0.0, 0.0);
        system.add_trigger(origin, 2.0, Path::new("a.wav")).unwrap();
        let trigger = &system.triggers()[0];
        assert!(!trigger.contains(Point3::new(2.0, 0.0, 0.0)));
        assert!(trigger.contains(Point3::new(1.99, 0.0, 0.0)));
    }
}

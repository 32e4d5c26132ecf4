//! Demo configuration.
//!
//! Everything that differs between the demo programs lives in a [`DemoConfig`]:
//! the window, the start camera, the light, the sky, the sound triggers and
//! which optional parts (title screen, overlay) run at all.

use cgmath::Deg;

use crate::{
    audio::RetriggerPolicy,
    camera::{Camera, CameraController},
    scene::{ControlledAnimal, Exhibit, layout},
    title::TitleScreen,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub yaw: Deg<f32>,
    pub pitch: Deg<f32>,
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
    /// Units per second.
    pub speed: f32,
    pub boost_factor: f32,
    /// Radians per pixel.
    pub sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 10.0, 10.0],
            // looking down -Z
            yaw: Deg(-90.0),
            pitch: Deg(0.0),
            fovy: Deg(45.0),
            znear: 1.0,
            zfar: 3000.0,
            speed: 10.0,
            boost_factor: 4.0,
            sensitivity: 0.003,
        }
    }
}

impl CameraConfig {
    /// The camera at its start position.
    pub fn camera(&self) -> Camera {
        Camera::new(self.position, self.yaw, self.pitch)
    }

    pub fn controller(&self) -> CameraController {
        CameraController::new(self.speed, self.boost_factor, self.sensitivity)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightConfig {
    pub position: [f32; 3],
    pub colour: [f32; 3],
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            position: [50.0, 100.0, 50.0],
            colour: [1.0, 1.0, 0.95],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkyConfig {
    /// Equirectangular image below the asset root.
    pub texture: String,
    pub radius: f32,
    pub sectors: u32,
    pub stacks: u32,
    /// The sphere is mirrored and scaled by this factor around the camera.
    pub scale: f32,
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            texture: "skybox/HDRI.jpg".to_string(),
            radius: 5.0,
            sectors: 64,
            stacks: 64,
            scale: 500.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SoundTriggerConfig {
    pub position: [f32; 3],
    pub radius: f32,
    /// Clip below the asset root.
    pub clip: String,
}

impl SoundTriggerConfig {
    pub fn new(position: [f32; 3], radius: f32, clip: &str) -> Self {
        Self {
            position,
            radius,
            clip: clip.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SoundsConfig {
    pub policy: RetriggerPolicy,
    pub triggers: Vec<SoundTriggerConfig>,
}

impl SoundsConfig {
    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub clear_colour: [f64; 4],
    pub tick_duration_millis: u64,
    /// `None` draws no sky.
    pub sky: Option<SkyConfig>,
    /// Debug overlay, drawn with feature `ui` only.
    pub overlay: bool,
    /// Starts on a title screen instead of the zoo.
    pub title_screen: Option<TitleScreen>,
    pub sounds: SoundsConfig,
    pub exhibits: Vec<Exhibit>,
    pub controlled: Option<ControlledAnimal>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            title: "zoo-ngin".to_string(),
            width: 1800,
            height: 800,
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            clear_colour: [0.2, 0.3, 0.4, 1.0],
            tick_duration_millis: 500,
            sky: Some(SkyConfig::default()),
            overlay: false,
            title_screen: None,
            sounds: SoundsConfig::default(),
            exhibits: Vec::new(),
            controlled: None,
        }
    }
}

impl DemoConfig {
    /// The zoo under the skydome with the debug overlay.
    pub fn zoo() -> Self {
        Self {
            title: "Zoo + Skydome".to_string(),
            overlay: true,
            exhibits: layout::zoo_exhibits(),
            controlled: Some(layout::controlled_crocodile()),
            ..Default::default()
        }
    }

    /// Title screen first, then the zoo with sounds near the enclosures.
    pub fn tour() -> Self {
        Self {
            title: "Zoo Tour".to_string(),
            title_screen: Some(TitleScreen::default()),
            sounds: SoundsConfig {
                policy: RetriggerPolicy::default(),
                triggers: layout::zoo_sounds(),
            },
            exhibits: layout::zoo_exhibits(),
            controlled: Some(layout::controlled_crocodile()),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_share_the_layout() {
        let zoo = DemoConfig::zoo();
        let tour = DemoConfig::tour();
        assert_eq!(zoo.exhibits, tour.exhibits);
        assert!(zoo.overlay && zoo.title_screen.is_none() && zoo.sounds.is_empty());
        assert!(tour.title_screen.is_some());
        assert!(!tour.sounds.is_empty());
    }
}

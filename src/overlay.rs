//! Contents and layout of the debug overlay.
//!
//! Kept free of any GUI backend so the `gui` module only has to draw it.

use cgmath::Point3;
use winit::event::WindowEvent;

pub const CAMERA_PANEL_POSITION: [f32; 2] = [10.0, 70.0];
pub const CAMERA_PANEL_SIZE: [f32; 2] = [200.0, 150.0];
pub const INFO_PANEL_SIZE: [f32; 2] = [200.0, 260.0];
pub const INFO_PANEL_MARGIN: f32 = 10.0;

pub const CONTROL_LINES: [&str; 6] = ["Controls", "W:Z I", "S:Z O", "A:L", "D:R", "Mouse:M"];

#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub title: &'static str,
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub lines: Vec<String>,
}

/// The camera readout and the controls help for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayModel {
    pub camera: Panel,
    pub info: Panel,
}

impl OverlayModel {
    pub fn new(camera_position: Point3<f32>, window_size: (u32, u32)) -> Self {
        Self {
            camera: Panel {
                title: "Camera",
                position: CAMERA_PANEL_POSITION,
                size: CAMERA_PANEL_SIZE,
                lines: camera_lines(camera_position),
            },
            info: Panel {
                title: "Info",
                position: info_anchor(window_size),
                size: INFO_PANEL_SIZE,
                lines: CONTROL_LINES.iter().map(|line| line.to_string()).collect(),
            },
        }
    }

    pub fn panels(&self) -> [&Panel; 2] {
        [&self.camera, &self.info]
    }
}

pub fn camera_lines(position: Point3<f32>) -> Vec<String> {
    vec![
        format!("X: {:.2}", position.x),
        format!("Y: {:.2}", position.y),
        format!("Z: {:.2}", position.z),
    ]
}

/// Top left corner of the info panel, bottom right in the window. Windows
/// smaller than the panel pin it to the top left margin.
pub fn info_anchor((width, height): (u32, u32)) -> [f32; 2] {
    let [panel_width, panel_height] = INFO_PANEL_SIZE;
    [
        (width as f32 - panel_width - INFO_PANEL_MARGIN).max(INFO_PANEL_MARGIN),
        (height as f32 - panel_height - INFO_PANEL_MARGIN).max(INFO_PANEL_MARGIN),
    ]
}

/// The parts of a window event that decide whether the overlay may keep it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayInput {
    Key { pressed: bool },
    Button { pressed: bool },
    Pointer,
    Other,
}

impl From<&WindowEvent> for OverlayInput {
    fn from(event: &WindowEvent) -> Self {
        match event {
            WindowEvent::KeyboardInput { event, .. } => OverlayInput::Key {
                pressed: event.state.is_pressed(),
            },
            WindowEvent::MouseInput { state, .. } => OverlayInput::Button {
                pressed: state.is_pressed(),
            },
            WindowEvent::CursorMoved { .. } | WindowEvent::MouseWheel { .. } => {
                OverlayInput::Pointer
            }
            _ => OverlayInput::Other,
        }
    }
}

impl OverlayInput {
    /// Whether the overlay keeps this input from the scene.
    ///
    /// Releases always pass through, otherwise a key or button let go over a
    /// panel would stay held for the camera and the animal controller.
    pub fn captured(self, want_mouse: bool, want_keyboard: bool) -> bool {
        match self {
            OverlayInput::Key { pressed } => pressed && want_keyboard,
            OverlayInput::Button { pressed } => pressed && want_mouse,
            OverlayInput::Pointer => want_mouse,
            OverlayInput::Other => false,
        }
    }
}

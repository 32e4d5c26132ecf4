//! The hand placed zoo.
//!
//! Every animal is an [`Exhibit`]: one model file plus the [`Placement`]s of all
//! of its copies. Placements mirror how the scene was laid out by hand, a
//! translation followed by a chain of axis rotations and a uniform scale.

use std::fmt;

use cgmath::{Deg, Quaternion, Rotation3, Vector3};
use instant::Duration;
use winit::{event::ElementState, keyboard::KeyCode};

use crate::{data_structures::instance::Instance, title::Stage};

pub mod layout;
pub mod zoo;

/// State shared by all flows of a demo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZooState {
    pub stage: Stage,
}

impl ZooState {
    pub fn new(stage: Stage) -> Self {
        Self { stage }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn unit(self) -> Vector3<f32> {
        match self {
            Axis::X => Vector3::unit_x(),
            Axis::Y => Vector3::unit_y(),
            Axis::Z => Vector3::unit_z(),
        }
    }
}

/// Where one copy of a model stands.
///
/// The resulting matrix is `T(position + offset) * R(rotations[0]) * ... * S(scale)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub position: [f32; 3],
    pub offset: [f32; 3],
    /// Degrees, applied in order.
    pub rotations: Vec<(Axis, f32)>,
    pub scale: f32,
}

impl Placement {
    pub fn new(position: [f32; 3]) -> Self {
        Self {
            position,
            offset: [0.0; 3],
            rotations: Vec::new(),
            scale: 1.0,
        }
    }

    pub fn offset(mut self, offset: [f32; 3]) -> Self {
        self.offset = offset;
        self
    }

    pub fn rotate(mut self, axis: Axis, degrees: f32) -> Self {
        self.rotations.push((axis, degrees));
        self
    }

    pub fn scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn to_instance(&self) -> Instance {
        let rotation = self
            .rotations
            .iter()
            .fold(Quaternion::new(1.0, 0.0, 0.0, 0.0), |acc, (axis, degrees)| {
                acc * Quaternion::from_axis_angle(axis.unit(), Deg(*degrees))
            });
        Instance {
            position: Vector3::from(self.position) + Vector3::from(self.offset),
            rotation,
            scale: Vector3::new(self.scale, self.scale, self.scale),
        }
    }
}

/// Prints the placement so it can be pasted back into the layout.
impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [x, y, z] = self.position;
        write!(f, "Placement::new([{x:.3}, {y:.3}, {z:.3}])")?;
        if self.offset != [0.0; 3] {
            let [x, y, z] = self.offset;
            write!(f, ".offset([{x:.3}, {y:.3}, {z:.3}])")?;
        }
        for (axis, degrees) in &self.rotations {
            write!(f, ".rotate(Axis::{axis:?}, {degrees:.1})")?;
        }
        // `{:?}` keeps the decimal point, `1.0` would print as `1`
        write!(f, ".scale({:?})", self.scale)
    }
}

/// One model and every place it stands.
#[derive(Debug, Clone, PartialEq)]
pub struct Exhibit {
    pub name: String,
    /// Model file below the asset root.
    pub path: String,
    pub placements: Vec<Placement>,
}

impl Exhibit {
    pub fn new(name: &str, path: &str, placements: Vec<Placement>) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            placements,
        }
    }
}

/// The copy of an exhibit that can be moved with the keyboard.
///
/// Its placement must carry the yaw as rotation around [`Axis::Y`]; that is the
/// rotation the controller turns.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlledAnimal {
    /// Index into the demo's exhibits.
    pub exhibit: usize,
    /// Index into that exhibit's placements.
    pub instance: usize,
    /// Units per second.
    pub speed: f32,
    /// Degrees per second.
    pub turn_speed: f32,
}

impl ControlledAnimal {
    pub fn new(exhibit: usize, instance: usize) -> Self {
        Self {
            exhibit,
            instance,
            speed: 6.0,
            turn_speed: 60.0,
        }
    }
}

/// Moves one placement with I/K (-z/+z), J/L (-x/+x), U/O (+y/-y) and yaws it with P.
#[derive(Debug, Clone)]
pub struct AnimalController {
    placement: Placement,
    speed: f32,
    turn_speed: f32,
    forward: f32,
    backward: f32,
    left: f32,
    right: f32,
    up: f32,
    down: f32,
    turn: f32,
}

impl AnimalController {
    pub fn new(placement: Placement, speed: f32, turn_speed: f32) -> Self {
        Self {
            placement,
            speed,
            turn_speed,
            forward: 0.0,
            backward: 0.0,
            left: 0.0,
            right: 0.0,
            up: 0.0,
            down: 0.0,
            turn: 0.0,
        }
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn yaw(&self) -> f32 {
        self.placement
            .rotations
            .iter()
            .find(|(axis, _)| *axis == Axis::Y)
            .map_or(0.0, |(_, degrees)| *degrees)
    }

    /// Returns whether the key is an animal binding.
    pub fn process_keyboard(&mut self, key: KeyCode, state: ElementState) -> bool {
        let amount = if state.is_pressed() { 1.0 } else { 0.0 };
        match key {
            KeyCode::KeyI => self.forward = amount,
            KeyCode::KeyK => self.backward = amount,
            KeyCode::KeyJ => self.left = amount,
            KeyCode::KeyL => self.right = amount,
            KeyCode::KeyU => self.up = amount,
            KeyCode::KeyO => self.down = amount,
            KeyCode::KeyP => self.turn = amount,
            _ => return false,
        }
        true
    }

    /// Applies the held keys for `dt` and returns whether the placement changed.
    pub fn update(&mut self, dt: Duration) -> bool {
        let dt = dt.as_secs_f32();
        let step = self.speed * dt;
        let motion = [
            (self.right - self.left) * step,
            (self.up - self.down) * step,
            (self.backward - self.forward) * step,
        ];
        let turn = self.turn * self.turn_speed * dt;
        if motion == [0.0; 3] && turn == 0.0 {
            return false;
        }

        for (coordinate, delta) in self.placement.position.iter_mut().zip(motion) {
            *coordinate += delta;
        }
        if turn != 0.0 {
            match self
                .placement
                .rotations
                .iter_mut()
                .find(|(axis, _)| *axis == Axis::Y)
            {
                Some((_, degrees)) => *degrees = (*degrees + turn).rem_euclid(360.0),
                None => self.placement.rotations.push((Axis::Y, turn.rem_euclid(360.0))),
            }
        }
        true
    }
}

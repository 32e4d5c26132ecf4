//! Where everything in the zoo stands.

use crate::config::SoundTriggerConfig;

use super::{Axis, ControlledAnimal, Exhibit, Placement};

fn yawed(position: [f32; 3], yaw: f32, scale: f32) -> Placement {
    Placement::new(position).rotate(Axis::Y, yaw).scale(scale)
}

/// Lying models, stood up on X and turned on Z.
fn stood_up(position: [f32; 3], tilt: f32, turn: f32, scale: f32) -> Placement {
    Placement::new(position)
        .rotate(Axis::X, tilt)
        .rotate(Axis::Z, turn)
        .scale(scale)
}

/// Models exported upside down.
fn flipped(position: [f32; 3], yaw: f32, scale: f32) -> Placement {
    Placement::new(position)
        .rotate(Axis::Y, yaw)
        .rotate(Axis::X, 180.0)
        .rotate(Axis::Z, 180.0)
        .scale(scale)
}

fn monkey(position: [f32; 3], yaw: f32) -> Placement {
    Placement::new(position)
        .rotate(Axis::Y, yaw)
        .rotate(Axis::X, 270.0)
        .rotate(Axis::Z, 90.0)
}

pub fn zoo_exhibits() -> Vec<Exhibit> {
    vec![
        Exhibit::new(
            "enclosure",
            "zoo/Zoo.gltf",
            vec![
                Placement::new([0.0, -0.02, 0.0])
                    .rotate(Axis::X, 90.0)
                    .scale(0.01),
            ],
        ),
        Exhibit::new(
            "crocodiles",
            "animals/coco/coco.gltf",
            vec![
                yawed([20.6, 0.5, -82.2993], 90.0, 1.0),
                yawed([15.8, 0.2, -105.499], 279.0, 1.0),
                yawed([36.1, 0.2, -82.2993], 269.0, 1.0),
                yawed([24.8, -0.1, -91.6992], 269.0, 1.0),
                yawed([8.69995, 0.4, -91.7992], 323.0, 1.0),
            ],
        ),
        Exhibit::new(
            "lion",
            "animals/leon/leon.gltf",
            vec![
                // paws on the rock
                Placement::new([-13.5001, 0.5, -36.6])
                    .offset([0.0, 0.2, 0.4])
                    .rotate(Axis::X, -120.0)
                    .rotate(Axis::Z, 90.0)
                    .rotate(Axis::Y, 323.0)
                    .scale(5.0),
            ],
        ),
        Exhibit::new(
            "peacock",
            "animals/peacock/Untitled.gltf",
            vec![stood_up([26.7, 2.0, -15.5], -90.0, 258.0, 2.0)],
        ),
        Exhibit::new(
            "wolves",
            "animals/wolf/Untitled.gltf",
            vec![
                stood_up([-31.7001, -4.5, -81.9993], 90.0, 190.0, 3.0),
                stood_up([-53.2998, -4.5, -81.9993], 90.0, 343.0, 3.0),
                stood_up([-19.3001, -4.5, -81.9993], 90.0, 343.0, 3.0),
                stood_up([-55.0998, -4.5, -85.3993], 90.0, 250.0, 3.0),
            ],
        ),
        Exhibit::new(
            "capybaras",
            "animals/capy/scene.gltf",
            vec![
                yawed([-49.5999, 0.0, -41.2999], 119.0, 2.0),
                yawed([-49.2999, 0.5, -32.2001], 119.0, 2.0),
                yawed([-43.7, 0.0, -52.9997], 82.0, 2.0),
            ],
        ),
        Exhibit::new(
            "elephant",
            "animals/elephant/scene.gltf",
            vec![stood_up([-107.399, 0.5, -48.5998], -90.0, 119.0, 0.02)],
        ),
        Exhibit::new(
            "bisons",
            "animals/bison/scene.gltf",
            vec![
                yawed([-71.3995, 14.6, -137.899], 330.0, 0.4),
                yawed([-32.2001, 2.5, -129.099], 111.0, 0.4),
            ],
        ),
        Exhibit::new(
            "giraffe",
            "animals/giraffe/scene.gltf",
            vec![stood_up([-20.5001, 9.5, -107.299], -90.0, 348.0, 0.1)],
        ),
        Exhibit::new(
            "velociraptors",
            "animals/velociraptor/scene.gltf",
            vec![
                yawed([-144.0, -0.1, -102.099], 47.0, 1.0),
                yawed([-155.3, -0.1, -116.399], 100.0, 1.0),
            ],
        ),
        Exhibit::new(
            "tigers",
            "animals/tiger/scene.gltf",
            [[-111.199, 2.0, -11.0], [-124.999, 2.0, -25.1001]]
                .into_iter()
                .map(|position| {
                    Placement::new(position)
                        .rotate(Axis::Z, 180.0)
                        .rotate(Axis::X, 90.0)
                        .rotate(Axis::Y, 357.0)
                        .scale(0.002)
                })
                .collect(),
        ),
        Exhibit::new(
            "monkeys",
            "animals/monkey/monkey.gltf",
            vec![
                monkey([-141.399, 0.400003, -34.5], 255.0),
                monkey([-153.9, 0.100003, -64.3996], 103.0),
            ],
        ),
        Exhibit::new(
            "howler monkey",
            "animals/monkey3/scene.gltf",
            vec![flipped([-163.601, 5.7, -46.9999], 279.0, 0.1)],
        ),
        Exhibit::new(
            "spider monkey",
            "animals/monkey4/scene.gltf",
            vec![monkey([-153.5, 1.1, -35.1], 53.0)],
        ),
        Exhibit::new(
            "capuchins",
            "animals/monkey2/scene.gltf",
            vec![
                flipped([-157.5, 0.3, -64.1996], 25.0, 2.0),
                flipped([-126.198, 0.3, -68.4995], 305.0, 2.0),
                flipped([-158.6, 0.3, -71.1995], 1.0, 2.0),
            ],
        ),
        Exhibit::new(
            "pumas",
            "animals/puma/scene.gltf",
            vec![
                flipped([-95.2991, 0.200003, -11.3], 3.0, 0.04),
                flipped([-129.399, 0.200003, -8.2], 302.0, 0.04),
            ],
        ),
        Exhibit::new(
            "birds",
            "animals/bird/scene.gltf",
            vec![
                flipped([-48.2998, 11.9, -134.499], 162.0, 0.8),
                flipped([-83.5993, 3.3, -43.5999], 158.0, 0.5),
                flipped([0.0999996, 1.4, -47.5998], 126.0, 0.5),
            ],
        ),
    ]
}

/// The first crocodile.
pub fn controlled_crocodile() -> ControlledAnimal {
    ControlledAnimal::new(1, 0)
}

pub fn zoo_sounds() -> Vec<SoundTriggerConfig> {
    vec![
        SoundTriggerConfig::new([-13.5, 0.5, -36.6], 15.0, "sounds/lion.wav"),
        SoundTriggerConfig::new([-40.0, -4.5, -82.0], 20.0, "sounds/wolf_howl.wav"),
        SoundTriggerConfig::new([-107.4, 0.5, -48.6], 18.0, "sounds/elephant.wav"),
        SoundTriggerConfig::new([-150.0, 1.0, -50.0], 20.0, "sounds/monkeys.wav"),
        SoundTriggerConfig::new([-118.0, 2.0, -18.0], 15.0, "sounds/tiger.wav"),
        SoundTriggerConfig::new([22.0, 0.3, -90.0], 18.0, "sounds/crocodile.wav"),
    ]
}

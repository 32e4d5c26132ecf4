use std::time::Duration;

use cgmath::{Deg, Matrix4, Vector3};
use winit::{event::ElementState, keyboard::KeyCode};
use zoo_ngin::scene::{
    AnimalController, Axis, Placement,
    layout::{controlled_crocodile, zoo_exhibits, zoo_sounds},
};

use crate::common::test_utils::{assert_close, assert_matrix_eq};

mod common;

#[test]
fn placement_is_translate_rotate_scale() {
    let placement = Placement::new([1.0, 2.0, 3.0])
        .offset([0.0, 0.5, 0.0])
        .rotate(Axis::X, 90.0)
        .rotate(Axis::Z, 45.0)
        .scale(2.0);

    let expected = Matrix4::from_translation(Vector3::new(1.0, 2.5, 3.0))
        * Matrix4::from_angle_x(Deg(90.0))
        * Matrix4::from_angle_z(Deg(45.0))
        * Matrix4::from_scale(2.0);
    assert_matrix_eq(placement.to_instance().to_matrix(), expected);
}

#[test]
fn placement_without_rotations_is_unrotated() {
    let instance = Placement::new([4.0, 0.0, -1.0]).to_instance();
    assert_matrix_eq(
        instance.to_matrix(),
        Matrix4::from_translation(Vector3::new(4.0, 0.0, -1.0)),
    );
}

#[test]
fn placement_prints_as_code() {
    let placement = Placement::new([1.0, 2.0, 3.0]).rotate(Axis::Y, 90.0);
    assert_eq!(
        placement.to_string(),
        "Placement::new([1.000, 2.000, 3.000]).rotate(Axis::Y, 90.0).scale(1.0)"
    );

    let placement = Placement::new([0.0, 0.0, 0.0])
        .offset([0.0, 0.2, 0.4])
        .scale(0.5);
    assert_eq!(
        placement.to_string(),
        "Placement::new([0.000, 0.000, 0.000]).offset([0.000, 0.200, 0.400]).scale(0.5)"
    );
}

#[test]
fn logged_crocodile_placement_pastes_back() {
    let exhibits = zoo_exhibits();
    let controlled = controlled_crocodile();
    let placement = &exhibits[controlled.exhibit].placements[controlled.instance];

    let logged = placement.to_string();
    assert_eq!(
        logged,
        "Placement::new([20.600, 0.500, -82.299]).rotate(Axis::Y, 90.0).scale(1.0)"
    );

    // the logged line, pasted as code
    let pasted = Placement::new([20.600, 0.500, -82.299])
        .rotate(Axis::Y, 90.0)
        .scale(1.0);
    assert_eq!(pasted.to_string(), logged);
    assert_eq!(pasted.rotations, placement.rotations);
    assert_eq!(pasted.scale, placement.scale);
    for (a, b) in pasted.position.iter().zip(placement.position) {
        assert!((a - b).abs() < 1e-3, "{a} vs {b}");
    }
}

#[test]
fn zoo_layout_is_complete() {
    let exhibits = zoo_exhibits();
    assert_eq!(exhibits.len(), 17);
    assert!(exhibits.iter().all(|exhibit| !exhibit.placements.is_empty()));
    assert_eq!(exhibits[0].path, "zoo/Zoo.gltf");

    let controlled = controlled_crocodile();
    let crocodiles = &exhibits[controlled.exhibit];
    assert_eq!(crocodiles.name, "crocodiles");
    assert_eq!(crocodiles.placements.len(), 5);
    assert!(controlled.instance < crocodiles.placements.len());

    let sounds = zoo_sounds();
    assert_eq!(sounds.len(), 6);
    assert!(sounds.iter().all(|trigger| trigger.radius > 0.0));
}

#[test]
fn controlled_crocodile_starts_facing_east() {
    let exhibits = zoo_exhibits();
    let controlled = controlled_crocodile();
    let placement = exhibits[controlled.exhibit].placements[controlled.instance].clone();

    let controller = AnimalController::new(placement, controlled.speed, controlled.turn_speed);
    assert_close(controller.yaw(), 90.0);
}

fn controller_at_origin(yaw: f32) -> AnimalController {
    AnimalController::new(Placement::new([0.0; 3]).rotate(Axis::Y, yaw), 6.0, 60.0)
}

#[test]
fn animal_walks_while_the_key_is_held() {
    let mut controller = controller_at_origin(0.0);

    assert!(controller.process_keyboard(KeyCode::KeyI, ElementState::Pressed));
    assert!(controller.update(Duration::from_millis(500)));
    assert_close(controller.placement().position[2], -3.0);

    assert!(controller.process_keyboard(KeyCode::KeyI, ElementState::Released));
    assert!(!controller.update(Duration::from_millis(500)));
    assert_close(controller.placement().position[2], -3.0);
}

#[test]
fn animal_moves_on_every_axis() {
    let mut controller = controller_at_origin(0.0);
    controller.process_keyboard(KeyCode::KeyL, ElementState::Pressed);
    controller.process_keyboard(KeyCode::KeyU, ElementState::Pressed);
    controller.process_keyboard(KeyCode::KeyK, ElementState::Pressed);
    controller.update(Duration::from_secs(1));

    let [x, y, z] = controller.placement().position;
    assert_close(x, 6.0);
    assert_close(y, 6.0);
    assert_close(z, 6.0);
}

#[test]
fn turning_wraps_around() {
    let mut controller = controller_at_origin(330.0);
    controller.process_keyboard(KeyCode::KeyP, ElementState::Pressed);
    controller.update(Duration::from_secs(1));
    assert_close(controller.yaw(), 30.0);
    assert_eq!(controller.placement().rotations.len(), 1);
}

#[test]
fn turning_adds_a_yaw_when_missing() {
    let mut controller = AnimalController::new(Placement::new([0.0; 3]), 6.0, 60.0);
    controller.process_keyboard(KeyCode::KeyP, ElementState::Pressed);
    controller.update(Duration::from_millis(500));
    assert_close(controller.yaw(), 30.0);
}

#[test]
fn camera_keys_are_not_animal_bindings() {
    let mut controller = controller_at_origin(0.0);
    assert!(!controller.process_keyboard(KeyCode::KeyW, ElementState::Pressed));
    assert!(!controller.update(Duration::from_secs(1)));
}

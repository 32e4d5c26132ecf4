use std::time::Duration;

use cgmath::{Deg, Point3, Rad};
use winit::{event::ElementState, keyboard::KeyCode};
use zoo_ngin::{
    camera::{Camera, CameraController, PITCH_LIMIT, Projection},
    config::CameraConfig,
    overlay::OverlayInput,
};

use crate::common::test_utils::assert_close;

mod common;

fn start() -> (Camera, CameraController) {
    (
        Camera::new(Point3::new(0.0_f32, 10.0, 10.0), Deg(-90.0_f32), Deg(0.0_f32)),
        CameraController::new(10.0, 4.0, 0.003),
    )
}

#[test]
fn default_view_looks_down_negative_z() {
    let (camera, _) = start();
    let forward = camera.forward();
    assert_close(forward.x, 0.0);
    assert_close(forward.y, 0.0);
    assert_close(forward.z, -1.0);
}

#[test]
fn walks_forward_and_boosts() {
    let (mut camera, mut controller) = start();

    assert!(controller.process_keyboard(KeyCode::KeyW, ElementState::Pressed));
    controller.update(&mut camera, Duration::from_secs(1));
    assert_close(camera.position.z, 0.0);

    assert!(controller.process_keyboard(KeyCode::ShiftLeft, ElementState::Pressed));
    controller.update(&mut camera, Duration::from_secs(1));
    assert_close(camera.position.z, -40.0);
    assert_close(camera.position.y, 10.0);
}

#[test]
fn strafes_and_rises() {
    let (mut camera, mut controller) = start();
    controller.process_keyboard(KeyCode::KeyD, ElementState::Pressed);
    controller.process_keyboard(KeyCode::Space, ElementState::Pressed);
    controller.update(&mut camera, Duration::from_millis(500));

    assert_close(camera.position.x, 5.0);
    assert_close(camera.position.y, 15.0);
    assert_close(camera.position.z, 10.0);
}

#[test]
fn pitch_is_clamped() {
    let (mut camera, mut controller) = start();
    controller.set_look_active(true);

    controller.handle_mouse(0.0, -10_000.0);
    controller.update(&mut camera, Duration::from_millis(16));
    assert_eq!(camera.pitch, PITCH_LIMIT);

    controller.handle_mouse(0.0, 20_000.0);
    controller.update(&mut camera, Duration::from_millis(16));
    assert_eq!(camera.pitch, -PITCH_LIMIT);
}

#[test]
fn mouse_is_ignored_unless_looking() {
    let (mut camera, mut controller) = start();
    let yaw = camera.yaw;

    controller.handle_mouse(300.0, 0.0);
    controller.update(&mut camera, Duration::from_millis(16));
    assert_eq!(camera.yaw, yaw);

    controller.set_look_active(true);
    controller.handle_mouse(100.0, 0.0);
    controller.update(&mut camera, Duration::from_millis(16));
    assert_close(camera.yaw.0, yaw.0 + 0.3);
    assert!(controller.is_look_active());
}

#[test]
fn unknown_keys_are_not_bindings() {
    let (_, mut controller) = start();
    assert!(!controller.process_keyboard(KeyCode::KeyI, ElementState::Pressed));
    assert!(!controller.process_keyboard(KeyCode::Enter, ElementState::Pressed));
}

#[test]
fn projection_survives_a_minimised_window() {
    let mut projection = Projection::new(800, 0, Rad(1.0_f32), 1.0, 3000.0);
    assert!(projection.aspect().is_finite());

    projection.resize(1800, 800);
    assert_close(projection.aspect(), 2.25);
}

#[test]
fn releasing_over_a_panel_stops_the_camera() {
    let (mut camera, mut controller) = start();
    controller.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
    controller.set_look_active(true);

    // the cursor rests on a panel, imgui wants both mouse and keyboard
    let key_release = OverlayInput::Key { pressed: false };
    let button_release = OverlayInput::Button { pressed: false };
    assert!(!key_release.captured(true, true));
    assert!(!button_release.captured(true, true));
    controller.process_keyboard(KeyCode::KeyW, ElementState::Released);
    controller.set_look_active(false);

    controller.update(&mut camera, Duration::from_secs(1));
    assert_close(camera.position.z, 10.0);
    assert!(!controller.is_look_active());

    controller.handle_mouse(100.0, 0.0);
    controller.update(&mut camera, Duration::from_secs(1));
    assert_close(camera.yaw.0, Rad::from(Deg(-90.0_f32)).0);
}

#[test]
fn entering_the_zoo_restores_the_start_view() {
    let config = CameraConfig::default();
    let mut camera = config.camera();
    let mut controller = config.controller();

    // keys pressed while the title screen is up
    controller.process_keyboard(KeyCode::KeyD, ElementState::Pressed);
    controller.process_keyboard(KeyCode::Space, ElementState::Pressed);
    controller.update(&mut camera, Duration::from_secs(2));
    assert!(camera.position.x > 0.0);

    camera = config.camera();
    controller.reset();
    controller.update(&mut camera, Duration::from_secs(1));
    assert_close(camera.position.x, 0.0);
    assert_close(camera.position.y, 10.0);
    assert_close(camera.position.z, 10.0);
    assert_close(camera.yaw.0, Rad::from(Deg(-90.0_f32)).0);
    assert_close(camera.pitch.0, 0.0);
}

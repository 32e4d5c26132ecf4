use cgmath::Point3;
use zoo_ngin::overlay::{
    CAMERA_PANEL_POSITION, CAMERA_PANEL_SIZE, CONTROL_LINES, INFO_PANEL_SIZE, OverlayInput,
    OverlayModel, camera_lines, info_anchor,
};

#[test]
fn camera_position_has_two_decimals() {
    assert_eq!(
        camera_lines(Point3::new(0.0, -3.25, 10.5)),
        vec!["X: 0.00", "Y: -3.25", "Z: 10.50"]
    );
}

#[test]
fn info_panel_sits_in_the_bottom_right_corner() {
    assert_eq!(info_anchor((1800, 800)), [1590.0, 530.0]);
}

#[test]
fn small_windows_keep_the_info_panel_visible() {
    assert_eq!(info_anchor((100, 100)), [10.0, 10.0]);
    assert_eq!(info_anchor((0, 0)), [10.0, 10.0]);
}

#[test]
fn overlay_has_a_camera_and_an_info_panel() {
    let model = OverlayModel::new(Point3::new(1.0, 2.0, 3.0), (1800, 800));
    let [camera, info] = model.panels();

    assert_eq!(camera.title, "Camera");
    assert_eq!(camera.position, CAMERA_PANEL_POSITION);
    assert_eq!(camera.size, CAMERA_PANEL_SIZE);
    assert_eq!(camera.lines[0], "X: 1.00");

    assert_eq!(info.title, "Info");
    assert_eq!(info.size, INFO_PANEL_SIZE);
    assert_eq!(info.lines, CONTROL_LINES);
}

#[test]
fn presses_over_a_panel_stay_in_the_overlay() {
    assert!(OverlayInput::Key { pressed: true }.captured(false, true));
    assert!(OverlayInput::Button { pressed: true }.captured(true, false));
    assert!(OverlayInput::Pointer.captured(true, false));
}

#[test]
fn hovering_a_panel_does_not_take_the_keyboard() {
    assert!(!OverlayInput::Key { pressed: true }.captured(true, false));
    assert!(!OverlayInput::Button { pressed: true }.captured(false, true));
}

#[test]
fn releases_always_reach_the_scene() {
    assert!(!OverlayInput::Key { pressed: false }.captured(true, true));
    assert!(!OverlayInput::Button { pressed: false }.captured(true, true));
    assert!(!OverlayInput::Other.captured(true, true));
}

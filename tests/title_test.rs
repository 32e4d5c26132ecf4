use winit::{event::ElementState, keyboard::KeyCode};
use zoo_ngin::{
    config::DemoConfig,
    scene::ZooState,
    title::{Stage, TitleScreen},
};

#[test]
fn enter_starts_the_zoo() {
    assert_eq!(
        Stage::Title.on_key(KeyCode::Enter, ElementState::Pressed),
        Stage::Zoo
    );
    assert_eq!(
        Stage::Title.on_key(KeyCode::NumpadEnter, ElementState::Pressed),
        Stage::Zoo
    );
}

#[test]
fn other_input_keeps_the_title() {
    assert_eq!(
        Stage::Title.on_key(KeyCode::Enter, ElementState::Released),
        Stage::Title
    );
    assert_eq!(
        Stage::Title.on_key(KeyCode::KeyW, ElementState::Pressed),
        Stage::Title
    );
}

#[test]
fn there_is_no_way_back() {
    assert_eq!(
        Stage::Zoo.on_key(KeyCode::Enter, ElementState::Pressed),
        Stage::Zoo
    );
}

#[test]
fn demos_without_a_title_screen_start_in_the_zoo() {
    assert_eq!(Stage::default(), Stage::Zoo);
    assert_eq!(ZooState::new(Stage::default()).stage, Stage::Zoo);
    assert!(DemoConfig::zoo().title_screen.is_none());
    assert!(DemoConfig::tour().title_screen.is_some());
}

#[test]
fn title_screen_lines() {
    let screen = TitleScreen::default();
    assert_eq!(
        screen.lines(),
        vec![
            "LOREM IPSUM ZOO",
            "Lorem 1",
            "Lorem 2",
            "Lorem 3",
            "Lorem 4",
            "Press ENTER to start"
        ]
    );
    assert_eq!(screen.caption(), "LOREM IPSUM ZOO - Press ENTER to start");
}

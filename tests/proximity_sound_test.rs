use std::{
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use zoo_ngin::{
    audio::{DEFAULT_COOLDOWN, ProximitySoundSystem, RetriggerPolicy},
    config::SoundTriggerConfig,
};

use crate::common::test_utils::{MockBackend, point};

mod common;

fn system_with_lion() -> ProximitySoundSystem<MockBackend> {
    let mut system = ProximitySoundSystem::new(MockBackend::new());
    system
        .add_trigger(point(0.0, 0.0, 0.0), 5.0, Path::new("sounds/lion.wav"))
        .unwrap();
    system
}

#[test]
fn default_policy_is_a_ten_second_cooldown() {
    assert_eq!(DEFAULT_COOLDOWN, Duration::from_secs(10));
    assert_eq!(
        RetriggerPolicy::default(),
        RetriggerPolicy::Cooldown(Duration::from_secs(10))
    );
    let system = ProximitySoundSystem::new(MockBackend::new());
    assert_eq!(system.policy(), RetriggerPolicy::default());
}

#[test]
fn starts_only_inside_the_radius() {
    let mut system = system_with_lion();
    let now = Instant::now();

    assert!(system.update_at(point(10.0, 0.0, 0.0), now).is_empty());
    // the radius itself counts as outside
    assert!(system.update_at(point(5.0, 0.0, 0.0), now).is_empty());
    assert_eq!(system.backend().play_count(), 0);
    assert!(system.triggers()[0].last_played().is_none());

    assert_eq!(system.update_at(point(0.0, 3.0, 3.9), now), vec![0]);
    assert_eq!(system.backend().play_count(), 1);
    assert!(system.triggers()[0].is_playing());
    assert_eq!(system.triggers()[0].last_played(), Some(now));
}

#[test]
fn never_restarts_while_the_clip_is_playing() {
    let mut system = system_with_lion();
    let start = Instant::now();
    let listener = point(1.0, 0.0, 0.0);

    system.update_at(listener, start);
    assert!(
        system
            .update_at(listener, start + Duration::from_secs(30))
            .is_empty()
    );
    assert_eq!(system.backend().play_count(), 1);

    system.backend_mut().finish_all();
    assert_eq!(
        system.update_at(listener, start + Duration::from_secs(31)),
        vec![0]
    );
    assert_eq!(system.backend().play_count(), 2);
}

#[test]
fn waits_for_the_cooldown() {
    let mut system = system_with_lion();
    let start = Instant::now();
    let listener = point(0.0, 0.0, 0.0);

    system.update_at(listener, start);
    system.backend_mut().finish_all();

    assert!(
        system
            .update_at(listener, start + Duration::from_secs(5))
            .is_empty()
    );
    assert!(!system.triggers()[0].is_playing());
    assert!(
        system
            .update_at(listener, start + Duration::from_millis(9_999))
            .is_empty()
    );
    assert_eq!(
        system.update_at(listener, start + Duration::from_secs(10)),
        vec![0]
    );
}

#[test]
fn cooldown_applies_even_after_leaving() {
    let mut system = system_with_lion();
    let start = Instant::now();

    system.update_at(point(0.0, 0.0, 0.0), start);
    system.backend_mut().finish_all();
    system.update_at(point(50.0, 0.0, 0.0), start + Duration::from_secs(2));

    assert!(
        system
            .update_at(point(0.0, 0.0, 0.0), start + Duration::from_secs(4))
            .is_empty()
    );
}

#[test]
fn triggers_are_independent() {
    let mut system = system_with_lion();
    system
        .add_trigger(point(100.0, 0.0, 0.0), 10.0, Path::new("sounds/wolf_howl.wav"))
        .unwrap();
    let now = Instant::now();

    assert_eq!(system.update_at(point(95.0, 0.0, 0.0), now), vec![1]);
    assert_eq!(
        system.backend().started(),
        [PathBuf::from("sounds/wolf_howl.wav")]
    );
    assert!(!system.triggers()[0].is_playing());
    assert!(system.triggers()[1].is_playing());
}

#[test]
fn clip_that_fails_to_load_is_not_registered() {
    let mut system = ProximitySoundSystem::new(MockBackend::with_missing(&["sounds/missing.wav"]));

    assert!(
        system
            .add_trigger(point(0.0, 0.0, 0.0), 5.0, Path::new("sounds/missing.wav"))
            .is_err()
    );
    assert_eq!(
        system
            .add_trigger(point(0.0, 0.0, 0.0), 5.0, Path::new("sounds/lion.wav"))
            .unwrap(),
        0
    );
    assert_eq!(system.triggers().len(), 1);
    assert_eq!(system.triggers()[0].path, PathBuf::from("sounds/lion.wav"));
}

#[test]
fn failed_playback_is_not_retried_every_frame() {
    let mut system = system_with_lion();
    system.backend_mut().fail_play = true;
    let start = Instant::now();
    let listener = point(0.0, 0.0, 0.0);

    assert!(system.update_at(listener, start).is_empty());
    assert!(!system.triggers()[0].is_playing());
    assert_eq!(system.triggers()[0].last_played(), Some(start));

    system.backend_mut().fail_play = false;
    assert!(
        system
            .update_at(listener, start + Duration::from_secs(1))
            .is_empty()
    );
    assert_eq!(
        system.update_at(listener, start + Duration::from_secs(10)),
        vec![0]
    );
}

#[test]
fn on_reentry_plays_once_per_visit() {
    let mut system = system_with_lion().with_policy(RetriggerPolicy::OnReentry);
    let start = Instant::now();
    let inside = point(1.0, 0.0, 0.0);
    let outside = point(20.0, 0.0, 0.0);

    assert_eq!(system.update_at(inside, start), vec![0]);
    system.backend_mut().finish_all();
    assert!(
        system
            .update_at(inside, start + Duration::from_secs(60))
            .is_empty()
    );

    system.update_at(outside, start + Duration::from_secs(61));
    // re-entering right away is fine, there is no cooldown
    assert_eq!(
        system.update_at(inside, start + Duration::from_secs(62)),
        vec![0]
    );
    assert_eq!(system.backend().play_count(), 2);
}

#[test]
fn on_reentry_still_waits_for_the_clip() {
    let mut system = system_with_lion().with_policy(RetriggerPolicy::OnReentry);
    let start = Instant::now();

    system.update_at(point(0.0, 0.0, 0.0), start);
    system.update_at(point(20.0, 0.0, 0.0), start);
    assert!(system.update_at(point(0.0, 0.0, 0.0), start).is_empty());

    system.backend_mut().finish_all();
    assert_eq!(system.update_at(point(0.0, 0.0, 0.0), start), vec![0]);
}

#[test]
fn configured_triggers_skip_the_broken_ones() {
    let mut system =
        ProximitySoundSystem::new(MockBackend::with_missing(&["assets/sounds/missing.wav"]));
    let triggers = [
        SoundTriggerConfig::new([0.0, 0.0, 0.0], 5.0, "sounds/lion.wav"),
        SoundTriggerConfig::new([10.0, 0.0, 0.0], 5.0, "sounds/missing.wav"),
        SoundTriggerConfig::new([20.0, 0.0, 0.0], 0.0, "sounds/wolf_howl.wav"),
        SoundTriggerConfig::new([30.0, 0.0, 0.0], 8.0, "sounds/crocodile.wav"),
    ];

    assert_eq!(system.add_triggers(Path::new("assets"), &triggers), 2);
    let paths: Vec<_> = system.triggers().iter().map(|t| t.path.clone()).collect();
    assert_eq!(
        paths,
        [
            PathBuf::from("assets/sounds/lion.wav"),
            PathBuf::from("assets/sounds/crocodile.wav")
        ]
    );
}

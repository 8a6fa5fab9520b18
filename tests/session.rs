//! Whole sessions driven through the headless host

use glam::Vec2;

use donut_chomp::host::BindError;
use donut_chomp::sim::GamePhase;
use donut_chomp::{ConfigError, Controller, GameConfig, HeadlessHost, Level, SetupError};

fn controller_with(config: GameConfig, seed: u64) -> Controller<HeadlessHost> {
    let host = HeadlessHost::with_scene(&config.scene, config.pool_size);
    Controller::new(host, config, seed).unwrap()
}

#[test]
fn test_pool_exhausts_when_nothing_expires() {
    // Falls outlast the whole run, so every tick uses up a slot
    let config = GameConfig {
        levels: vec![Level {
            animation_time_ms: 60_000,
            spawn_delay_ms: 1000,
        }],
        ..Default::default()
    };
    let mut c = controller_with(config, 21);
    c.start();

    c.advance(7000);
    assert_eq!(c.state().spawned, 8);
    assert_eq!(c.phase(), GamePhase::Playing);

    c.advance(1000);
    assert_eq!(c.phase(), GamePhase::Ended);
    assert_eq!(c.state().spawned, 8);
    assert_eq!(c.host().pending_timers(), 0);

    // Nothing ever fires again
    c.advance(120_000);
    assert_eq!(c.phase(), GamePhase::Ended);
    assert_eq!(c.state().spawned, 8);
}

#[test]
fn test_default_level_keeps_recycling_donuts() {
    let mut c = controller_with(GameConfig::default(), 8);
    c.start();
    c.advance(60_000);

    // 3 s falls with a 1 s spawn period never use up 8 slots
    assert_eq!(c.phase(), GamePhase::Playing);
    assert!(c.state().pool.active_count() <= 4);
    assert_eq!(c.state().spawned, 61);
    assert_eq!(c.host().pending_timers(), 1);
}

#[test]
fn test_face_starts_game_after_delay() {
    let mut c = controller_with(GameConfig::default(), 3);
    c.run_frames(10, 16);
    assert_eq!(c.phase(), GamePhase::NotStarted);

    c.host_mut().set_faces(1);
    c.run_frames(1, 16);
    c.run_frames(60, 16);
    assert_eq!(c.phase(), GamePhase::NotStarted);

    c.run_frames(4, 16);
    assert_eq!(c.phase(), GamePhase::Playing);
    assert_eq!(c.state().spawned, 1);

    // Losing and finding the face again changes nothing
    c.host_mut().set_faces(0);
    c.run_frames(5, 16);
    c.host_mut().set_faces(1);
    c.run_frames(5, 16);
    assert_eq!(c.host().pending_timers(), 1);
}

#[test]
fn test_chomp_restarts_on_later_bites() {
    let mut c = controller_with(GameConfig::default(), 13);
    c.start();

    for bite in 1..=3u64 {
        let start = c.host().falls()[0].request.start;
        c.host_mut().set_mouth(start, 0.9);
        c.poll_mouth();
        assert_eq!(c.score(), bite * 100);

        c.host_mut().set_mouth(start, 0.0);
        c.poll_mouth();
        c.advance(1000);
    }

    let chomp = c.host().playback("chomp").unwrap();
    assert_eq!(chomp.plays, 3);
    assert_eq!(chomp.resets, 2);
    assert_eq!(c.host().element_by_name("ScoreText").unwrap().text, "300");
}

#[test]
fn test_bite_misses_far_donut() {
    let mut c = controller_with(GameConfig::default(), 17);
    c.start();
    let start = c.host().falls()[0].request.start;

    c.host_mut().set_mouth(start + Vec2::new(0.2, 0.2), 1.0);
    c.poll_mouth();
    assert_eq!(c.score(), 0);
    assert_eq!(c.host().element_by_name("ScoreText").unwrap().text, "0");
}

#[test]
fn test_missing_scene_element_fails_binding() {
    let config = GameConfig::default();
    let mut host = HeadlessHost::new();
    host.add_element("Donuts");
    let result = Controller::new(host, config, 1);
    assert!(
        matches!(result, Err(SetupError::Bind(BindError::MissingElement(name))) if name == "Donut_1")
    );
}

#[test]
fn test_inverted_spawn_range_is_rejected() {
    let config = GameConfig {
        spawn_min_x: 0.2,
        spawn_max_x: 0.1,
        ..Default::default()
    };
    let host = HeadlessHost::with_scene(&config.scene, config.pool_size);
    let result = Controller::new(host, config, 1);
    assert!(matches!(result, Err(SetupError::Config(ConfigError::Invalid(_)))));
}

#[test]
fn test_zero_duration_level_is_rejected() {
    let config = GameConfig {
        levels: vec![Level {
            animation_time_ms: 0,
            spawn_delay_ms: 0,
        }],
        ..Default::default()
    };
    let host = HeadlessHost::with_scene(&config.scene, config.pool_size);
    let result = Controller::new(host, config, 1);
    assert!(matches!(result, Err(SetupError::Config(ConfigError::Invalid(_)))));
}

#[test]
fn test_second_start_keeps_spawning() {
    let mut c = controller_with(GameConfig::default(), 4);
    c.start();
    c.start();
    c.advance(10_000);
    assert_eq!(c.phase(), GamePhase::Playing);
    assert_eq!(c.state().spawned, 11);
    assert_eq!(c.host().pending_timers(), 1);
}

#[test]
fn test_falling_donuts_still_score_after_end() {
    let config = GameConfig {
        levels: vec![Level {
            animation_time_ms: 60_000,
            spawn_delay_ms: 1000,
        }],
        ..Default::default()
    };
    let mut c = controller_with(config, 30);
    c.start();
    c.advance(8000);
    assert_eq!(c.phase(), GamePhase::Ended);

    let target = c.host().falls()[0].element;
    let pos = c.host().element(target).unwrap().pos;
    c.host_mut().set_mouth(pos, 1.0);
    c.poll_mouth();
    assert!(c.score() >= 100);
    assert_eq!(c.phase(), GamePhase::Ended);
    assert!(c.host().element(target).unwrap().hidden);
}

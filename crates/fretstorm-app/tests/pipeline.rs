//! End-to-end runs: synthetic audio through detection, matching and the engine.

use fretstorm_app::audio_input::SyntheticGuitar;
use fretstorm_app::config::AppConfig;
use fretstorm_app::demo::{self, Autopilot};
use fretstorm_app::game_loop::GameLoop;
use fretstorm_core::commands::PlayerCommand;
use fretstorm_core::enums::{MissionPhase, TutorialStep};
use fretstorm_core::events::GameEvent;
use fretstorm_core::tuning::{Note, TuningName};

#[test]
fn test_scripted_tutorial_reaches_active() {
    let mut guitar = SyntheticGuitar::new(44_100, 3);
    guitar.pluck(Note::E2, 200);
    guitar.pluck(Note::E2, 1000);
    // Wrong string first; FireHigh waits for the thinnest.
    guitar.pluck(Note::G3, 1800);
    guitar.pluck(Note::E4, 2600);
    guitar.pluck(Note::E2, 3400);

    let mut game = GameLoop::new(&AppConfig::default(), guitar);
    game.queue_command(PlayerCommand::Begin);

    let mut heard = Vec::new();
    let mut phases = Vec::new();
    for t in (0..4000u64).step_by(16) {
        let frame = game.step(t);
        if let Some(p) = frame.pluck {
            heard.push(p.string);
        }
        if phases.last() != Some(&frame.snapshot.phase) {
            phases.push(frame.snapshot.phase);
        }
    }

    assert_eq!(
        heard,
        vec![Note::E2, Note::E2, Note::G3, Note::E4, Note::E2]
    );
    assert_eq!(
        phases,
        vec![
            MissionPhase::Tutorial {
                step: TutorialStep::Tune
            },
            MissionPhase::Tutorial {
                step: TutorialStep::FireLow
            },
            MissionPhase::Tutorial {
                step: TutorialStep::FireHigh
            },
            MissionPhase::Tutorial {
                step: TutorialStep::Launch
            },
            MissionPhase::Active,
        ]
    );
    assert_eq!(game.engine().score().lasers_fired, 0);
}

#[test]
fn test_sustained_note_repeats_after_debounce() {
    let mut guitar = SyntheticGuitar::new(44_100, 4);
    guitar.pluck_for(Note::A2, 100, 1200);
    let mut game = GameLoop::new(&AppConfig::default(), guitar);

    let times: Vec<u64> = (0..1400u64)
        .step_by(16)
        .filter_map(|t| game.step(t).pluck.map(|p| p.at_ms))
        .collect();

    assert_eq!(times.len(), 3);
    assert!(times.windows(2).all(|w| w[1] - w[0] >= 500));
}

#[test]
fn test_autopilot_destroys_meteors() {
    let report = demo::run_demo(&AppConfig::default(), 60 * 60);
    assert!(demo::reached_mission(&report));
    assert!(report.meteors_destroyed > 0);
    assert!(report.best_score > 0);
}

#[test]
fn test_autopilot_in_alternate_tuning() {
    let config = AppConfig {
        tuning: TuningName::Dadgad,
        seed: 99,
        ..Default::default()
    };
    let report = demo::run_demo(&config, 60 * 40);
    assert!(demo::reached_mission(&report));
    assert_eq!(report.final_snapshot.tuning, TuningName::Dadgad);
    assert!(report.meteors_destroyed > 0);
}

#[test]
fn test_laser_event_follows_heard_pluck() {
    let mut game = GameLoop::new(&AppConfig::default(), SyntheticGuitar::new(44_100, 5));
    game.queue_command(PlayerCommand::Begin);
    game.queue_command(PlayerCommand::Skip);
    let mut pilot = Autopilot::new(100, 600);

    let mut fired = 0;
    let mut heard = 0;
    for t in (0..12_000u64).step_by(16) {
        let frame = game.step(t);
        heard += frame.pluck.is_some() as u32;
        fired += frame
            .snapshot
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::LaserFired { .. }))
            .count() as u32;
        pilot.play(&frame.snapshot, game.input_mut(), t);
    }
    assert!(fired > 0);
    assert!(fired <= heard);
}

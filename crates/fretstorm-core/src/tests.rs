#[cfg(test)]
mod tests {
    use crate::commands::PlayerCommand;
    use crate::constants::*;
    use crate::enums::*;
    use crate::error::CoreError;
    use crate::events::{GameEvent, StringPluckEvent};
    use crate::state::GameStateSnapshot;
    use crate::tuning::*;
    use crate::types::{Position, SimTime, Velocity};

    #[test]
    fn test_every_tuning_fits_detection_band() {
        for name in TuningName::ALL {
            let tuning = name.tuning();
            assert_eq!(tuning.name, name);
            for s in &tuning.strings {
                assert!(
                    s.frequency_hz > MIN_DETECT_HZ as f64 && s.frequency_hz < MAX_DETECT_HZ as f64,
                    "{} {} at {} Hz is outside the detection band",
                    name,
                    s.note,
                    s.frequency_hz
                );
            }
        }
    }

    #[test]
    fn test_strings_ordered_thickest_first() {
        for name in TuningName::ALL {
            let strings = &name.tuning().strings;
            for pair in strings.windows(2) {
                assert!(
                    pair[0].frequency_hz < pair[1].frequency_hz,
                    "{name}: {} should be lower than {}",
                    pair[0].note,
                    pair[1].note
                );
            }
        }
    }

    #[test]
    fn test_strings_are_distinct_within_tuning() {
        // Adjacent strings must be far apart compared to the matching tolerance.
        for name in TuningName::ALL {
            let strings = &name.tuning().strings;
            for pair in strings.windows(2) {
                let cents = 1200.0 * (pair[1].frequency_hz / pair[0].frequency_hz).log2();
                assert!(cents > 10.0 * TOLERANCE_CENTS, "{name}: strings too close");
            }
        }
    }

    #[test]
    fn test_standard_tuning_layout() {
        let standard = TuningName::Standard.tuning();
        let notes: Vec<Note> = standard.strings.iter().map(|s| s.note).collect();
        assert_eq!(
            notes,
            vec![Note::E2, Note::A2, Note::D3, Note::G3, Note::B3, Note::E4]
        );
        assert_eq!(standard.thickest().note, Note::E2);
        assert_eq!(standard.thinnest().note, Note::E4);
        assert_eq!(standard.course_of(Note::D3), Some(2));
        assert_eq!(standard.course_of(Note::D2), None);
        assert!(!standard.contains(Note::Ds4));
        assert!((standard.string_at(1).unwrap().frequency_hz - 110.0).abs() < 1e-9);
        assert!(standard.string_at(6).is_none());
    }

    #[test]
    fn test_tuning_name_parse_and_display() {
        for name in TuningName::ALL {
            let parsed: TuningName = name.to_string().parse().unwrap();
            assert_eq!(parsed, name);
        }
        assert_eq!(" Drop-D ".parse::<TuningName>(), Ok(TuningName::DropD));
        assert_eq!(
            "lute".parse::<TuningName>(),
            Err(CoreError::UnknownTuning("lute".into()))
        );
    }

    #[test]
    fn test_tuning_name_serde_matches_display() {
        for name in TuningName::ALL {
            let json = serde_json::to_string(&name).unwrap();
            assert_eq!(json, format!("\"{name}\""));
        }
    }

    #[test]
    fn test_sharp_notes_serialize_with_hash() {
        assert_eq!(serde_json::to_string(&Note::Ds2).unwrap(), "\"D#2\"");
        let back: Note = serde_json::from_str("\"F#3\"").unwrap();
        assert_eq!(back, Note::Fs3);
        assert_eq!(Note::Cs3.to_string(), "C#3");
    }

    #[test]
    fn test_pluck_command_json_shape() {
        let cmd = PlayerCommand::StringPlucked(StringPluckEvent {
            string: Note::E2,
            at_ms: 1500,
        });
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"type\":\"StringPlucked\""), "got {json}");
        assert!(json.contains("\"string\":\"E2\""), "got {json}");

        let back: PlayerCommand = serde_json::from_str(&json).unwrap();
        match back {
            PlayerCommand::StringPlucked(ev) => assert_eq!(ev.at_ms, 1500),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_mission_phase_json_shape() {
        let json = serde_json::to_string(&MissionPhase::GameOver {
            restart_armed: true,
        })
        .unwrap();
        assert_eq!(json, r#"{"phase":"GameOver","restart_armed":true}"#);
        let tutorial: MissionPhase =
            serde_json::from_str(r#"{"phase":"Tutorial","step":"FireHigh"}"#).unwrap();
        assert_eq!(
            tutorial,
            MissionPhase::Tutorial {
                step: TutorialStep::FireHigh
            }
        );
        assert!(MissionPhase::Active.is_active());
        assert!(!MissionPhase::default().is_active());
    }

    #[test]
    fn test_event_tagging() {
        let json = serde_json::to_string(&GameEvent::ShieldBroken { tier: 2 }).unwrap();
        assert_eq!(json, r#"{"type":"ShieldBroken","tier":2}"#);
    }

    #[test]
    fn test_default_snapshot_serializes() {
        let snap = GameStateSnapshot::default();
        let json = serde_json::to_string(&snap).unwrap();
        let back: GameStateSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.phase, MissionPhase::Idle);
        assert!(back.meteors.is_empty());
    }

    #[test]
    fn test_position_geometry() {
        let a = Position::new(100.0, 300.0);
        let b = Position::new(103.0, 304.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-12);
        assert!((a.horizontal_distance_to(&b) - 3.0).abs() < 1e-12);
        assert!((b.horizontal_distance_to(&a) + 3.0).abs() < 1e-12);
        assert!((Velocity::new(-3.0, 4.0).speed() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_sim_time_advance() {
        let mut time = SimTime::default();
        time.advance(16);
        time.advance(33);
        assert_eq!(time.tick, 2);
        assert_eq!(time.now_ms, 33);
    }

    #[test]
    fn test_spawn_interval_constants_consistent() {
        assert!(SPAWN_INTERVAL_MIN_MS < SPAWN_INTERVAL_BASE_MS);
        assert_eq!(METEOR_SIZE_BY_COURSE.len(), STRING_COUNT);
        assert!(ROCKET_X < WORLD_WIDTH);
    }
}

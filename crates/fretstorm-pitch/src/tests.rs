//! Tests for the pitch detector and note matcher.

use approx::assert_relative_eq;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use fretstorm_core::constants::{DEFAULT_FRAME_SIZE, DEFAULT_SAMPLE_RATE};
use fretstorm_core::tuning::{Note, TuningName};

use crate::detector::{DetectorConfig, PitchDetector};
use crate::matcher::{cents_between, MatcherConfig, NoteMatcher};

fn sine(frequency: f64, amplitude: f32, sample_rate: u32, len: usize, phase: f64) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let t = i as f64 / sample_rate as f64;
            amplitude * (std::f64::consts::TAU * frequency * t + phase).sin() as f32
        })
        .collect()
}

/// Fundamental plus two overtones, like a plucked string minus the decay.
fn string_tone(frequency: f64, sample_rate: u32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let w = std::f64::consts::TAU * frequency * i as f64 / sample_rate as f64;
            (0.5 * w.sin() + 0.3 * (2.0 * w).sin() + 0.15 * (3.0 * w).sin()) as f32
        })
        .collect()
}

fn detector() -> PitchDetector {
    PitchDetector::new(DetectorConfig::default())
}

// ---- Detector: pure tones ----

#[test]
fn test_sine_at_every_string_detected_within_one_percent() {
    let mut det = detector();
    for sample_rate in [DEFAULT_SAMPLE_RATE, 48_000] {
        for name in TuningName::ALL {
            for s in &name.tuning().strings {
                let buf = sine(s.frequency_hz, 0.5, sample_rate, DEFAULT_FRAME_SIZE, 0.3);
                let result = det.detect(&buf, sample_rate);
                let f = result
                    .frequency_hz
                    .unwrap_or_else(|| panic!("{name} {} not detected at {sample_rate}", s.note));
                let error = (f as f64 - s.frequency_hz).abs() / s.frequency_hz;
                assert!(
                    error < 0.01,
                    "{name} {}: detected {f} Hz, expected {} Hz",
                    s.note,
                    s.frequency_hz
                );
            }
        }
    }
}

#[test]
fn test_sine_resolves_to_exact_string() {
    let mut det = detector();
    for name in TuningName::ALL {
        let matcher = NoteMatcher::new(name, MatcherConfig::default());
        for s in &name.tuning().strings {
            for phase in [0.0, 1.1, 2.5] {
                let buf = sine(s.frequency_hz, 0.4, DEFAULT_SAMPLE_RATE, DEFAULT_FRAME_SIZE, phase);
                let f = det.detect(&buf, DEFAULT_SAMPLE_RATE).frequency_hz.unwrap();
                let matched = matcher.match_frequency(f);
                assert_eq!(
                    matched.map(|m| m.note),
                    Some(s.note),
                    "{name}: {f} Hz should match {}",
                    s.note
                );
            }
        }
    }
}

#[test]
fn test_refinement_stays_on_the_chosen_lag() {
    let mut det = detector();
    for s in &TuningName::Standard.tuning().strings {
        let buf = sine(s.frequency_hz, 0.5, DEFAULT_SAMPLE_RATE, DEFAULT_FRAME_SIZE, 0.7);
        let f = det.detect(&buf, DEFAULT_SAMPLE_RATE).frequency_hz.unwrap() as f64;
        let sr = DEFAULT_SAMPLE_RATE as f64;
        let whole_lag = sr / (sr / s.frequency_hz).round();
        assert!(
            cents_between(f, whole_lag).abs() < 50.0,
            "{}: refined {f} Hz left the whole-sample estimate {whole_lag} Hz",
            s.note
        );
    }
}

#[test]
fn test_overtones_do_not_cause_octave_errors() {
    let mut det = detector();
    for s in &TuningName::Standard.tuning().strings {
        let buf = string_tone(s.frequency_hz, DEFAULT_SAMPLE_RATE, DEFAULT_FRAME_SIZE);
        let f = det.detect(&buf, DEFAULT_SAMPLE_RATE).frequency_hz.unwrap();
        assert_relative_eq!(f as f64, s.frequency_hz, max_relative = 0.01);
    }
}

#[test]
fn test_clarity_reported_for_clean_tone() {
    let mut det = detector();
    let buf = sine(110.0, 0.5, DEFAULT_SAMPLE_RATE, DEFAULT_FRAME_SIZE, 0.0);
    let result = det.detect(&buf, DEFAULT_SAMPLE_RATE);
    assert!(result.clarity > 0.3 && result.clarity <= 1.0, "clarity {}", result.clarity);
}

// ---- Detector: rejection paths ----

#[test]
fn test_silence_gate_reports_amplitude() {
    let mut det = detector();
    let buf = sine(110.0, 0.005, DEFAULT_SAMPLE_RATE, DEFAULT_FRAME_SIZE, 0.0);
    let result = det.detect(&buf, DEFAULT_SAMPLE_RATE);
    assert_eq!(result.frequency_hz, None);
    assert_relative_eq!(result.amplitude_rms, 0.005 / 2f32.sqrt(), max_relative = 0.02);
}

#[test]
fn test_zero_buffer_is_no_detection() {
    let mut det = detector();
    let result = det.detect(&[0.0; DEFAULT_FRAME_SIZE], DEFAULT_SAMPLE_RATE);
    assert_eq!(result.frequency_hz, None);
    assert_eq!(result.amplitude_rms, 0.0);
}

#[test]
fn test_empty_buffer_is_no_detection() {
    let mut det = detector();
    let result = det.detect(&[], DEFAULT_SAMPLE_RATE);
    assert_eq!(result.frequency_hz, None);
    assert_eq!(result.amplitude_rms, 0.0);
}

#[test]
fn test_non_finite_samples_never_leak() {
    let mut det = detector();
    let mut buf = sine(110.0, 0.5, DEFAULT_SAMPLE_RATE, DEFAULT_FRAME_SIZE, 0.0);
    buf[100] = f32::NAN;
    let result = det.detect(&buf, DEFAULT_SAMPLE_RATE);
    assert_eq!(result.frequency_hz, None);
    assert!(result.amplitude_rms.is_finite());

    buf[100] = f32::INFINITY;
    let result = det.detect(&buf, DEFAULT_SAMPLE_RATE);
    assert_eq!(result.frequency_hz, None);
    assert!(result.amplitude_rms.is_finite());
}

#[test]
fn test_zero_sample_rate_is_no_detection() {
    let mut det = detector();
    let buf = sine(110.0, 0.5, DEFAULT_SAMPLE_RATE, DEFAULT_FRAME_SIZE, 0.0);
    assert_eq!(det.detect(&buf, 0).frequency_hz, None);
}

#[test]
fn test_buffer_too_short_for_band() {
    let mut det = detector();
    let buf = sine(110.0, 0.5, DEFAULT_SAMPLE_RATE, 64, 0.0);
    assert_eq!(det.detect(&buf, DEFAULT_SAMPLE_RATE).frequency_hz, None);
}

#[test]
fn test_below_band_not_detected() {
    let mut det = detector();
    let buf = sine(50.0, 0.5, DEFAULT_SAMPLE_RATE, DEFAULT_FRAME_SIZE, 0.0);
    assert_eq!(det.detect(&buf, DEFAULT_SAMPLE_RATE).frequency_hz, None);
}

#[test]
fn test_white_noise_not_detected() {
    let mut det = detector();
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    for _ in 0..10 {
        let buf: Vec<f32> = (0..DEFAULT_FRAME_SIZE)
            .map(|_| rng.gen_range(-0.5f32..0.5))
            .collect();
        let result = det.detect(&buf, DEFAULT_SAMPLE_RATE);
        assert_eq!(result.frequency_hz, None, "noise produced {:?}", result);
        assert!(result.amplitude_rms > 0.1);
    }
}

// ---- Matcher ----

#[test]
fn test_cents_between() {
    assert_relative_eq!(cents_between(220.0, 110.0), 1200.0, epsilon = 1e-9);
    assert_relative_eq!(cents_between(110.0, 110.0), 0.0, epsilon = 1e-12);
    assert!(cents_between(109.0, 110.0) < 0.0);
}

#[test]
fn test_match_accepts_inside_tolerance_only() {
    let matcher = NoteMatcher::new(TuningName::Standard, MatcherConfig::default());
    let a2 = Note::A2.frequency_hz();
    let sharp = |cents: f64| (a2 * 2f64.powf(cents / 1200.0)) as f32;

    let m = matcher.match_frequency(sharp(6.0)).unwrap();
    assert_eq!(m.note, Note::A2);
    assert_relative_eq!(m.cents, 6.0, epsilon = 1e-3);

    assert!(matcher.match_frequency(sharp(-6.5)).is_some());
    assert!(matcher.match_frequency(sharp(7.5)).is_none());
    assert!(matcher.match_frequency(sharp(-20.0)).is_none());
}

#[test]
fn test_frequencies_off_every_string_never_match() {
    for name in TuningName::ALL {
        let matcher = NoteMatcher::new(name, MatcherConfig::default());
        let mut f = 70.0f32;
        while f < 350.0 {
            let nearest = name
                .tuning()
                .strings
                .iter()
                .map(|s| cents_between(f as f64, s.frequency_hz).abs())
                .fold(f64::INFINITY, f64::min);
            let matched = matcher.match_frequency(f);
            if nearest >= 7.0 {
                assert!(matched.is_none(), "{name}: {f} Hz is {nearest} cents off yet matched");
            } else {
                assert!(matched.is_some(), "{name}: {f} Hz is {nearest} cents off and unmatched");
            }
            f += 0.25;
        }
    }
}

#[test]
fn test_match_depends_on_tuning() {
    let standard = NoteMatcher::new(TuningName::Standard, MatcherConfig::default());
    let drop_d = NoteMatcher::new(TuningName::DropD, MatcherConfig::default());
    let d2 = Note::D2.frequency_hz() as f32;
    assert!(standard.match_frequency(d2).is_none());
    assert_eq!(drop_d.match_frequency(d2).map(|m| m.note), Some(Note::D2));
}

#[test]
fn test_match_rejects_garbage_frequencies() {
    let matcher = NoteMatcher::new(TuningName::Standard, MatcherConfig::default());
    assert!(matcher.match_frequency(f32::NAN).is_none());
    assert!(matcher.match_frequency(f32::INFINITY).is_none());
    assert!(matcher.match_frequency(0.0).is_none());
    assert!(matcher.match_frequency(-82.41).is_none());
}

// ---- Debounce ----

#[test]
fn test_debounce_collapses_sustained_pluck() {
    let mut matcher = NoteMatcher::new(TuningName::Standard, MatcherConfig::default());
    let e2 = Some(82.41f32);

    let first = matcher.process(e2, 1000).unwrap();
    assert_eq!(first.string, Note::E2);
    assert_eq!(first.at_ms, 1000);

    // Sustained note seen on every frame for 499 ms: nothing new.
    for t in (1016..1500).step_by(16) {
        assert!(matcher.process(e2, t).is_none(), "fired again at {t}");
    }

    let second = matcher.process(e2, 1500).unwrap();
    assert_eq!(second.at_ms, 1500);
    assert_eq!(matcher.last_pluck(), Some(second));
}

#[test]
fn test_two_detections_under_window_make_one_event() {
    let mut matcher = NoteMatcher::new(TuningName::Standard, MatcherConfig::default());
    let events: Vec<_> = [(Some(110.0f32), 0u64), (Some(110.0), 499)]
        .into_iter()
        .filter_map(|(f, t)| matcher.process(f, t))
        .collect();
    assert_eq!(events.len(), 1);
}

#[test]
fn test_debounce_is_global_across_strings() {
    let mut matcher = NoteMatcher::new(TuningName::Standard, MatcherConfig::default());
    assert!(matcher.process(Some(82.41), 0).is_some());
    // A different string inside the window is still suppressed.
    assert!(matcher.process(Some(329.63), 200).is_none());
    let later = matcher.process(Some(329.63), 600).unwrap();
    assert_eq!(later.string, Note::E4);
}

#[test]
fn test_unmatched_ticks_do_not_touch_debounce() {
    let mut matcher = NoteMatcher::new(TuningName::Standard, MatcherConfig::default());
    assert!(matcher.process(None, 0).is_none());
    assert!(matcher.process(Some(90.0), 10).is_none());
    assert!(matcher.last_pluck().is_none());
    assert!(matcher.process(Some(82.41), 20).is_some());
}

#[test]
fn test_switching_tuning_clears_debounce() {
    let mut matcher = NoteMatcher::new(TuningName::Standard, MatcherConfig::default());
    assert!(matcher.process(Some(110.0), 0).is_some());
    matcher.set_tuning(TuningName::DropD);
    assert_eq!(matcher.tuning().name, TuningName::DropD);
    assert!(matcher.last_pluck().is_none());
    let ev = matcher.process(Some(73.42), 100).unwrap();
    assert_eq!(ev.string, Note::D2);
}

#[test]
fn test_detector_to_matcher_pipeline() {
    let mut det = detector();
    let mut matcher = NoteMatcher::new(TuningName::Standard, MatcherConfig::default());
    let frame_ms = 16;
    let mut events = Vec::new();
    // One second of a sustained G3 sampled every frame.
    for frame in 0..60u64 {
        let buf = string_tone(196.0, DEFAULT_SAMPLE_RATE, DEFAULT_FRAME_SIZE);
        let result = det.detect(&buf, DEFAULT_SAMPLE_RATE);
        if let Some(ev) = matcher.process(result.frequency_hz, frame * frame_ms) {
            events.push(ev);
        }
    }
    assert_eq!(events.len(), 2, "expected one pluck per 500 ms window: {events:?}");
    assert!(events.iter().all(|e| e.string == Note::G3));
}

//! Audio input collaborators.
//!
//! The game loop pulls one frame per tick from an `AudioInput`. Real devices
//! live outside this crate; `SyntheticGuitar` renders scripted plucks so the
//! whole pipeline can run headless and deterministically.

use std::f64::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use fretstorm_core::constants::DEFAULT_SAMPLE_RATE;
use fretstorm_core::tuning::Note;
use fretstorm_core::types::Millis;

#[derive(Debug, Error)]
pub enum AudioInputError {
    #[error("audio input unavailable: {0}")]
    Unavailable(String),
    #[error("empty frame buffer, nothing to fill")]
    EmptyFrame,
}

/// A source of time-domain audio frames in [-1, 1].
pub trait AudioInput {
    fn sample_rate(&self) -> u32;

    /// Fill `frame` with the most recent samples ending at `now_ms`.
    fn read_frame(&mut self, now_ms: Millis, frame: &mut [f32]) -> Result<(), AudioInputError>;
}

/// Input that never produces audio, standing in for a denied or missing microphone.
#[derive(Debug, Clone, Default)]
pub struct UnavailableInput {
    pub reason: String,
}

impl AudioInput for UnavailableInput {
    fn sample_rate(&self) -> u32 {
        DEFAULT_SAMPLE_RATE
    }

    fn read_frame(&mut self, _now_ms: Millis, _frame: &mut [f32]) -> Result<(), AudioInputError> {
        Err(AudioInputError::Unavailable(self.reason.clone()))
    }
}

/// One scripted pluck.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScriptedPluck {
    pub note: Note,
    pub at_ms: Millis,
    /// The string is muted this long after the attack.
    pub duration_ms: Millis,
}

/// Renders decaying plucked-string tones with a light noise floor.
///
/// Only the most recent pluck sounds; a new attack damps the previous one.
#[derive(Debug, Clone)]
pub struct SyntheticGuitar {
    sample_rate: u32,
    amplitude: f64,
    decay_secs: f64,
    noise: f32,
    script: Vec<ScriptedPluck>,
    rng: ChaCha8Rng,
}

impl SyntheticGuitar {
    pub const DEFAULT_DURATION_MS: Millis = 300;

    pub fn new(sample_rate: u32, seed: u64) -> Self {
        Self {
            sample_rate,
            amplitude: 0.5,
            decay_secs: 1.0,
            noise: 0.002,
            script: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Peak amplitude of the attack and level of the background noise.
    pub fn with_levels(mut self, amplitude: f64, noise: f32) -> Self {
        self.amplitude = amplitude;
        self.noise = noise;
        self
    }

    /// Schedule a pluck of the default length.
    pub fn pluck(&mut self, note: Note, at_ms: Millis) {
        self.pluck_for(note, at_ms, Self::DEFAULT_DURATION_MS);
    }

    /// Schedule a pluck that rings for `duration_ms`.
    pub fn pluck_for(&mut self, note: Note, at_ms: Millis, duration_ms: Millis) {
        let pluck = ScriptedPluck {
            note,
            at_ms,
            duration_ms,
        };
        let idx = self.script.partition_point(|p| p.at_ms <= at_ms);
        self.script.insert(idx, pluck);
    }

    pub fn script(&self) -> &[ScriptedPluck] {
        &self.script
    }

    /// Latest pluck attacked at or before `t_ms`.
    fn sounding_at(&self, t_ms: f64) -> Option<&ScriptedPluck> {
        self.script.iter().rev().find(|p| p.at_ms as f64 <= t_ms)
    }

    fn sample_at(&self, t_ms: f64) -> f64 {
        let Some(pluck) = self.sounding_at(t_ms) else {
            return 0.0;
        };
        let age_ms = t_ms - pluck.at_ms as f64;
        if age_ms >= pluck.duration_ms as f64 {
            return 0.0;
        }
        let age = age_ms / 1000.0;
        let f = pluck.note.frequency_hz();
        let envelope = self.amplitude * (-age / self.decay_secs).exp();
        envelope * ((TAU * f * age).sin() + 0.3 * (TAU * 2.0 * f * age).sin()) / 1.3
    }
}

impl Default for SyntheticGuitar {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE, 0)
    }
}

impl AudioInput for SyntheticGuitar {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn read_frame(&mut self, now_ms: Millis, frame: &mut [f32]) -> Result<(), AudioInputError> {
        if frame.is_empty() {
            return Err(AudioInputError::EmptyFrame);
        }
        let ms_per_sample = 1000.0 / self.sample_rate as f64;
        let len = frame.len();
        for (i, out) in frame.iter_mut().enumerate() {
            let t_ms = now_ms as f64 - (len - 1 - i) as f64 * ms_per_sample;
            let noise = if self.noise > 0.0 {
                self.rng.gen_range(-self.noise..=self.noise)
            } else {
                0.0
            };
            *out = (self.sample_at(t_ms) as f32 + noise).clamp(-1.0, 1.0);
        }
        Ok(())
    }
}

//! Note matcher: maps detected frequencies onto the active tuning and
//! debounces matches into `StringPluckEvent`s.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use fretstorm_core::constants::{DEBOUNCE_MS, TOLERANCE_CENTS};
use fretstorm_core::events::StringPluckEvent;
use fretstorm_core::tuning::{Note, Tuning, TuningName};
use fretstorm_core::types::Millis;

/// Matching tolerance and debounce window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatcherConfig {
    /// Maximum absolute deviation accepted (exclusive).
    pub tolerance_cents: f64,
    /// Minimum gap between emitted plucks, across all strings.
    pub debounce_ms: Millis,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            tolerance_cents: TOLERANCE_CENTS,
            debounce_ms: DEBOUNCE_MS,
        }
    }
}

/// A frequency resolved to a string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoteMatch {
    pub note: Note,
    /// Signed deviation from the string's target (positive = sharp).
    pub cents: f64,
}

/// Deviation of `frequency_hz` from `target_hz` in cents.
pub fn cents_between(frequency_hz: f64, target_hz: f64) -> f64 {
    1200.0 * (frequency_hz / target_hz).log2()
}

/// Stateful matcher bound to one tuning at a time.
#[derive(Debug, Clone)]
pub struct NoteMatcher {
    config: MatcherConfig,
    tuning: &'static Tuning,
    last_pluck: Option<StringPluckEvent>,
}

impl NoteMatcher {
    pub fn new(tuning: TuningName, config: MatcherConfig) -> Self {
        Self {
            config,
            tuning: tuning.tuning(),
            last_pluck: None,
        }
    }

    pub fn tuning(&self) -> &'static Tuning {
        self.tuning
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Replace the active tuning. Clears the debounce state.
    pub fn set_tuning(&mut self, tuning: TuningName) {
        if self.tuning.name != tuning {
            info!(%tuning, "Note matcher switched tuning");
        }
        self.tuning = tuning.tuning();
        self.reset();
    }

    /// Forget the last emitted pluck, reopening the debounce window.
    pub fn reset(&mut self) {
        self.last_pluck = None;
    }

    /// Most recently emitted pluck.
    pub fn last_pluck(&self) -> Option<StringPluckEvent> {
        self.last_pluck
    }

    /// Nearest string within tolerance, ignoring debounce.
    pub fn match_frequency(&self, frequency_hz: f32) -> Option<NoteMatch> {
        let frequency = frequency_hz as f64;
        if !frequency.is_finite() || frequency <= 0.0 {
            return None;
        }

        let nearest = self
            .tuning
            .strings
            .iter()
            .map(|s| NoteMatch {
                note: s.note,
                cents: cents_between(frequency, s.frequency_hz),
            })
            .min_by(|a, b| a.cents.abs().total_cmp(&b.cents.abs()))?;

        (nearest.cents.abs() < self.config.tolerance_cents).then_some(nearest)
    }

    /// Feed one detection tick. Returns a pluck event when a string matched
    /// and the debounce window since the previous pluck has elapsed.
    pub fn process(&mut self, frequency_hz: Option<f32>, now_ms: Millis) -> Option<StringPluckEvent> {
        let matched = self.match_frequency(frequency_hz?)?;

        if let Some(last) = self.last_pluck {
            if now_ms.saturating_sub(last.at_ms) < self.config.debounce_ms {
                debug!(note = %matched.note, "Pluck suppressed by debounce");
                return None;
            }
        }

        let event = StringPluckEvent {
            string: matched.note,
            at_ms: now_ms,
        };
        debug!(note = %matched.note, cents = matched.cents, at_ms = now_ms, "String plucked");
        self.last_pluck = Some(event);
        Some(event)
    }
}

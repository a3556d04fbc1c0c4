//! Autocorrelation pitch detector restricted to the guitar band.
//!
//! Per buffer:
//! 1. RMS silence gate (the RMS is always reported for metering).
//! 2. Autocorrelation normalized by lag-0 energy.
//! 3. Search lags between `sample_rate / max_hz` and `sample_rate / min_hz`
//!    for strict local maxima, highest correlation wins.
//! 4. A candidate whose lag/2, lag/3 or lag/4 correlates noticeably better is a
//!    harmonic of something shorter and is skipped.
//! 5. The winner must clear the clarity threshold.
//!
//! Steps 1-5 alone pick the period; the reported frequency would be
//! `sample_rate / lag`. Only that chosen lag is then refined to sub-sample
//! precision on the normalized square difference function (hill climb +
//! parabolic fit), which peaks exactly at the period even when the buffer
//! holds only a few cycles. Refinement never changes which candidate wins.

use serde::{Deserialize, Serialize};

use fretstorm_core::constants::{
    CLARITY_THRESHOLD, HARMONIC_REJECTION_RATIO, MAX_DETECT_HZ, MIN_DETECT_HZ, MIN_DETECT_RMS,
};

/// Detector thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// RMS below which the buffer is treated as silence.
    pub min_rms: f32,
    pub min_frequency_hz: f32,
    pub max_frequency_hz: f32,
    /// Normalized correlation a candidate must exceed.
    pub clarity_threshold: f32,
    /// Sub-lag correlation ratio that marks a candidate as a harmonic.
    pub harmonic_ratio: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_rms: MIN_DETECT_RMS,
            min_frequency_hz: MIN_DETECT_HZ,
            max_frequency_hz: MAX_DETECT_HZ,
            clarity_threshold: CLARITY_THRESHOLD,
            harmonic_ratio: HARMONIC_REJECTION_RATIO,
        }
    }
}

/// Outcome of one detection tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Estimated fundamental, `None` when nothing usable was heard.
    pub frequency_hz: Option<f32>,
    /// RMS of the buffer, reported even when detection fails.
    pub amplitude_rms: f32,
    /// Normalized correlation of the accepted lag (0.0 when rejected).
    pub clarity: f32,
}

/// Reusable detector. Holds a scratch correlation buffer so the hot path does
/// not allocate after the first frame.
#[derive(Debug, Clone, Default)]
pub struct PitchDetector {
    config: DetectorConfig,
    correlation: Vec<f32>,
}

impl PitchDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            correlation: Vec::new(),
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Estimate the fundamental frequency of `buffer`.
    pub fn detect(&mut self, buffer: &[f32], sample_rate: u32) -> DetectionResult {
        let amplitude_rms = rms(buffer);
        if !amplitude_rms.is_finite() {
            return DetectionResult::default();
        }
        let silent = DetectionResult {
            frequency_hz: None,
            amplitude_rms,
            clarity: 0.0,
        };
        if buffer.is_empty() || sample_rate == 0 || amplitude_rms < self.config.min_rms {
            return silent;
        }

        let sr = sample_rate as f32;
        let min_lag = ((sr / self.config.max_frequency_hz).floor() as usize).max(1);
        let max_lag = ((sr / self.config.min_frequency_hz).ceil() as usize)
            .min(buffer.len().saturating_sub(2));
        if min_lag >= max_lag {
            return silent;
        }

        // Neighbour of the last searched lag is needed for the local-max test.
        self.autocorrelate(buffer, max_lag + 1);
        let energy = self.correlation[0];
        if !(energy > 0.0) {
            return silent;
        }
        for c in &mut self.correlation {
            *c /= energy;
        }

        let Some((lag, clarity)) = self.best_candidate(min_lag, max_lag) else {
            return silent;
        };
        if clarity <= self.config.clarity_threshold {
            return silent;
        }

        let period = refine_period(buffer, lag);
        let frequency = sr / period;
        if !frequency.is_finite()
            || frequency < self.config.min_frequency_hz
            || frequency > self.config.max_frequency_hz
        {
            return silent;
        }

        DetectionResult {
            frequency_hz: Some(frequency),
            amplitude_rms,
            clarity,
        }
    }

    /// Fill `self.correlation[0..=max_lag]` with the raw autocorrelation.
    fn autocorrelate(&mut self, buffer: &[f32], max_lag: usize) {
        self.correlation.clear();
        self.correlation.extend((0..=max_lag).map(|lag| {
            buffer[..buffer.len() - lag]
                .iter()
                .zip(&buffer[lag..])
                .map(|(&a, &b)| a as f64 * b as f64)
                .sum::<f64>() as f32
        }));
    }

    /// Highest strict local maximum in `[min_lag, max_lag]` that is not a harmonic.
    fn best_candidate(&self, min_lag: usize, max_lag: usize) -> Option<(usize, f32)> {
        let r = &self.correlation;
        let mut best: Option<(usize, f32)> = None;

        for lag in min_lag..=max_lag {
            let value = r[lag];
            if !(value > r[lag - 1] && value > r[lag + 1]) {
                continue;
            }
            if best.is_some_and(|(_, best_value)| value <= best_value) {
                continue;
            }
            if self.is_harmonic(lag) {
                continue;
            }
            best = Some((lag, value));
        }

        best
    }

    fn is_harmonic(&self, lag: usize) -> bool {
        let r = &self.correlation;
        (2..=4).any(|factor| {
            let sub = lag / factor;
            sub > 0 && r[sub] > r[lag] * self.config.harmonic_ratio
        })
    }
}

/// Root mean square of a buffer (0.0 for an empty buffer).
pub fn rms(buffer: &[f32]) -> f32 {
    if buffer.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = buffer.iter().map(|&x| x as f64 * x as f64).sum();
    (sum_sq / buffer.len() as f64).sqrt() as f32
}

/// Normalized square difference at an integer lag, in [-1, 1].
fn nsdf(buffer: &[f32], lag: usize) -> f32 {
    let (mut acf, mut norm) = (0.0f64, 0.0f64);
    for (&a, &b) in buffer[..buffer.len() - lag].iter().zip(&buffer[lag..]) {
        let (a, b) = (a as f64, b as f64);
        acf += a * b;
        norm += a * a + b * b;
    }
    if norm > 0.0 {
        (2.0 * acf / norm) as f32
    } else {
        0.0
    }
}

/// Refine an integer lag to a fractional period.
///
/// Climbs the NSDF from `lag` to the nearest local maximum (staying within
/// half a period either way), then fits a parabola through the peak and its
/// neighbours.
fn refine_period(buffer: &[f32], lag: usize) -> f32 {
    let lo = (lag / 2).max(1);
    let hi = (lag + lag / 2).min(buffer.len().saturating_sub(2));
    if lag <= lo || lag >= hi {
        return lag as f32;
    }

    let mut peak = lag;
    let mut peak_value = nsdf(buffer, peak);
    let mut left = nsdf(buffer, peak - 1);
    let mut right = nsdf(buffer, peak + 1);

    loop {
        if right > peak_value && right >= left && peak + 1 < hi {
            left = peak_value;
            peak_value = right;
            peak += 1;
            right = nsdf(buffer, peak + 1);
        } else if left > peak_value && peak - 1 > lo {
            right = peak_value;
            peak_value = left;
            peak -= 1;
            left = nsdf(buffer, peak - 1);
        } else {
            break;
        }
    }

    let denom = left - 2.0 * peak_value + right;
    if denom.abs() < f32::EPSILON {
        return peak as f32;
    }
    let shift = (0.5 * (left - right) / denom).clamp(-0.5, 0.5);
    peak as f32 + shift
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rms_of_constant() {
        assert!((rms(&[0.5; 64]) - 0.5).abs() < 1e-6);
        assert_eq!(rms(&[]), 0.0);
    }

    #[test]
    fn test_nsdf_is_one_at_zero_lag() {
        let buf: Vec<f32> = (0..256).map(|i| (i as f32 * 0.1).sin()).collect();
        assert!((nsdf(&buf, 0) - 1.0).abs() < 1e-6);
    }
}

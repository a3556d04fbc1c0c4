//! Application configuration: a JSON file whose fields all have defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use fretstorm_core::constants::{DEFAULT_FRAME_SIZE, DEFAULT_SAMPLE_RATE, TICK_RATE};
use fretstorm_core::tuning::TuningName;
use fretstorm_pitch::{DetectorConfig, MatcherConfig};
use fretstorm_sim::SimConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub tuning: TuningName,
    pub seed: u64,
    pub tick_rate_hz: u32,
    /// Samples per detection frame.
    pub frame_size: usize,
    pub sample_rate: u32,
    pub detector: DetectorConfig,
    pub matcher: MatcherConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tuning: TuningName::default(),
            seed: SimConfig::default().seed,
            tick_rate_hz: TICK_RATE,
            frame_size: DEFAULT_FRAME_SIZE,
            sample_rate: DEFAULT_SAMPLE_RATE,
            detector: DetectorConfig::default(),
            matcher: MatcherConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&text).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        })?;
        Ok(config)
    }

    /// Parse and validate config text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=240).contains(&self.tick_rate_hz) {
            return Err(ConfigError::Invalid(format!(
                "tick_rate_hz must be within 1..=240, got {}",
                self.tick_rate_hz
            )));
        }
        if self.sample_rate == 0 {
            return Err(ConfigError::Invalid("sample_rate must be positive".into()));
        }
        // The lowest detectable period has to fit in one frame.
        let longest_period =
            (self.sample_rate as f32 / self.detector.min_frequency_hz).ceil() as usize;
        if self.frame_size < longest_period + 2 {
            return Err(ConfigError::Invalid(format!(
                "frame_size {} is too short for {} Hz at {} Hz sampling",
                self.frame_size, self.detector.min_frequency_hz, self.sample_rate
            )));
        }
        let d = &self.detector;
        if !(d.min_frequency_hz > 0.0 && d.min_frequency_hz < d.max_frequency_hz) {
            return Err(ConfigError::Invalid(format!(
                "detector band {}..{} Hz is empty",
                d.min_frequency_hz, d.max_frequency_hz
            )));
        }
        if self.matcher.tolerance_cents <= 0.0 {
            return Err(ConfigError::Invalid(
                "matcher.tolerance_cents must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn sim_config(&self) -> SimConfig {
        SimConfig {
            seed: self.seed,
            tuning: self.tuning,
        }
    }

    /// Milliseconds between ticks.
    pub fn tick_interval_ms(&self) -> u64 {
        (1000 / self.tick_rate_hz.max(1)) as u64
    }
}

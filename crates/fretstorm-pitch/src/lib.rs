//! Pitch detection and string matching for FRETSTORM.
//!
//! Turns a time-domain audio buffer into a fundamental frequency estimate,
//! then maps that estimate onto the active tuning and debounces it into
//! discrete `StringPluckEvent`s. No audio I/O and no simulation dependency.

pub mod detector;
pub mod matcher;

pub use detector::{DetectionResult, DetectorConfig, PitchDetector};
pub use fretstorm_core as core;
pub use matcher::{cents_between, MatcherConfig, NoteMatch, NoteMatcher};

#[cfg(test)]
mod tests;

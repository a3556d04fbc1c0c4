//! Error types for the configuration surface.
//!
//! The simulation itself has no error path; these cover parsing values
//! supplied from outside (config files, command lines).

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Tuning name not in the catalog
    #[error("Unknown tuning '{0}' (expected one of: standard, drop-d, half-step-down, open-g, dadgad)")]
    UnknownTuning(String),
}

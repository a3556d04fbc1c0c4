//! Commands sent from the driver to the simulation.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::events::StringPluckEvent;
use crate::tuning::TuningName;

/// All possible player and operator actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerCommand {
    /// A debounced string identification from the note matcher.
    StringPlucked(StringPluckEvent),
    /// Leave Idle and enter the first tutorial step.
    Begin,
    /// Escape hatch: jump from any tutorial step or game over straight into a mission.
    Skip,
    /// Stop the mission and return to Idle.
    Stop,
    /// Switch the active tuning. Ignored while a mission is running.
    SelectTuning { tuning: TuningName },
}

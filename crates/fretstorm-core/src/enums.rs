//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Tutorial step. Steps form a fixed sequence; each one asks for a string by
/// course so the sequence works with every tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TutorialStep {
    /// Check the microphone by plucking the thickest string.
    Tune,
    /// Shoot with the thickest string.
    FireLow,
    /// Shoot with the thinnest string.
    FireHigh,
    /// Launch the mission with the thickest string.
    Launch,
}

/// Mission phase (top-level state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase")]
pub enum MissionPhase {
    #[default]
    Idle,
    Tutorial {
        step: TutorialStep,
    },
    Active,
    GameOver {
        restart_armed: bool,
    },
}

impl MissionPhase {
    pub fn is_active(&self) -> bool {
        matches!(self, MissionPhase::Active)
    }
}

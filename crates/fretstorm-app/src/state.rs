//! Types shared between the game loop and whatever drives or displays it.

use serde::{Deserialize, Serialize};

use fretstorm_core::commands::PlayerCommand;
use fretstorm_core::events::StringPluckEvent;
use fretstorm_core::state::GameStateSnapshot;
use fretstorm_core::tuning::TuningName;
use fretstorm_pitch::{DetectionResult, NoteMatch};

/// Commands sent to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A player command to forward to the simulation engine.
    PlayerCommand(PlayerCommand),
    /// Switch tuning in both the matcher and the engine.
    SelectTuning(TuningName),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Live input level and pitch, reported every tick regardless of phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Meter {
    pub detection: DetectionResult,
    /// Nearest string within tolerance, before debounce.
    pub matched: Option<NoteMatch>,
    pub input_available: bool,
}

/// Everything one loop step produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoopFrame {
    pub now_ms: u64,
    pub meter: Meter,
    /// Debounced pluck forwarded to the engine this step.
    pub pluck: Option<StringPluckEvent>,
    pub snapshot: GameStateSnapshot,
}

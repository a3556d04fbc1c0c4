//! Game state snapshot: the complete visible state handed to the renderer each tick.

use serde::{Deserialize, Serialize};

use crate::enums::MissionPhase;
use crate::events::GameEvent;
use crate::tuning::{Note, TuningName};
use crate::types::{Position, SimTime};

/// Complete game state produced after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameStateSnapshot {
    pub time: SimTime,
    pub phase: MissionPhase,
    pub tuning: TuningName,
    pub meteors: Vec<MeteorView>,
    pub lasers: Vec<LaserView>,
    pub shields: Vec<ShieldView>,
    pub rocket: RocketView,
    pub score: ScoreView,
    /// Events raised during this tick.
    pub events: Vec<GameEvent>,
    /// Note the current tutorial step or armed restart is waiting for.
    pub awaiting: Option<Note>,
    /// Instruction for the current tutorial step or armed restart.
    pub prompt: Option<String>,
    /// Non-fatal status line (e.g. a pluck that found no meteor).
    pub status: Option<String>,
}

/// A live meteor on screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeteorView {
    pub id: u32,
    pub position: Position,
    pub size: f64,
    pub speed: f64,
    pub string: Note,
    pub label: String,
    pub targeted: bool,
    pub rotation: f64,
}

/// An in-flight laser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaserView {
    pub id: u32,
    pub start: Position,
    pub end: Position,
    pub target_meteor: u32,
    /// Fraction of the laser lifetime elapsed (0.0 - 1.0), for fading.
    pub age: f64,
}

/// Shield tier status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShieldView {
    pub tier: u8,
    pub active: bool,
}

/// Rocket position.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RocketView {
    pub position: Position,
}

/// Running score for display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreView {
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    pub running: bool,
    pub meteors_destroyed: u32,
    pub lasers_fired: u32,
}

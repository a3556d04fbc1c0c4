//! Events emitted by the simulation for sound effects and UI feedback.

use serde::{Deserialize, Serialize};

use crate::tuning::Note;
use crate::types::Millis;

/// A string identified by the note matcher, emitted at most once per debounce window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringPluckEvent {
    pub string: Note,
    pub at_ms: Millis,
}

/// Discrete gameplay events for the sound-effect layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// Laser fired at a meteor.
    LaserFired { meteor_id: u32, string: Note },
    /// Meteor destroyed by a laser.
    MeteorDestroyed {
        meteor_id: u32,
        string: Note,
        points: u64,
    },
    /// A shield tier absorbed a meteor.
    ShieldBroken { tier: u8 },
    /// A meteor got through with no shields left.
    LifeLost { lives_remaining: u32 },
    /// Level increased.
    LevelUp { level: u32 },
    /// A mission (first run or restart) began.
    MissionStarted,
    /// Last life lost.
    MissionOver { score: u64, level: u32 },
    /// Restart is now accepted.
    RestartArmed,
}

//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in systems, not components.

use serde::{Deserialize, Serialize};

use crate::tuning::Note;
use crate::types::{Millis, Position};

/// Marker for the player's rocket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Rocket;

/// An incoming meteor tagged with the string that destroys it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meteor {
    /// Unique id within a mission.
    pub id: u32,
    pub string: Note,
    /// Radius in pixels.
    pub size: f64,
    /// Leftward speed in pixels per tick.
    pub speed: f64,
    /// Set on laser hit or pass-through. Destroyed meteors are inert.
    pub destroyed: bool,
    /// Claimed by an in-flight laser.
    pub targeted: bool,
    /// Current rotation (radians), cosmetic.
    pub rotation: f64,
    /// Rotation change per tick (radians).
    pub spin: f64,
}

/// A laser shot from the rocket toward one meteor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Laser {
    pub id: u32,
    pub start: Position,
    pub end: Position,
    /// Meteor id this laser was fired at.
    pub target_meteor: u32,
    pub fired_at_ms: Millis,
    /// Set once the laser has resolved against its target.
    pub spent: bool,
}

/// One tier of the shield stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shield {
    /// 1-based tier; lower tiers absorb first.
    pub tier: u8,
    pub active: bool,
}

//! Fundamental geometric and timing types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Milliseconds on the driver's monotonic clock.
pub type Millis = u64;

/// 2D position in screen space (pixels).
/// x grows to the right, y grows downward.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// 2D velocity in pixels per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of Active ticks since the mission started.
    pub tick: u64,
    /// Driver clock reading for the most recent tick.
    pub now_ms: Millis,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn as_dvec2(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// Euclidean distance to another position.
    pub fn distance_to(&self, other: &Position) -> f64 {
        self.as_dvec2().distance(other.as_dvec2())
    }

    /// Signed horizontal distance to another position (positive = other is ahead).
    pub fn horizontal_distance_to(&self, other: &Position) -> f64 {
        other.x - self.x
    }
}

impl From<DVec2> for Position {
    fn from(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl Velocity {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Speed magnitude (pixels per tick).
    pub fn speed(&self) -> f64 {
        DVec2::new(self.x, self.y).length()
    }
}

impl SimTime {
    /// Advance by one Active tick, recording the driver clock.
    pub fn advance(&mut self, now_ms: Millis) {
        self.tick += 1;
        self.now_ms = now_ms;
    }
}

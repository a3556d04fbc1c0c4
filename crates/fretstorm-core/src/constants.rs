//! Simulation constants and tuning parameters.

use crate::types::Millis;

/// Nominal render/simulation tick rate (Hz). Movement speeds assume this rate.
pub const TICK_RATE: u32 = 60;

/// Nominal milliseconds per tick.
pub const TICK_MS: f64 = 1000.0 / TICK_RATE as f64;

// --- World bounds ---

/// Playfield width in pixels.
pub const WORLD_WIDTH: f64 = 800.0;

/// Playfield height in pixels.
pub const WORLD_HEIGHT: f64 = 600.0;

// --- Rocket ---

/// Fixed horizontal position of the rocket.
pub const ROCKET_X: f64 = 100.0;

/// Rocket vertical position at mission start.
pub const ROCKET_START_Y: f64 = WORLD_HEIGHT / 2.0;

/// Fraction of the remaining vertical gap closed per tick.
pub const ROCKET_EASE_FACTOR: f64 = 0.05;

/// Maximum vertical step per tick (pixels).
pub const ROCKET_MAX_STEP: f64 = 4.0;

// --- Meteors ---

/// Vertical margin kept free at the top and bottom when spawning.
pub const METEOR_SPAWN_MARGIN: f64 = 60.0;

/// Base leftward speed in pixels per tick at level 0.
pub const METEOR_BASE_SPEED: f64 = 1.5;

/// Additional speed per level.
pub const METEOR_SPEED_PER_LEVEL: f64 = 0.3;

/// Relative random jitter applied to meteor speed (±).
pub const METEOR_SPEED_JITTER: f64 = 0.1;

/// Meteor radius by string course, thickest string first.
pub const METEOR_SIZE_BY_COURSE: [f64; 6] = [45.0, 40.0, 35.0, 30.0, 26.0, 22.0];

/// Relative random jitter applied to meteor size (±).
pub const METEOR_SIZE_JITTER: f64 = 0.15;

/// Maximum spin magnitude (radians per tick).
pub const METEOR_MAX_SPIN: f64 = 0.05;

// --- Spawning ---

/// Spawn interval at level 0 (ms).
pub const SPAWN_INTERVAL_BASE_MS: Millis = 3000;

/// Spawn interval reduction per level (ms).
pub const SPAWN_INTERVAL_PER_LEVEL_MS: Millis = 300;

/// Shortest spawn interval regardless of level (ms).
pub const SPAWN_INTERVAL_MIN_MS: Millis = 1000;

// --- Lasers ---

/// Laser time-to-live (ms), independent of hit or miss.
pub const LASER_TTL_MS: Millis = 500;

// --- Scoring & progression ---

/// Points per hit before level and size multipliers.
pub const SCORE_BASE: f64 = 100.0;

/// Meteors smaller than this radius earn a size bonus.
pub const SCORE_REFERENCE_SIZE: f64 = 50.0;

/// Score needed per level to advance (`score >= level * LEVEL_SCORE_STEP`).
pub const LEVEL_SCORE_STEP: u64 = 1000;

/// Lives at mission start.
pub const STARTING_LIVES: u32 = 3;

/// Number of shield tiers at mission start.
pub const MAX_SHIELDS: u8 = 3;

// --- Mission timing ---

/// A pluck older than this is too stale to advance a tutorial step or restart.
pub const PLUCK_RECENCY_MS: Millis = 1000;

/// Delay between mission over and restart becoming available.
pub const RESTART_DELAY_MS: Millis = 2000;

// --- Note matching ---

/// Minimum time between two emitted string plucks (global across strings).
pub const DEBOUNCE_MS: Millis = 500;

/// Maximum accepted deviation from a string's target pitch.
pub const TOLERANCE_CENTS: f64 = 7.0;

// --- Pitch detection ---

/// Lowest detectable fundamental (Hz).
pub const MIN_DETECT_HZ: f32 = 70.0;

/// Highest detectable fundamental (Hz).
pub const MAX_DETECT_HZ: f32 = 350.0;

/// RMS below which a buffer counts as silence.
pub const MIN_DETECT_RMS: f32 = 0.01;

/// Normalized correlation a candidate must exceed.
pub const CLARITY_THRESHOLD: f32 = 0.3;

/// A sub-lag beating the candidate by this ratio marks the candidate as a harmonic.
pub const HARMONIC_REJECTION_RATIO: f32 = 1.3;

/// Nominal detection buffer length (samples).
pub const DEFAULT_FRAME_SIZE: usize = 2048;

/// Nominal input sample rate (Hz).
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

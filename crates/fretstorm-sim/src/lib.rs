//! Simulation engine for FRETSTORM.
//!
//! Owns the hecs world (rocket, meteors, lasers), the shield stack and score,
//! and the mission state machine. Advances one step per `tick` and produces
//! `GameStateSnapshot`s for the renderer.

pub mod engine;
pub mod mission;
pub mod scoring;
pub mod systems;
pub mod tutorial;
pub mod world_setup;

pub use engine::{SimConfig, SimulationEngine};
pub use fretstorm_core as core;

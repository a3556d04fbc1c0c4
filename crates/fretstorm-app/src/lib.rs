//! FRETSTORM headless driver.
//!
//! Wires an audio input, the pitch detector and matcher, and the simulation
//! engine into one tick loop, plus the configuration surface for the binary.

pub mod audio_input;
pub mod config;
pub mod demo;
pub mod game_loop;
pub mod state;

pub use fretstorm_core as core;

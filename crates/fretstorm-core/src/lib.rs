//! Core types and definitions for FRETSTORM.
//!
//! This crate defines the vocabulary shared across all other crates:
//! the note catalog, components, commands, state snapshots, events, and
//! constants. It has no dependency on any audio or rendering framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod state;
pub mod tuning;
pub mod types;

#[cfg(test)]
mod tests;

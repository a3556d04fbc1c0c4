//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are plain functions over `&mut World` (or `&World` for read-only).
//! They do not own state; mission-wide counters are passed in by the engine.

pub mod cleanup;
pub mod collision;
pub mod fire_control;
pub mod lasers;
pub mod movement;
pub mod pass_through;
pub mod snapshot;
pub mod spawner;

use hecs::World;

use fretstorm_core::components::Rocket;
use fretstorm_core::constants::{ROCKET_START_Y, ROCKET_X};
use fretstorm_core::types::Position;

/// Rocket position, or its start position if no rocket exists.
pub fn rocket_position(world: &World) -> Position {
    world
        .query::<(&Rocket, &Position)>()
        .iter()
        .next()
        .map(|(_, (_, pos))| *pos)
        .unwrap_or(Position::new(ROCKET_X, ROCKET_START_Y))
}

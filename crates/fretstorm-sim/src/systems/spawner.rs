//! Meteor spawning system: spawns on a level-dependent interval.

use hecs::World;
use rand_chacha::ChaCha8Rng;

use fretstorm_core::constants::{
    SPAWN_INTERVAL_BASE_MS, SPAWN_INTERVAL_MIN_MS, SPAWN_INTERVAL_PER_LEVEL_MS,
};
use fretstorm_core::tuning::Tuning;
use fretstorm_core::types::Millis;

/// Spawn clock for the current mission.
#[derive(Debug, Clone, Default)]
pub struct SpawnTimer {
    pub last_spawn_ms: Millis,
    pub next_meteor_id: u32,
}

impl SpawnTimer {
    /// Timer for a mission starting at `now_ms`. The first meteor arrives one
    /// interval later.
    pub fn starting_at(now_ms: Millis) -> Self {
        Self {
            last_spawn_ms: now_ms,
            next_meteor_id: 0,
        }
    }
}

/// Time between spawns at a given level.
pub fn spawn_interval_ms(level: u32) -> Millis {
    SPAWN_INTERVAL_BASE_MS
        .saturating_sub(level as Millis * SPAWN_INTERVAL_PER_LEVEL_MS)
        .max(SPAWN_INTERVAL_MIN_MS)
}

/// Spawn one meteor if the interval has been exceeded.
pub fn run(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    timer: &mut SpawnTimer,
    tuning: &Tuning,
    level: u32,
    now_ms: Millis,
) -> Option<hecs::Entity> {
    if now_ms.saturating_sub(timer.last_spawn_ms) <= spawn_interval_ms(level) {
        return None;
    }
    let id = timer.next_meteor_id;
    timer.next_meteor_id += 1;
    timer.last_spawn_ms = now_ms;
    Some(crate::world_setup::spawn_random_meteor(
        world, rng, tuning, level, id,
    ))
}

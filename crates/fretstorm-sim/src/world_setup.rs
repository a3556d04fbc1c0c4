//! Entity spawn factories for setting up the simulation world.

use hecs::World;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use fretstorm_core::components::{Meteor, Rocket};
use fretstorm_core::constants::*;
use fretstorm_core::tuning::{Note, Tuning, STRING_COUNT};
use fretstorm_core::types::{Position, Velocity};

/// Clear the world and place the rocket at its start position.
pub fn setup_mission(world: &mut World) {
    world.clear();
    spawn_rocket(world);
}

pub fn spawn_rocket(world: &mut World) -> hecs::Entity {
    world.spawn((Rocket, Position::new(ROCKET_X, ROCKET_START_Y)))
}

/// Spawn a meteor just past the right edge with a random string from the tuning.
/// Thicker strings make bigger meteors; faster meteors come with higher levels.
pub fn spawn_random_meteor(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    tuning: &Tuning,
    level: u32,
    id: u32,
) -> hecs::Entity {
    let course = rng.gen_range(0..STRING_COUNT);
    let note = tuning.strings[course].note;

    let size = METEOR_SIZE_BY_COURSE[course]
        * (1.0 + rng.gen_range(-METEOR_SIZE_JITTER..=METEOR_SIZE_JITTER));
    let speed = (METEOR_BASE_SPEED + level as f64 * METEOR_SPEED_PER_LEVEL)
        * (1.0 + rng.gen_range(-METEOR_SPEED_JITTER..=METEOR_SPEED_JITTER));
    let y = rng.gen_range(METEOR_SPAWN_MARGIN..=WORLD_HEIGHT - METEOR_SPAWN_MARGIN);

    let meteor = Meteor {
        id,
        string: note,
        size,
        speed,
        destroyed: false,
        targeted: false,
        rotation: rng.gen_range(0.0..std::f64::consts::TAU),
        spin: rng.gen_range(-METEOR_MAX_SPIN..=METEOR_MAX_SPIN),
    };

    spawn_meteor(world, meteor, Position::new(WORLD_WIDTH + size, y))
}

/// Spawn a fully specified meteor.
pub fn spawn_meteor(world: &mut World, meteor: Meteor, position: Position) -> hecs::Entity {
    let velocity = Velocity::new(-meteor.speed, 0.0);
    world.spawn((meteor, position, velocity))
}

/// A non-spinning meteor with the given string, size and speed.
pub fn make_meteor(id: u32, string: Note, size: f64, speed: f64) -> Meteor {
    Meteor {
        id,
        string,
        size,
        speed,
        destroyed: false,
        targeted: false,
        rotation: 0.0,
        spin: 0.0,
    }
}

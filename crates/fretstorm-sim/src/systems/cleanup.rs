//! Cleanup system: removes destroyed meteors.

use hecs::{Entity, World};

use fretstorm_core::components::Meteor;

/// Despawn every meteor flagged destroyed.
/// Uses a pre-allocated buffer to avoid per-tick allocation.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, meteor) in world.query_mut::<&Meteor>() {
        if meteor.destroyed {
            despawn_buffer.push(entity);
        }
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

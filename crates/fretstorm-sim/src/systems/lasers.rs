//! Laser lifetime system.

use hecs::World;

use fretstorm_core::components::{Laser, Meteor};
use fretstorm_core::constants::LASER_TTL_MS;
use fretstorm_core::types::Millis;

use crate::systems::fire_control::LaserTarget;

/// Despawn lasers older than their TTL. A laser that expires without
/// resolving releases its claim so the meteor can be targeted again.
pub fn expire(world: &mut World, despawn_buffer: &mut Vec<hecs::Entity>, now_ms: Millis) {
    despawn_buffer.clear();

    for (entity, (laser, target)) in world.query::<(&Laser, &LaserTarget)>().iter() {
        if now_ms.saturating_sub(laser.fired_at_ms) < LASER_TTL_MS {
            continue;
        }
        if !laser.spent {
            if let Ok(mut meteor) = world.get::<&mut Meteor>(target.0) {
                meteor.targeted = false;
            }
        }
        despawn_buffer.push(entity);
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

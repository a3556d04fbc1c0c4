//! Collision system: resolves lasers against the meteors they were fired at.

use hecs::World;

use fretstorm_core::components::{Laser, Meteor};
use fretstorm_core::events::GameEvent;
use fretstorm_core::types::Position;

use crate::scoring::{points_for_hit, ScoreState};
use crate::systems::fire_control::LaserTarget;

/// Check every unspent laser. A laser whose endpoint lies inside its live
/// target destroys it and scores; a laser whose target is already gone is spent.
pub fn run(world: &mut World, score: &mut ScoreState, events: &mut Vec<GameEvent>) {
    let pending: Vec<(hecs::Entity, hecs::Entity, Position)> = world
        .query::<(&Laser, &LaserTarget)>()
        .iter()
        .filter(|(_, (laser, _))| !laser.spent)
        .map(|(entity, (laser, target))| (entity, target.0, laser.end))
        .collect();

    for (laser_entity, target, end) in pending {
        let target_pos = match world.get::<&Position>(target) {
            Ok(p) => Some(*p),
            Err(_) => None,
        };

        let hit = match (world.get::<&mut Meteor>(target), target_pos) {
            (Ok(mut meteor), Some(pos)) if !meteor.destroyed => {
                if end.distance_to(&pos) <= meteor.size {
                    meteor.destroyed = true;
                    meteor.targeted = false;
                    Some((meteor.id, meteor.string, meteor.size))
                } else {
                    // Still live but out of reach; the laser stays in flight.
                    continue;
                }
            }
            _ => None,
        };

        if let Ok(mut laser) = world.get::<&mut Laser>(laser_entity) {
            laser.spent = true;
        }

        if let Some((meteor_id, string, size)) = hit {
            let points = points_for_hit(score.level, size);
            score.score += points;
            score.meteors_destroyed += 1;
            events.push(GameEvent::MeteorDestroyed {
                meteor_id,
                string,
                points,
            });
        }
    }
}

//! Pass-through system: meteors that reach the rocket's x cost a shield or a life.

use hecs::World;

use fretstorm_core::components::Meteor;
use fretstorm_core::events::GameEvent;
use fretstorm_core::types::Position;

use crate::scoring::{ScoreState, ShieldStack};

/// Resolve every live meteor at or behind the rocket exactly once.
/// Returns true when the last life is gone and no shield is left.
pub fn run(
    world: &mut World,
    shields: &mut ShieldStack,
    score: &mut ScoreState,
    events: &mut Vec<GameEvent>,
) -> bool {
    let rocket_x = super::rocket_position(world).x;

    for (_entity, (meteor, pos)) in world.query_mut::<(&mut Meteor, &Position)>() {
        if meteor.destroyed || pos.x > rocket_x {
            continue;
        }
        meteor.destroyed = true;
        meteor.targeted = false;

        match shields.absorb() {
            Some(tier) => events.push(GameEvent::ShieldBroken { tier }),
            None => {
                score.lives = score.lives.saturating_sub(1);
                events.push(GameEvent::LifeLost {
                    lives_remaining: score.lives,
                });
            }
        }
    }

    score.lives == 0 && !shields.any_active()
}

//! Fire control system: turns string plucks into lasers.
//!
//! Each pluck claims the nearest live, unclaimed meteor ahead of the rocket
//! that carries the plucked string. A pluck with no such meteor is wasted.

use hecs::{Entity, World};
use tracing::debug;

use fretstorm_core::components::{Laser, Meteor};
use fretstorm_core::events::{GameEvent, StringPluckEvent};
use fretstorm_core::tuning::{Note, Tuning};
use fretstorm_core::types::{Millis, Position};

use crate::scoring::ScoreState;

/// Links a laser to the meteor entity it was fired at.
#[derive(Debug, Clone, Copy)]
pub struct LaserTarget(pub Entity);

/// Result of a single pluck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    Fired { laser_id: u32, meteor_id: u32 },
    /// No live, unclaimed meteor with that string ahead of the rocket.
    NoTarget,
    /// The string is not part of the active tuning.
    UnknownString,
}

/// Run fire control for all plucks received this tick.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    plucks: &[StringPluckEvent],
    tuning: &Tuning,
    next_laser_id: &mut u32,
    score: &mut ScoreState,
    events: &mut Vec<GameEvent>,
    status: &mut Option<String>,
    now_ms: Millis,
) {
    for pluck in plucks {
        match fire(world, pluck.string, tuning, next_laser_id, now_ms) {
            FireOutcome::Fired { laser_id, meteor_id } => {
                score.lasers_fired += 1;
                debug!(laser_id, meteor_id, string = %pluck.string, "Laser fired");
                events.push(GameEvent::LaserFired {
                    meteor_id,
                    string: pluck.string,
                });
            }
            FireOutcome::NoTarget => {
                debug!(string = %pluck.string, "Pluck wasted, no matching meteor");
                *status = Some(format!("No meteor for {}", pluck.string));
            }
            FireOutcome::UnknownString => {
                debug!(string = %pluck.string, tuning = %tuning.name, "Pluck ignored, string not in tuning");
            }
        }
    }
}

/// Fire one laser for `string` if a target exists.
pub fn fire(
    world: &mut World,
    string: Note,
    tuning: &Tuning,
    next_laser_id: &mut u32,
    now_ms: Millis,
) -> FireOutcome {
    if !tuning.contains(string) {
        return FireOutcome::UnknownString;
    }

    let rocket = super::rocket_position(world);
    let Some((target, meteor_pos)) = find_target(world, &rocket, string) else {
        return FireOutcome::NoTarget;
    };

    let meteor_id = match world.get::<&mut Meteor>(target) {
        Ok(mut meteor) => {
            meteor.targeted = true;
            meteor.id
        }
        Err(_) => return FireOutcome::NoTarget,
    };

    let laser_id = *next_laser_id;
    *next_laser_id += 1;
    world.spawn((
        Laser {
            id: laser_id,
            start: rocket,
            end: meteor_pos,
            target_meteor: meteor_id,
            fired_at_ms: now_ms,
            spent: false,
        },
        LaserTarget(target),
    ));

    FireOutcome::Fired { laser_id, meteor_id }
}

/// Nearest live, unclaimed meteor ahead of the rocket carrying `string`.
fn find_target(world: &World, rocket: &Position, string: Note) -> Option<(Entity, Position)> {
    world
        .query::<(&Meteor, &Position)>()
        .iter()
        .filter(|(_, (m, _))| !m.destroyed && !m.targeted && m.string == string)
        .map(|(entity, (_, pos))| (entity, *pos, rocket.horizontal_distance_to(pos)))
        .filter(|(_, _, dx)| *dx > 0.0)
        .min_by(|a, b| a.2.total_cmp(&b.2))
        .map(|(entity, pos, _)| (entity, pos))
}

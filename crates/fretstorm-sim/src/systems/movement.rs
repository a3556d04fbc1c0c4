//! Kinematic integration system.
//!
//! Meteors drift left by their velocity each tick and spin. The rocket eases
//! toward the height of the next threat.

use glam::DVec2;
use hecs::World;

use fretstorm_core::components::{Meteor, Rocket};
use fretstorm_core::constants::{ROCKET_EASE_FACTOR, ROCKET_MAX_STEP};
use fretstorm_core::types::{Position, Velocity};

/// Integrate position += velocity for every moving entity.
pub fn run(world: &mut World) {
    for (_entity, (pos, vel)) in world.query_mut::<(&mut Position, &Velocity)>() {
        *pos = (pos.as_dvec2() + DVec2::new(vel.x, vel.y)).into();
    }
    for (_entity, meteor) in world.query_mut::<&mut Meteor>() {
        meteor.rotation = (meteor.rotation + meteor.spin).rem_euclid(std::f64::consts::TAU);
    }
}

/// Move the rocket a capped, proportional step toward the nearest live meteor ahead.
pub fn update_rocket(world: &mut World) {
    let rocket_x = super::rocket_position(world).x;
    let target_y = world
        .query::<(&Meteor, &Position)>()
        .iter()
        .filter_map(|(_, (m, pos))| (!m.destroyed && pos.x > rocket_x).then_some(*pos))
        .min_by(|a, b| a.x.total_cmp(&b.x))
        .map(|pos| pos.y);

    let Some(target_y) = target_y else {
        return;
    };

    for (_entity, (_rocket, pos)) in world.query_mut::<(&Rocket, &mut Position)>() {
        let step = ((target_y - pos.y) * ROCKET_EASE_FACTOR).clamp(-ROCKET_MAX_STEP, ROCKET_MAX_STEP);
        pos.y += step;
    }
}

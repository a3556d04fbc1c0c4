//! Snapshot system: queries the ECS world and builds a complete GameStateSnapshot.
//!
//! Read-only: never modifies the world.

use hecs::World;

use fretstorm_core::components::{Laser, Meteor};
use fretstorm_core::constants::LASER_TTL_MS;
use fretstorm_core::enums::MissionPhase;
use fretstorm_core::events::GameEvent;
use fretstorm_core::state::*;
use fretstorm_core::tuning::{Note, Tuning};
use fretstorm_core::types::{Millis, Position, SimTime};

use crate::scoring::{ScoreState, ShieldStack};

/// Everything outside the world that the snapshot reports.
pub struct SnapshotContext<'a> {
    pub time: SimTime,
    pub now_ms: Millis,
    pub phase: MissionPhase,
    pub tuning: &'a Tuning,
    pub score: &'a ScoreState,
    pub shields: &'a ShieldStack,
    pub events: Vec<GameEvent>,
    pub awaiting: Option<Note>,
    pub prompt: Option<String>,
    pub status: Option<String>,
}

/// Build a complete GameStateSnapshot from the current world state.
pub fn build_snapshot(world: &World, ctx: SnapshotContext<'_>) -> GameStateSnapshot {
    GameStateSnapshot {
        time: ctx.time,
        phase: ctx.phase,
        tuning: ctx.tuning.name,
        meteors: build_meteors(world, ctx.tuning),
        lasers: build_lasers(world, ctx.now_ms),
        shields: ctx
            .shields
            .iter()
            .map(|s| ShieldView {
                tier: s.tier,
                active: s.active,
            })
            .collect(),
        rocket: RocketView {
            position: super::rocket_position(world),
        },
        score: ScoreView {
            score: ctx.score.score,
            lives: ctx.score.lives,
            level: ctx.score.level,
            running: ctx.score.running,
            meteors_destroyed: ctx.score.meteors_destroyed,
            lasers_fired: ctx.score.lasers_fired,
        },
        events: ctx.events,
        awaiting: ctx.awaiting,
        prompt: ctx.prompt,
        status: ctx.status,
    }
}

/// Live meteors, ordered by id.
fn build_meteors(world: &World, tuning: &Tuning) -> Vec<MeteorView> {
    let mut meteors: Vec<MeteorView> = world
        .query::<(&Meteor, &Position)>()
        .iter()
        .filter(|(_, (m, _))| !m.destroyed)
        .map(|(_, (m, pos))| MeteorView {
            id: m.id,
            position: *pos,
            size: m.size,
            speed: m.speed,
            string: m.string,
            label: tuning
                .course_of(m.string)
                .map(|c| tuning.strings[c].label.to_string())
                .unwrap_or_else(|| m.string.to_string()),
            targeted: m.targeted,
            rotation: m.rotation,
        })
        .collect();

    meteors.sort_by_key(|m| m.id);
    meteors
}

/// In-flight lasers, ordered by id.
fn build_lasers(world: &World, now_ms: Millis) -> Vec<LaserView> {
    let mut lasers: Vec<LaserView> = world
        .query::<&Laser>()
        .iter()
        .map(|(_, laser)| LaserView {
            id: laser.id,
            start: laser.start,
            end: laser.end,
            target_meteor: laser.target_meteor,
            age: (now_ms.saturating_sub(laser.fired_at_ms) as f64 / LASER_TTL_MS as f64)
                .min(1.0),
        })
        .collect();

    lasers.sort_by_key(|l| l.id);
    lasers
}

//! Headless demo session: a synthetic guitar played by a simple autopilot.
//!
//! The autopilot reads each snapshot like a player would and schedules plucks
//! on the synthetic guitar after a reaction delay. Every pluck still goes
//! through detection and matching, so a demo run exercises the full pipeline.

use serde::Serialize;
use tracing::{debug, info};

use fretstorm_core::commands::PlayerCommand;
use fretstorm_core::enums::MissionPhase;
use fretstorm_core::events::GameEvent;
use fretstorm_core::state::GameStateSnapshot;
use fretstorm_core::tuning::Note;
use fretstorm_core::types::Millis;

use crate::audio_input::SyntheticGuitar;
use crate::config::AppConfig;
use crate::game_loop::GameLoop;

/// Picks the next string to play from a snapshot.
#[derive(Debug, Clone)]
pub struct Autopilot {
    reaction_ms: Millis,
    spacing_ms: Millis,
    next_allowed_ms: Millis,
}

impl Autopilot {
    /// `spacing_ms` should exceed the matcher debounce so every pluck is heard.
    pub fn new(reaction_ms: Millis, spacing_ms: Millis) -> Self {
        Self {
            reaction_ms,
            spacing_ms,
            next_allowed_ms: 0,
        }
    }

    /// Schedule a pluck on `guitar` if the snapshot calls for one.
    pub fn play(
        &mut self,
        snapshot: &GameStateSnapshot,
        guitar: &mut SyntheticGuitar,
        now_ms: Millis,
    ) -> Option<Note> {
        if now_ms < self.next_allowed_ms {
            return None;
        }
        let note = Self::choose(snapshot)?;
        let at_ms = now_ms + self.reaction_ms;
        guitar.pluck(note, at_ms);
        self.next_allowed_ms = at_ms + self.spacing_ms;
        debug!(%note, at_ms, "Autopilot pluck scheduled");
        Some(note)
    }

    fn choose(snapshot: &GameStateSnapshot) -> Option<Note> {
        if let Some(note) = snapshot.awaiting {
            return Some(note);
        }
        if !snapshot.phase.is_active() {
            return None;
        }
        snapshot
            .meteors
            .iter()
            .filter(|m| !m.targeted && m.position.x > snapshot.rocket.position.x)
            .min_by(|a, b| a.position.x.total_cmp(&b.position.x))
            .map(|m| m.string)
    }
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new(250, 650)
    }
}

/// Totals gathered over a demo run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DemoReport {
    pub ticks: u64,
    pub plucks_heard: u32,
    pub missions_started: u32,
    pub missions_lost: u32,
    pub meteors_destroyed: u32,
    pub best_score: u64,
    pub final_snapshot: GameStateSnapshot,
}

/// Run `ticks` steps at the configured tick rate from a simulated clock.
pub fn run_demo(config: &AppConfig, ticks: u64) -> DemoReport {
    let guitar = SyntheticGuitar::new(config.sample_rate, config.seed);
    let mut game = GameLoop::new(config, guitar);
    let mut pilot = Autopilot::default();
    let tick_ms = config.tick_interval_ms();
    let mut report = DemoReport::default();

    game.queue_command(PlayerCommand::Begin);
    info!(tuning = %config.tuning, ticks, "Demo started");

    for i in 0..ticks {
        let now_ms = i * tick_ms;
        let frame = game.step(now_ms);

        if frame.pluck.is_some() {
            report.plucks_heard += 1;
        }
        for event in &frame.snapshot.events {
            match event {
                GameEvent::MissionStarted => report.missions_started += 1,
                GameEvent::MissionOver { .. } => report.missions_lost += 1,
                GameEvent::MeteorDestroyed { .. } => report.meteors_destroyed += 1,
                _ => {}
            }
        }
        report.best_score = report.best_score.max(frame.snapshot.score.score);

        pilot.play(&frame.snapshot, game.input_mut(), now_ms);
        report.ticks = i + 1;
        report.final_snapshot = frame.snapshot;
    }

    info!(
        plucks = report.plucks_heard,
        missions = report.missions_started,
        destroyed = report.meteors_destroyed,
        best_score = report.best_score,
        "Demo finished"
    );
    report
}

/// Whether the report ended with a mission in progress or finished.
pub fn reached_mission(report: &DemoReport) -> bool {
    report.missions_started > 0
        && matches!(
            report.final_snapshot.phase,
            MissionPhase::Active | MissionPhase::GameOver { .. }
        )
}

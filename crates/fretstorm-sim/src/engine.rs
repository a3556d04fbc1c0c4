//! Simulation engine, the authoritative game state.
//!
//! `SimulationEngine` owns the hecs world, the score and shield stack, and the
//! mission state machine. The driver calls `tick` once per render frame with a
//! monotonic millisecond clock; entity systems only run while the mission is
//! `Active`. Completely headless, so every scenario is deterministic under a seed.

use std::collections::VecDeque;

use hecs::World;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use fretstorm_core::commands::PlayerCommand;
use fretstorm_core::enums::MissionPhase;
use fretstorm_core::events::{GameEvent, StringPluckEvent};
use fretstorm_core::state::{GameStateSnapshot, ScoreView};
use fretstorm_core::tuning::{Tuning, TuningName};
use fretstorm_core::types::{Millis, SimTime};

use crate::mission::{self, MissionState, MissionTransition};
use crate::scoring::{ScoreState, ShieldStack};
use crate::systems;
use crate::systems::snapshot::SnapshotContext;
use crate::systems::spawner::SpawnTimer;
use crate::tutorial;
use crate::world_setup;

/// Configuration for starting a new simulation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Tuning active when the engine starts.
    pub tuning: TuningName,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tuning: TuningName::default(),
        }
    }
}

/// The simulation engine. Owns the ECS world and all sim state.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    mission: MissionState,
    tuning: &'static Tuning,
    rng: ChaCha8Rng,
    command_queue: VecDeque<PlayerCommand>,
    despawn_buffer: Vec<hecs::Entity>,
    events: Vec<GameEvent>,
    score: ScoreState,
    shields: ShieldStack,
    spawner: SpawnTimer,
    next_laser_id: u32,
    /// Plucks received while Active, fired on the next system pass.
    pending_plucks: Vec<StringPluckEvent>,
    status: Option<String>,
}

impl SimulationEngine {
    /// Create a new simulation engine with the given config.
    pub fn new(config: SimConfig) -> Self {
        let mut world = World::new();
        world_setup::spawn_rocket(&mut world);
        Self {
            world,
            time: SimTime::default(),
            mission: MissionState::default(),
            tuning: config.tuning.tuning(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            score: ScoreState::default(),
            shields: ShieldStack::default(),
            spawner: SpawnTimer::default(),
            next_laser_id: 0,
            pending_plucks: Vec::new(),
            status: None,
        }
    }

    /// Queue a player command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = PlayerCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance the simulation to `now_ms` and return the resulting snapshot.
    ///
    /// Commands are applied first, then time-driven mission transitions, then
    /// (only while Active) one step of every entity system.
    pub fn tick(&mut self, now_ms: Millis) -> GameStateSnapshot {
        self.status = None;
        self.process_commands(now_ms);
        self.poll_mission(now_ms);

        if self.mission.phase().is_active() {
            self.run_systems(now_ms);
            self.time.advance(now_ms);
        } else {
            self.pending_plucks.clear();
        }

        let prompt = match self.mission.phase() {
            MissionPhase::Tutorial { step } => Some(tutorial::prompt(step, self.tuning)),
            MissionPhase::GameOver {
                restart_armed: true,
            } => Some(format!(
                "Pluck {} to fly again",
                self.tuning.thickest().label
            )),
            _ => None,
        };

        systems::snapshot::build_snapshot(
            &self.world,
            SnapshotContext {
                time: self.time,
                now_ms,
                phase: self.mission.phase(),
                tuning: self.tuning,
                score: &self.score,
                shields: &self.shields,
                events: std::mem::take(&mut self.events),
                awaiting: self.mission.awaiting(self.tuning),
                prompt,
                status: self.status.take(),
            },
        )
    }

    /// Switch tuning now, ahead of any queued command. Refused while Active.
    ///
    /// Callers that keep their own copy of the tuning (the note matcher) should
    /// follow the engine only when this returns `true`.
    pub fn select_tuning(&mut self, tuning: TuningName) -> bool {
        if self.mission.phase().is_active() {
            debug!(requested = %tuning, "Tuning change ignored during a mission");
            return false;
        }
        if tuning != self.tuning.name {
            info!(from = %self.tuning.name, to = %tuning, "Tuning selected");
            self.tuning = tuning.tuning();
        }
        true
    }

    /// Get the current mission phase.
    pub fn phase(&self) -> MissionPhase {
        self.mission.phase()
    }

    /// Get the current simulation time.
    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Get the active tuning.
    pub fn tuning(&self) -> &'static Tuning {
        self.tuning
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Current score, lives and level.
    pub fn score(&self) -> ScoreView {
        ScoreView {
            score: self.score.score,
            lives: self.score.lives,
            level: self.score.level,
            running: self.score.running,
            meteors_destroyed: self.score.meteors_destroyed,
            lasers_fired: self.score.lasers_fired,
        }
    }

    /// Spawn a stationary-spin meteor at a fixed spot (for scripted tests).
    #[cfg(test)]
    pub fn spawn_test_meteor(
        &mut self,
        string: fretstorm_core::tuning::Note,
        size: f64,
        x: f64,
        y: f64,
        speed: f64,
    ) -> u32 {
        let id = self.spawner.next_meteor_id;
        self.spawner.next_meteor_id += 1;
        world_setup::spawn_meteor(
            &mut self.world,
            world_setup::make_meteor(id, string, size, speed),
            fretstorm_core::types::Position::new(x, y),
        );
        id
    }

    /// Look up a meteor by id (for tests).
    #[cfg(test)]
    pub fn meteor(&self, id: u32) -> Option<fretstorm_core::components::Meteor> {
        self.world
            .query::<&fretstorm_core::components::Meteor>()
            .iter()
            .find(|(_, m)| m.id == id)
            .map(|(_, m)| m.clone())
    }

    /// Get a read-only reference to the shield stack.
    #[cfg(test)]
    pub fn shields(&self) -> &ShieldStack {
        &self.shields
    }

    /// Mutable score state (for tests that need to stage a level).
    #[cfg(test)]
    pub fn score_state_mut(&mut self) -> &mut ScoreState {
        &mut self.score
    }

    /// Process all queued commands.
    fn process_commands(&mut self, now_ms: Millis) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command, now_ms);
        }
    }

    /// Handle a single player command.
    fn handle_command(&mut self, command: PlayerCommand, now_ms: Millis) {
        match command {
            PlayerCommand::StringPlucked(pluck) => {
                self.mission.record_pluck(pluck);
                if self.mission.phase().is_active() {
                    self.pending_plucks.push(pluck);
                }
            }
            PlayerCommand::Begin => {
                if self.mission.begin() {
                    info!(tuning = %self.tuning.name, "Tutorial started");
                }
            }
            PlayerCommand::Skip => {
                if self.mission.can_skip() {
                    info!(phase = ?self.mission.phase(), "Skipping to mission");
                    self.start_mission(now_ms);
                }
            }
            PlayerCommand::Stop => {
                if self.mission.phase() != MissionPhase::Idle {
                    info!(score = self.score.score, "Mission stopped");
                }
                self.mission.stop();
                world_setup::setup_mission(&mut self.world);
                self.pending_plucks.clear();
                self.score.running = false;
            }
            PlayerCommand::SelectTuning { tuning } => {
                if !self.select_tuning(tuning) {
                    self.status = Some("Tuning is locked during a mission".to_string());
                }
            }
        }
    }

    /// Apply the transition the mission state machine reports for this tick.
    fn poll_mission(&mut self, now_ms: Millis) {
        match self.mission.poll(now_ms, self.tuning) {
            Some(MissionTransition::TutorialAdvanced(step)) => {
                info!(?step, "Tutorial advanced");
            }
            Some(MissionTransition::Start) | Some(MissionTransition::Restart) => {
                self.start_mission(now_ms);
            }
            Some(MissionTransition::RestartArmed) => {
                info!(restart = %mission::restart_note(self.tuning), "Restart armed");
                self.events.push(GameEvent::RestartArmed);
            }
            None => {}
        }
    }

    /// Reset every piece of mission state and enter Active.
    fn start_mission(&mut self, now_ms: Millis) {
        world_setup::setup_mission(&mut self.world);
        self.score = ScoreState::new_mission();
        self.shields = ShieldStack::default();
        self.spawner = SpawnTimer::starting_at(now_ms);
        self.next_laser_id = 0;
        self.pending_plucks.clear();
        self.time = SimTime::default();
        self.time.now_ms = now_ms;
        self.mission.start();
        self.events.push(GameEvent::MissionStarted);
        info!(tuning = %self.tuning.name, "Mission started");
    }

    /// Run all systems in order.
    fn run_systems(&mut self, now_ms: Millis) {
        // 1. Spawning
        systems::spawner::run(
            &mut self.world,
            &mut self.rng,
            &mut self.spawner,
            self.tuning,
            self.score.level,
            now_ms,
        );
        // 2. Fire control (plucks -> lasers)
        let plucks = std::mem::take(&mut self.pending_plucks);
        systems::fire_control::run(
            &mut self.world,
            &plucks,
            self.tuning,
            &mut self.next_laser_id,
            &mut self.score,
            &mut self.events,
            &mut self.status,
            now_ms,
        );
        // 3. Laser hits
        systems::collision::run(&mut self.world, &mut self.score, &mut self.events);
        // 4. Movement integration
        systems::movement::run(&mut self.world);
        systems::movement::update_rocket(&mut self.world);
        // 5. Shields and lives
        let lost = systems::pass_through::run(
            &mut self.world,
            &mut self.shields,
            &mut self.score,
            &mut self.events,
        );
        // 6. Laser lifetime
        systems::lasers::expire(&mut self.world, &mut self.despawn_buffer, now_ms);
        // 7. Leveling
        while let Some(level) = self.score.check_level_up() {
            info!(level, score = self.score.score, "Level up");
            self.events.push(GameEvent::LevelUp { level });
        }
        // 8. Cleanup
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);

        if lost {
            self.score.running = false;
            self.mission.mission_over(now_ms);
            self.events.push(GameEvent::MissionOver {
                score: self.score.score,
                level: self.score.level,
            });
            info!(
                score = self.score.score,
                level = self.score.level,
                "Mission over"
            );
        }
    }
}

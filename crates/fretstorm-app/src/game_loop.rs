//! Game loop: detect → match → simulate, once per tick.
//!
//! `GameLoop` is the single-threaded core that owns the detector, matcher and
//! engine and is stepped with an explicit clock. `spawn_game_loop` wraps it in
//! a thread paced by the wall clock, taking commands over an `mpsc` channel
//! and publishing the latest frame in shared state for polling.

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use fretstorm_core::commands::PlayerCommand;
use fretstorm_core::tuning::TuningName;
use fretstorm_core::types::Millis;
use fretstorm_pitch::{NoteMatcher, PitchDetector};
use fretstorm_sim::SimulationEngine;

use crate::audio_input::AudioInput;
use crate::config::AppConfig;
use crate::state::{GameLoopCommand, LoopFrame, Meter};

pub struct GameLoop<I> {
    input: I,
    detector: PitchDetector,
    matcher: NoteMatcher,
    engine: SimulationEngine,
    frame: Vec<f32>,
    input_available: bool,
}

impl<I: AudioInput> GameLoop<I> {
    pub fn new(config: &AppConfig, input: I) -> Self {
        Self {
            input,
            detector: PitchDetector::new(config.detector),
            matcher: NoteMatcher::new(config.tuning, config.matcher),
            engine: SimulationEngine::new(config.sim_config()),
            frame: vec![0.0; config.frame_size],
            input_available: true,
        }
    }

    /// Forward a player command to the engine's next tick. Tuning changes are
    /// applied immediately through `select_tuning`.
    pub fn queue_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::SelectTuning { tuning } => {
                self.select_tuning(tuning);
            }
            other => self.engine.queue_command(other),
        }
    }

    /// Switch tuning in the engine, and in the matcher only if the engine
    /// accepted it. Refused while a mission is running.
    pub fn select_tuning(&mut self, tuning: TuningName) -> bool {
        if !self.engine.select_tuning(tuning) {
            debug!(requested = %tuning, "Tuning change refused during a mission");
            return false;
        }
        self.matcher.set_tuning(tuning);
        true
    }

    /// Run one tick at driver time `now_ms`.
    pub fn step(&mut self, now_ms: Millis) -> LoopFrame {
        let meter = self.listen(now_ms);

        let pluck = self.matcher.process(meter.detection.frequency_hz, now_ms);
        if let Some(pluck) = pluck {
            self.engine.queue_command(PlayerCommand::StringPlucked(pluck));
        }

        LoopFrame {
            now_ms,
            meter,
            pluck,
            snapshot: self.engine.tick(now_ms),
        }
    }

    /// Pull one frame and run detection on it.
    fn listen(&mut self, now_ms: Millis) -> Meter {
        if let Err(err) = self.input.read_frame(now_ms, &mut self.frame) {
            if self.input_available {
                warn!(error = %err, "Audio input unavailable, plucks will not be heard");
                self.input_available = false;
            }
            return Meter::default();
        }
        if !self.input_available {
            info!("Audio input available again");
            self.input_available = true;
        }

        let detection = self.detector.detect(&self.frame, self.input.sample_rate());
        Meter {
            detection,
            matched: detection
                .frequency_hz
                .and_then(|f| self.matcher.match_frequency(f)),
            input_available: true,
        }
    }

    pub fn engine(&self) -> &SimulationEngine {
        &self.engine
    }

    pub fn matcher(&self) -> &NoteMatcher {
        &self.matcher
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the thread handle.
pub fn spawn_game_loop<I>(
    config: AppConfig,
    input: I,
    latest_frame: Arc<Mutex<Option<LoopFrame>>>,
) -> std::io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<()>)>
where
    I: AudioInput + Send + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("fretstorm-game-loop".into())
        .spawn(move || {
            run_game_loop(config, input, cmd_rx, &latest_frame);
        })?;

    Ok((cmd_tx, handle))
}

/// The threaded loop. Runs until Shutdown or channel disconnect.
fn run_game_loop<I: AudioInput>(
    config: AppConfig,
    input: I,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_frame: &Mutex<Option<LoopFrame>>,
) {
    let tick = Duration::from_millis(config.tick_interval_ms());
    let mut game = GameLoop::new(&config, input);
    let start = Instant::now();
    let mut next_tick_time = start;

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::PlayerCommand(cmd)) => game.queue_command(cmd),
                Ok(GameLoopCommand::SelectTuning(tuning)) => {
                    game.select_tuning(tuning);
                }
                Ok(GameLoopCommand::Shutdown) => return,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return,
            }
        }

        // 2. One step against the monotonic clock
        let now_ms = start.elapsed().as_millis() as Millis;
        let frame = game.step(now_ms);

        // 3. Publish for polling
        if let Ok(mut lock) = latest_frame.lock() {
            *lock = Some(frame);
        }

        // 4. Sleep until next tick
        next_tick_time += tick;
        let now = Instant::now();
        if next_tick_time > now {
            std::thread::sleep(next_tick_time - now);
        } else if now - next_tick_time > tick * 2 {
            // Too far behind, skip ahead instead of catching up
            next_tick_time = now;
        }
    }
}

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use fretstorm_app::audio_input::{SyntheticGuitar, UnavailableInput};
use fretstorm_app::config::AppConfig;
use fretstorm_app::demo;
use fretstorm_app::game_loop::spawn_game_loop;
use fretstorm_app::state::{GameLoopCommand, LoopFrame};
use fretstorm_core::commands::PlayerCommand;
use fretstorm_core::tuning::TuningName;

#[derive(Parser, Debug)]
#[command(name = "fretstorm", about = "Guitar-driven meteor defence, headless driver")]
struct Args {
    /// JSON config file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Tuning (standard, drop-d, half-step-down, open-g, dadgad)
    #[arg(short, long)]
    tuning: Option<TuningName>,

    /// RNG seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Ticks to simulate in the headless autopilot demo
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,

    /// Run the threaded loop against the wall clock for this many seconds instead
    #[arg(long)]
    realtime: Option<u64>,

    /// With --realtime, simulate a missing microphone
    #[arg(long)]
    no_audio: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(tuning) = args.tuning {
        config.tuning = tuning;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.validate().context("validating configuration")?;

    match args.realtime {
        Some(seconds) => run_realtime(config, seconds, args.no_audio),
        None => {
            let report = demo::run_demo(&config, args.ticks);
            if args.json {
                let json = serde_json::to_string_pretty(&report)
                    .context("serializing demo report")?;
                println!("{json}");
            }
            Ok(())
        }
    }
}

fn run_realtime(config: AppConfig, seconds: u64, no_audio: bool) -> Result<()> {
    let latest: Arc<Mutex<Option<LoopFrame>>> = Arc::new(Mutex::new(None));
    let (tx, handle) = if no_audio {
        let input = UnavailableInput {
            reason: "disabled with --no-audio".into(),
        };
        spawn_game_loop(config, input, latest.clone())
    } else {
        let mut guitar = SyntheticGuitar::new(config.sample_rate, config.seed);
        // Open strings, thickest to thinnest, one per second.
        for (i, string) in config.tuning.tuning().strings.iter().enumerate() {
            guitar.pluck(string.note, 1000 * (i as u64 + 1));
        }
        spawn_game_loop(config, guitar, latest.clone())
    }
    .context("spawning game loop thread")?;

    tx.send(GameLoopCommand::PlayerCommand(PlayerCommand::Begin))
        .context("game loop exited early")?;

    for _ in 0..seconds {
        std::thread::sleep(Duration::from_secs(1));
        if let Ok(lock) = latest.lock() {
            if let Some(frame) = lock.as_ref() {
                info!(
                    now_ms = frame.now_ms,
                    phase = ?frame.snapshot.phase,
                    rms = frame.meter.detection.amplitude_rms,
                    hz = ?frame.meter.detection.frequency_hz,
                    "Loop status"
                );
            }
        }
    }

    // Fails only if the loop already exited.
    let _ = tx.send(GameLoopCommand::Shutdown);
    handle
        .join()
        .map_err(|_| anyhow::anyhow!("game loop thread panicked"))?;
    Ok(())
}

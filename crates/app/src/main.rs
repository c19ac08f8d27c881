use std::path::{Path, PathBuf};

use beatscope_core::{AnalysisEngine, BeatscopeError, EngineConfig, Resolution};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod synth;

use synth::SnapshotSynth;

fn main() -> beatscope_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            bpm,
            seconds,
            resolution,
            tick_hz,
            output,
        } => run_simulate(bpm, seconds, resolution, tick_hz, output.as_deref()),
        Commands::Defaults => print_defaults(),
    }
}

fn run_simulate(
    bpm: f32,
    seconds: f32,
    resolution: usize,
    tick_hz: f32,
    output: Option<&Path>,
) -> beatscope_core::Result<()> {
    let resolution = Resolution::from_bins(resolution).ok_or_else(|| {
        BeatscopeError::Config(format!("unsupported resolution {resolution} bins"))
    })?;
    let config = EngineConfig {
        resolution,
        ..EngineConfig::default()
    };
    let mut engine = AnalysisEngine::with_config(config)?;
    let mut synth = SnapshotSynth::new(44_100.0, resolution.bins());

    tracing::info!(bpm, seconds, bins = resolution.bins(), "simulating synthetic capture");

    let beat_period_s = 60.0 / bpm;
    let ticks = (seconds * tick_hz).ceil() as u64;
    let mut frames = Vec::new();

    for tick in 0..ticks {
        let time_s = tick as f32 / tick_hz;
        let snapshot = synth.snapshot_at(time_s, beat_period_s)?;
        let frame = engine.tick(&snapshot, synth.nyquist_hz(), f64::from(time_s) * 1000.0)?;

        if frame.beat {
            tracing::info!(time_s, bpm = frame.bpm, bass = frame.bass, rms = frame.rms, "beat");
        }
        if output.is_some() {
            frames.push(frame);
        }
    }

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&frames)
            .map_err(|err| BeatscopeError::msg(err.to_string()))?;
        std::fs::write(path, json)?;
        tracing::info!(?path, count = frames.len(), "wrote frame dump");
    }

    Ok(())
}

fn print_defaults() -> beatscope_core::Result<()> {
    let json = serde_json::to_string_pretty(&EngineConfig::default())
        .map_err(|err| BeatscopeError::msg(err.to_string()))?;
    println!("{json}");
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Driver for the Beatscope analysis engine", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Drive the engine with a synthetic kick pattern and log its output.
    Simulate {
        /// Tempo of the synthetic kick pattern.
        #[arg(long, default_value_t = 128.0)]
        bpm: f32,
        /// Length of the simulated session in seconds.
        #[arg(long, default_value_t = 10.0)]
        seconds: f32,
        /// Snapshot resolution in bins (128, 256 or 512).
        #[arg(long, default_value_t = 256)]
        resolution: usize,
        /// Analysis ticks per second.
        #[arg(long, default_value_t = 60.0)]
        tick_hz: f32,
        /// Optional path for a JSON dump of every analysis frame.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the default engine configuration as JSON.
    Defaults,
}

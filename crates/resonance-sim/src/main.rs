//! Resonance network simulation driver.
//!
//! Builds a network from configuration, integrates it, stabilizes it,
//! optionally induces an emergence type and applies a feedback batch, then
//! prints a JSON report on stdout.
//!
//! ## Usage
//!
//! ```bash
//! # Defaults from config/default.toml and RESONANCE__* variables
//! cargo run -p resonance-sim -- --seed 42 --steps 500
//!
//! # Explicit config file, induce pattern formation with a 2s bound
//! cargo run -p resonance-sim -- --config config/default.toml \
//!     --induce pattern_formation --strength 0.7 --timeout-ms 2000
//!
//! # Apply a JSON array of feedback records after the run
//! cargo run -p resonance-sim -- --feedback feedback.json --output report.json
//!
//! # Verbose logging
//! RUST_LOG=debug cargo run -p resonance-sim
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use resonance_core::{ControlFeedback, EmergenceEvent, EmergenceType, EngineConfig, NetworkSummary};
use resonance_engine::{
    AdaptiveGains, CoherenceMetrics, EmergenceTarget, EmergenceTrend, ResonanceEngine,
    StabilizationOutcome,
};

/// Resonance network simulation driver.
#[derive(Parser, Debug)]
#[command(name = "resonance-sim")]
#[command(about = "Build, run, stabilize and report on a resonance network")]
struct Args {
    /// TOML configuration file. Without it, layered loading is used.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed overriding the configured one.
    #[arg(long)]
    seed: Option<u64>,

    /// Integration steps before detection.
    #[arg(long, default_value = "200")]
    steps: usize,

    /// Skip the stabilization pass.
    #[arg(long)]
    skip_stabilize: bool,

    /// Emergence type to induce, e.g. `pattern_formation`.
    #[arg(long)]
    induce: Option<EmergenceType>,

    /// Requested strength for `--induce`.
    #[arg(long, default_value = "0.8")]
    strength: f64,

    /// Timeout override for `--induce`, in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// JSON file holding an array of feedback records.
    #[arg(long)]
    feedback: Option<PathBuf>,

    /// Write the report here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct Report {
    seed: Option<u64>,
    steps_applied: usize,
    summary: NetworkSummary,
    coherence: CoherenceMetrics,
    resonance_patterns: usize,
    synchronization_patterns: usize,
    events: Vec<EmergenceEvent>,
    stabilization: Option<StabilizationOutcome>,
    induced: Option<EmergenceEvent>,
    gains: AdaptiveGains,
    trend: EmergenceTrend,
}

fn load_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {:?}", path);
            EngineConfig::from_file(path)?
        }
        None => EngineConfig::load()?,
    };
    if let Some(seed) = args.seed {
        config = config.with_seed(seed);
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.emergence.timeout_ms = timeout_ms;
    }
    config.validate()?;
    Ok(config)
}

fn load_feedback(path: &Path) -> Result<Vec<ControlFeedback>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("reading feedback file {}", path.display()))?;
    let feedback: Vec<ControlFeedback> =
        serde_json::from_str(&content).with_context(|| format!("parsing feedback file {}", path.display()))?;
    Ok(feedback)
}

fn main() -> Result<()> {
    let args = Args::parse();

    // stdout carries the report
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = load_config(&args)?;
    let seed = config.seed;
    let mut engine = ResonanceEngine::new(config)?;

    let steps_applied = engine.run(args.steps);
    let resonance_patterns = engine.detect_patterns().len();
    let synchronization_patterns = engine.detect_synchronization().len();
    let events = engine.detect_emergence();

    let stabilization = (!args.skip_stabilize).then(|| engine.stabilize());

    let induced = match args.induce {
        Some(emergence_type) => {
            let target = EmergenceTarget::new(emergence_type, args.strength)
                .with_duration(Duration::from_millis(engine.config().emergence.timeout_ms));
            let event = engine.induce_emergence(&target)?;
            if event.is_partial() {
                warn!(target = emergence_type.name(), "Induction fell back to a partial event");
            }
            Some(event)
        }
        None => None,
    };

    if let Some(path) = &args.feedback {
        let feedback = load_feedback(path)?;
        let gains = engine.apply_feedback(&feedback)?;
        info!(items = feedback.len(), ?gains, "Applied feedback");
    }

    let report = Report {
        seed,
        steps_applied,
        summary: engine.summary(),
        coherence: engine.detect_coherence(),
        resonance_patterns,
        synchronization_patterns,
        events,
        stabilization,
        induced,
        gains: engine.gains(),
        trend: engine.trend(),
    };

    let json = serde_json::to_string_pretty(&report)?;
    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing report to {}", path.display()))?;
            info!("Report written to {:?}", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}

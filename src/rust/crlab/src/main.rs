// Copyright 2026 crlab contributors
// SPDX-License-Identifier: Apache-2.0

//! crlab command line
//!
//! ```bash
//! # Run the configured experiment and store the record
//! crlab run --config lab.json --output data
//!
//! # Inspect the pulses played at one sweep point
//! crlab timeline --config lab.json --at 180 --run exc
//!
//! # Normalize two stored series to [-1, 1]
//! crlab normalize --input data/inverted_cross_resonance.json --series gnd_q6 --series exc_q6
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use crlab::LabConfig;
use crlab::persist;
use crlab::runner::run_lab;
use crlab_log::{info, warn};
use crlab_platform::{PulseSequence, create_platform};
use crlab_timeline::Timeline;
use serde::Serialize;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(name = "crlab")]
#[command(version)]
#[command(about = "Swept cross-resonance and pulse-reversal experiments")]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Log every sweep point
    #[arg(long, global = true)]
    diagnostics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the configured experiment and store the record
    Run {
        #[arg(short, long)]
        config: PathBuf,

        /// Overrides the output directory of the configuration
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the timeline of one sweep point as JSON
    Timeline {
        #[arg(short, long)]
        config: PathBuf,

        /// Sweep value: a time in ns, or an amplitude for amplitude sweeps
        #[arg(long, allow_hyphen_values = true)]
        at: f64,

        /// Run label, the first run by default
        #[arg(long)]
        run: Option<String>,
    },

    /// Normalize two series of a stored record with their combined extrema
    Normalize {
        #[arg(short, long)]
        input: PathBuf,

        #[arg(long, num_args = 1, required = true)]
        series: Vec<String>,
    },
}

#[derive(Serialize)]
struct TimelineReport<'a> {
    run: &'a str,
    at: f64,
    timeline: &'a Timeline,
    sequence: &'a PulseSequence,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, cli.diagnostics);

    match cli.command {
        Commands::Run { config, output } => {
            let mut lab = load_config(&config)?;
            if let Some(output) = output {
                lab.output_dir = output;
            }
            let record = run_lab(&lab)?;
            let path = persist::save(&record, &lab.output_dir)
                .with_context(|| format!("writing results to {}", lab.output_dir.display()))?;
            info!("Record written to {}", path.display());
        }

        Commands::Timeline { config, at, run } => {
            let lab = load_config(&config)?;
            let platform = create_platform(&lab.platform)?;
            let plan = lab.experiment.plan(platform.as_ref())?;
            let selected = match &run {
                Some(label) => plan
                    .run(label)
                    .ok_or_else(|| anyhow!("no run '{}' in {}", label, plan.name))?,
                None => plan
                    .runs
                    .first()
                    .ok_or_else(|| anyhow!("{} has no runs", plan.name))?,
            };
            let timeline = plan.timeline(selected, at)?;
            let sequence = PulseSequence::from_timeline(&timeline, platform.as_ref())?;
            let report = TimelineReport {
                run: &selected.label,
                at,
                timeline: &timeline,
                sequence: &sequence,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Commands::Normalize { input, series } => {
            let [first, second] = series.as_slice() else {
                return Err(anyhow!(
                    "expected exactly two --series, got {}",
                    series.len()
                ));
            };
            let record = persist::load(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let pair = record.normalized(first, second)?;
            println!("{}", serde_json::to_string_pretty(&pair)?);
        }
    }

    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<LabConfig> {
    let mut lab = LabConfig::load(path).with_context(|| format!("loading {}", path.display()))?;
    for change in lab.sanitize()? {
        warn!(
            "{}: {} replaced by {} ({})",
            change.field,
            change.original,
            change.sanitized,
            change.reason
        );
    }
    Ok(lab)
}

fn init_logging(level: &str, diagnostics: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
    crlab_log::init_logging(diagnostics);
}

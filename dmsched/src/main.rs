/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};

use dmsched::config::SimConfig;
use dmsched::parser::load_task_file;
use dmsched::report::write_report;
use dmsched::scheduler::DmScheduler;

// ── CLI argument definition ───────────────────────────────────────────────────

/// Deadline-Monotonic schedulability simulator.
///
/// Prints `1` and the per-task preemption counts if every job meets its
/// deadline over one hyperperiod, `0` and an empty line otherwise.
///
/// Example:
///   dmsched tasks.txt --config run.yaml
#[derive(Debug, Parser)]
#[command(name = "dmsched", version, long_about = None)]
struct Cli {
    /// Task file: one `execution_time,period,relative_deadline` line per task.
    task_file: PathBuf,

    /// Path to the YAML run configuration file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Ticks per time unit (overrides the configuration file).
    #[arg(short = 'r', long = "resolution", value_parser = clap::value_parser!(u64).range(1..))]
    resolution: Option<u64>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialise structured logging on stderr; stdout carries only the result.
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    info!(
        task_file  = %cli.task_file.display(),
        config     = ?cli.config,
        resolution = ?cli.resolution,
        "Configuration"
    );

    // ── Load run configuration ────────────────────────────────────────────────
    let mut config = match &cli.config {
        Some(path) => SimConfig::load_from_file(path)?,
        None => SimConfig::default(),
    };
    if cli.resolution.is_some() {
        config.resolution = cli.resolution;
    }

    // ── Parse, analyse, report ────────────────────────────────────────────────
    let tasks = load_task_file(&cli.task_file, config.resolution())?;

    let analysis = DmScheduler::new(config.limits())
        .analyze(&tasks)
        .with_context(|| format!("Cannot analyse {}", cli.task_file.display()))?;

    let stdout = std::io::stdout();
    write_report(&mut stdout.lock(), &analysis.outcome).context("Failed to write result")?;
    Ok(())
}

//! Batch runner for the trajectory analysis pipeline: reads a JSON array
//! of flight records and prints the resulting analysis report.

use anyhow::{Context, Result};
use atc_core::airports::StaticAirportTable;
use atc_core::pipeline::{analyze, AnalysisConfig};
use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

/// Run conflict detection, hotspot aggregation, and resolution scoring
/// over a batch of flight plans.
#[derive(Debug, Parser)]
#[command(name = "atc-cli", version, about)]
struct Cli {
    /// Path to a JSON file containing an array of flight records.
    /// Reads from stdin if omitted.
    input: Option<PathBuf>,

    /// Sample interval for trajectory points, in seconds. Falls back to
    /// `ATC_SAMPLE_SEC`, then the built-in default, when omitted.
    #[arg(long)]
    sample_sec: Option<i64>,

    /// Time bin width used by conflict detection, in seconds. Falls back
    /// to `ATC_TIME_BIN_SEC`, then the built-in default, when omitted.
    #[arg(long)]
    time_bin_sec: Option<i64>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let raw = match &cli.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("reading flight records from stdin")?;
            buf
        }
    };

    let payload: Vec<serde_json::Value> =
        serde_json::from_str(&raw).context("parsing flight records as a JSON array")?;

    let env_config = AnalysisConfig::from_env();
    let config = AnalysisConfig {
        sample_sec: cli.sample_sec.unwrap_or(env_config.sample_sec),
        time_bin_sec: cli.time_bin_sec.unwrap_or(env_config.time_bin_sec),
        ..env_config
    };

    let airports = StaticAirportTable::canadian();
    let report = analyze(&payload, &airports, &config);

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

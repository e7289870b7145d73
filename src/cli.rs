//! Command-line interface for CrawlSim
//!
//! The simulation is headless-only: rendering, input devices, and UI are
//! external collaborators, so the binary always runs a scenario file.

use clap::Parser;
use std::path::PathBuf;

/// Headless top-down combat simulator
#[derive(Parser, Debug)]
#[command(name = "crawlsim")]
#[command(about = "Headless top-down combat simulator")]
#[command(version)]
pub struct Args {
    /// JSON scenario file describing the agents and the player script
    #[arg(value_name = "SCENARIO_FILE")]
    pub scenario: PathBuf,

    /// Output path for the simulation log
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Maximum simulation duration in seconds (overrides the scenario value)
    #[arg(long)]
    pub max_duration: Option<f32>,

    /// Random seed for deterministic runs (overrides the scenario value)
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn parse_args() -> Args {
    Args::parse()
}

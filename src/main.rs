//! CrawlSim - Headless Top-Down Combat Simulation Prototype
//!
//! Loads a JSON scenario, runs the simulation to completion, and writes a
//! structured log of everything that happened.

use std::process::ExitCode;

use crawlsim::cli;
use crawlsim::headless::{run_headless_sim, ScenarioConfig};

fn main() -> ExitCode {
    let args = cli::parse_args();

    let mut config = match ScenarioConfig::load_from_file(&args.scenario) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load scenario: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // CLI overrides take precedence over scenario values
    if let Some(max_duration) = args.max_duration {
        config.max_duration_secs = max_duration;
    }
    if let Some(seed) = args.seed {
        config.random_seed = Some(seed);
    }
    if let Some(output) = args.output {
        config.output_path = Some(output.to_string_lossy().into_owned());
    }

    match run_headless_sim(config) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Simulation failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

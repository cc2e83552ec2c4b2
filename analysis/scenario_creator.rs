// Scenario Creator - scale a household load profile into a scenario YAML
//
// Usage:
//   cargo run --bin scenario_creator                           (stock config: day 0, factor 0.0)
//   cargo run --bin scenario_creator scenarios/household_to_zero.yaml
//   cargo run --bin scenario_creator --input loads.csv --output scenario.yml
//
// Config file format:
//   input: loads_household.csv
//   output: household_percentages/all_households_to_zero.yml
//   entries:
//     - day: 0
//       factor: 0.0

use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::{error, info, LevelFilter};
use simple_logger::SimpleLogger;

use wz_tools::wz_scenario;
use wz_tools::ScenarioConfig;

/// Create a scenario YAML from a load profile CSV
#[derive(Parser, Debug)]
#[command(name = "scenario_creator")]
struct Cli {
    /// YAML config with input, output and day/factor entries
    config: Option<PathBuf>,

    /// Load profile CSV (overrides the config)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Scenario YAML to write (overrides the config)
    #[arg(long)]
    output: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("Failed to initialise logging: {}", e);
    }

    let mut config = match &cli.config {
        Some(path) => ScenarioConfig::from_yaml_file(path).unwrap_or_else(|e| {
            error!("Failed to load config {}: {}", path.display(), e);
            process::exit(1);
        }),
        None => ScenarioConfig::default(),
    };
    if let Some(input) = cli.input {
        config.input = input;
    }
    if let Some(output) = cli.output {
        config.output = output;
    }

    info!(
        "Creating scenario from {} with {} entr{}",
        config.input.display(),
        config.entries.len(),
        if config.entries.len() == 1 { "y" } else { "ies" }
    );

    if let Err(e) = wz_scenario::run(&config) {
        error!("Scenario creation failed: {}", e);
        process::exit(1);
    }
}

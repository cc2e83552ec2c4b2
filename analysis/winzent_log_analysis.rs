// Winzent Log Analysis - runtime, messages, negotiation, ethics and energy mix per log
//
// Usage:
//   cargo run --bin winzent_log_analysis                      (all .log files in the current directory)
//   cargo run --bin winzent_log_analysis experiment.log       (a single log)
//   cargo run --bin winzent_log_analysis --dir logs/ --print  (print instead of writing the CSV)
//
// The log readouts match the Winzent agents of the "PGASC-Winzent-Changes"
// branch of mango-library.

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use log::{error, info, warn, LevelFilter};
use simple_logger::SimpleLogger;

use wz_tools::{find_log_files, AnalysisError, CsvReport, LogAnalysis, ReportRow, DEFAULT_REPORT_NAME};

/// Analyse Winzent experiment logs into a CSV report
#[derive(Parser, Debug)]
#[command(name = "winzent_log_analysis")]
struct Cli {
    /// Log file to analyse. Without it every .log file in --dir is analysed.
    log: Option<PathBuf>,

    /// Directory searched for .log files
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Print the results instead of appending them to the report
    #[arg(long)]
    print: bool,

    /// Report base name; ".csv" is appended
    #[arg(long, default_value = DEFAULT_REPORT_NAME)]
    output: String,

    /// Log per-file details
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    if let Err(e) = SimpleLogger::new().with_level(level).init() {
        eprintln!("Failed to initialise logging: {}", e);
    }

    let logs = match &cli.log {
        Some(path) => vec![path.clone()],
        None => {
            info!("All .log files in {} will be analysed", cli.dir.display());
            find_log_files(&cli.dir).unwrap_or_else(|e| {
                error!("{}", e);
                process::exit(1);
            })
        }
    };
    if logs.is_empty() {
        warn!("No .log files found in {}", cli.dir.display());
        return;
    }

    let report = CsvReport::new(&cli.output);
    if !cli.print {
        info!("Results will be written to {}", report.path().display());
    }

    let mut failed = 0;
    for path in &logs {
        let result = LogAnalysis::from_file(path).and_then(|analysis| {
            if cli.print {
                analysis.print_summary();
                Ok(())
            } else {
                report.append(&ReportRow::from_analysis(&analysis))
            }
        });

        if let Err(e) = result {
            report_failure(path, &e);
            failed += 1;
        }
    }

    info!(
        "{} of {} log file(s) analysed",
        logs.len() - failed,
        logs.len()
    );
    if failed > 0 {
        process::exit(1);
    }
}

fn report_failure(path: &Path, e: &AnalysisError) {
    match e {
        AnalysisError::HeaderMismatch { .. } => {
            error!("Skipping {}: {} (use --output for a new report)", path.display(), e)
        }
        _ => error!("Skipping {}: {}", path.display(), e),
    }
}

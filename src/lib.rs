//! # wz_tools - Winzent experiment tooling
//!
//! Helpers around experiments with the Winzent negotiation-based energy
//! balancing agents.
//!
//! ## Log analysis
//!
//! Experiment logs are plain text with ad-hoc markers per simulation step
//! (`Runtime:`, `Messages sent:`, `Needed Loads:`, `PRODUCED`,
//! `ethics_scores-->`, `Invalid`). Each statistic group is an independent
//! [`LineAccumulator`] folded over the lines of one file:
//!
//! - **Runtime / messages**: min, max and average per step
//! - **Negotiation**: negotiated power relative to the needed load
//! - **Ethics scores**: per category ratio and outage count
//! - **Energy mix**: share and used potential per energy source
//! - **Warnings**: lines reporting invalid messages
//!
//! The results of one file form a [`LogAnalysis`], which is either printed
//! or appended as a [`ReportRow`] to a `;`-separated [`CsvReport`].
//!
//! ```no_run
//! use std::path::Path;
//! use wz_tools::{CsvReport, LogAnalysis, ReportRow, DEFAULT_REPORT_NAME};
//!
//! let analysis = LogAnalysis::from_file(Path::new("experiment.log")).unwrap();
//! CsvReport::new(DEFAULT_REPORT_NAME)
//!     .append(&ReportRow::from_analysis(&analysis))
//!     .unwrap();
//! ```
//!
//! ## Scenario generation
//!
//! [`wz_scenario`] turns a household load profile CSV into a scenario YAML
//! with scaled loads per 15 minute slot.

// Log line parsing
pub mod wz_interface;
pub mod wz_error;
pub mod wz_log_line;
pub mod wz_literal;

// Statistic groups
pub mod wz_timing;
pub mod wz_negotiation;
pub mod wz_ethics;
pub mod wz_energy;

// Per-file analysis and report output
pub mod wz_analysis;
pub mod wz_report;

// Scenario generator
pub mod wz_scenario;

// Re-export commonly used types
pub use wz_analysis::{find_log_files, LogAnalysis};
pub use wz_error::{AnalysisError, ScenarioError};
pub use wz_interface::{
    fold_extremum, scan, LineAccumulator, Number, RunningStat, StatSummary, DEFAULT_REPORT_NAME,
    EXT_GRID, REPORTED_SOURCES,
};
pub use wz_log_line::{split_lines, LogLine};
pub use wz_report::{CsvReport, ReportRow};
pub use wz_scenario::{ScenarioConfig, ScenarioEntry};

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::wz_energy::{EnergyMix, EnergyMixAccumulator};
use crate::wz_error::AnalysisError;
use crate::wz_ethics::{EthicsAccumulator, EthicsScores};
use crate::wz_interface::{format_float, scan, StatSummary};
use crate::wz_log_line::{split_lines, LogLine};
use crate::wz_negotiation::NegotiationAccumulator;
use crate::wz_timing::{MessagesAccumulator, RuntimeAccumulator, WarningCounter};

/// Extension of the experiment logs picked up in directory mode
pub const LOG_EXTENSION: &str = "log";

/// All statistics extracted from one log file
#[derive(Debug, Clone, PartialEq)]
pub struct LogAnalysis {
    pub log_name: String,
    pub runtime: StatSummary,
    pub messages: StatSummary,
    pub negotiation: StatSummary,
    pub ethics_scores: EthicsScores,
    pub warnings: usize,
    pub energy: EnergyMix,
}

impl LogAnalysis {
    /// Run every scan over the same lines
    pub fn from_lines(log_name: impl Into<String>, lines: &[LogLine<'_>]) -> Result<Self, AnalysisError> {
        let analysis = Self {
            log_name: log_name.into(),
            runtime: scan::<RuntimeAccumulator>(lines)?,
            messages: scan::<MessagesAccumulator>(lines)?,
            negotiation: scan::<NegotiationAccumulator>(lines)?,
            ethics_scores: scan::<EthicsAccumulator>(lines)?,
            warnings: scan::<WarningCounter>(lines)?,
            energy: scan::<EnergyMixAccumulator>(lines)?,
        };
        debug!(
            "{}: {} lines, {} ethics categories, {} energy sources, {} warnings",
            analysis.log_name,
            lines.len(),
            analysis.ethics_scores.len(),
            analysis.energy.shares.len(),
            analysis.warnings
        );
        Ok(analysis)
    }

    pub fn from_content(log_name: impl Into<String>, content: &str) -> Result<Self, AnalysisError> {
        Self::from_lines(log_name, &split_lines(content))
    }

    /// Read and analyse a log file; the report names it by its file name
    pub fn from_file(path: &Path) -> Result<Self, AnalysisError> {
        let content = fs::read_to_string(path).map_err(|source| AnalysisError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let log_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_content(log_name, &content)
    }

    /// Print the results in human readable form
    pub fn print_summary(&self) {
        println!("\n╔════════════════════════════════════════════════════════╗");
        println!("║  Results for {}", self.log_name);
        println!("╚════════════════════════════════════════════════════════╝\n");

        println!("max. runtime: {}", format_float(self.runtime.max));
        println!("min. runtime: {}", format_float(self.runtime.min));
        println!("avg. runtime: {}", format_float(self.runtime.avg));
        println!("max. messages: {}", format_float(self.messages.max));
        println!("min. messages: {}", format_float(self.messages.min));
        println!("avg. messages: {}", format_float(self.messages.avg));
        println!("max. neg: {}", format_float(self.negotiation.max));
        println!("min. neg: {}", format_float(self.negotiation.min));
        println!("avg. neg: {}", format_float(self.negotiation.avg));
        println!();

        for (category, score) in &self.ethics_scores {
            println!(
                "ethics score for {}: [{}, {}]",
                category,
                format_float(score.ratio),
                score.outages
            );
        }
        println!("amount of warnings: {}", self.warnings);
        println!();

        for (source, share) in &self.energy.shares {
            println!(
                "Energy mix had {} % of {} energy in it. This was {} % of the possible max.",
                format_float(share * 100.0),
                source,
                format_float(self.energy.utilisation(source) * 100.0)
            );
        }
    }
}

/// All `*.log` files directly inside `dir`, sorted by name
pub fn find_log_files(dir: &Path) -> Result<Vec<PathBuf>, AnalysisError> {
    let io_error = |source: std::io::Error| AnalysisError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut logs = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_error)? {
        let path = entry.map_err(io_error)?.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some(LOG_EXTENSION) {
            logs.push(path);
        }
    }
    logs.sort();
    Ok(logs)
}

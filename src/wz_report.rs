//! CSV report of analysed logs.
//!
//! One `;`-separated row per log file, appended to a shared report. The
//! header is written when the report is created; appending a row with
//! different columns (e.g. new ethics categories) is refused.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use log::info;

use crate::wz_analysis::LogAnalysis;
use crate::wz_error::AnalysisError;
use crate::wz_interface::{format_float, REPORTED_SOURCES};

pub const DELIMITER: u8 = b';';

/// Sources whose utilisation gets a `used_<source>_potential` column
const UTILISATION_SOURCES: [&str; 4] = ["Wind", "Abfall", "gas", "PV"];

/// Flat, ordered column -> value record of one analysed log
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    fields: Vec<(String, String)>,
}

impl ReportRow {
    pub fn from_analysis(analysis: &LogAnalysis) -> Self {
        let mut row = ReportRow { fields: Vec::new() };

        row.push("log_name", analysis.log_name.clone());
        row.push("max. runtime", format_float(analysis.runtime.max));
        row.push("min_runtime", format_float(analysis.runtime.min));
        row.push("avg_runtime", format_float(analysis.runtime.avg));
        row.push("max_messages", format_float(analysis.messages.max));
        row.push("min_messages", format_float(analysis.messages.min));
        row.push("avg_messages", format_float(analysis.messages.avg));
        row.push("max. neg", format_float(analysis.negotiation.max));
        row.push("min. neg", format_float(analysis.negotiation.min));
        row.push("avg. neg", format_float(analysis.negotiation.avg));
        row.push("warnings", analysis.warnings.to_string());

        for source in REPORTED_SOURCES {
            row.push(source, format_float(analysis.energy.share(source)));
        }
        for source in UTILISATION_SOURCES {
            row.push(
                &format!("used_{}_potential", source),
                format_float(analysis.energy.utilisation(source)),
            );
        }

        for (category, score) in &analysis.ethics_scores {
            row.push(category, format_float(score.ratio));
            row.push(&format!("{}_outages", category), score.outages.to_string());
        }
        row
    }

    fn push(&mut self, column: &str, value: String) {
        self.fields.push((column.to_string(), value));
    }

    pub fn header(&self) -> Vec<&str> {
        self.fields.iter().map(|(column, _)| column.as_str()).collect()
    }

    pub fn values(&self) -> Vec<&str> {
        self.fields.iter().map(|(_, value)| value.as_str()).collect()
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, value)| value.as_str())
    }
}

/// Append-only CSV report file
pub struct CsvReport {
    path: PathBuf,
}

impl CsvReport {
    /// Report at `<base_name>.csv`
    pub fn new(base_name: &str) -> Self {
        Self::with_path(format!("{}.csv", base_name))
    }

    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one row, writing the header first if the report is new
    pub fn append(&self, row: &ReportRow) -> Result<(), AnalysisError> {
        let header = row.header();
        let write_header = match self.existing_header()? {
            None => true,
            Some(found) if found == header => false,
            Some(found) => {
                return Err(AnalysisError::HeaderMismatch {
                    path: self.path.clone(),
                    expected: header.join(";"),
                    found: found.join(";"),
                })
            }
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| AnalysisError::Io {
                path: self.path.clone(),
                source,
            })?;
        let mut writer = csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .terminator(csv::Terminator::CRLF)
            .from_writer(file);

        if write_header {
            info!("Creating report {}", self.path.display());
            writer.write_record(&header)?;
        }
        writer.write_record(row.values())?;
        writer.flush().map_err(|source| AnalysisError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }

    /// Header of the report on disk; `None` if it does not exist or is empty
    fn existing_header(&self) -> Result<Option<Vec<String>>, AnalysisError> {
        match fs::metadata(&self.path) {
            Ok(meta) if meta.len() > 0 => {}
            _ => return Ok(None),
        }

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?;
        match reader.records().next() {
            Some(record) => Ok(Some(record?.iter().map(String::from).collect())),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wz_energy::EnergyMix;
    use crate::wz_ethics::{EthicsScore, EthicsScores};
    use crate::wz_interface::{Number, StatSummary};

    fn analysis(name: &str) -> LogAnalysis {
        let mut energy = EnergyMix::default();
        energy.shares.insert("Wind".to_string(), 0.5);
        energy.shares.insert("ext_grid".to_string(), 0.5);
        energy.utilisation.insert("Wind".to_string(), 0.25);
        energy.utilisation.insert("ext_grid".to_string(), 1.0);

        LogAnalysis {
            log_name: name.to_string(),
            runtime: StatSummary { min: 1.0, max: 3.0, avg: 2.0 },
            messages: StatSummary { min: 10.0, max: 30.0, avg: 20.0 },
            negotiation: StatSummary { min: 0.5, max: 1.0, avg: 0.75 },
            ethics_scores: EthicsScores::new(),
            warnings: 2,
            energy,
        }
    }

    fn with_category(mut analysis: LogAnalysis, category: &str) -> LogAnalysis {
        analysis.ethics_scores.insert(
            category.to_string(),
            EthicsScore { ratio: 1.0, outages: Number::Int(1) },
        );
        analysis
    }

    #[test]
    fn test_row_columns() {
        let row = ReportRow::from_analysis(&with_category(analysis("run.log"), "household"));
        assert_eq!(
            row.header(),
            vec![
                "log_name",
                "max. runtime",
                "min_runtime",
                "avg_runtime",
                "max_messages",
                "min_messages",
                "avg_messages",
                "max. neg",
                "min. neg",
                "avg. neg",
                "warnings",
                "Wind",
                "Abfall",
                "gas",
                "PV",
                "ext_grid",
                "used_Wind_potential",
                "used_Abfall_potential",
                "used_gas_potential",
                "used_PV_potential",
                "household",
                "household_outages",
            ]
        );
        assert_eq!(row.get("log_name"), Some("run.log"));
        assert_eq!(row.get("max. runtime"), Some("3.0"));
        assert_eq!(row.get("warnings"), Some("2"));
        assert_eq!(row.get("Wind"), Some("0.5"));
        assert_eq!(row.get("Abfall"), Some("0.0"));
        assert_eq!(row.get("used_Wind_potential"), Some("0.25"));
        assert_eq!(row.get("household"), Some("1.0"));
        assert_eq!(row.get("household_outages"), Some("1"));
    }

    #[test]
    fn test_two_rows_one_header() {
        let dir = tempfile::tempdir().unwrap();
        let report = CsvReport::new(dir.path().join("winzent_log_results").to_str().unwrap());
        assert!(report.path().ends_with("winzent_log_results.csv"));

        report.append(&ReportRow::from_analysis(&analysis("a.log"))).unwrap();
        report.append(&ReportRow::from_analysis(&analysis("b.log"))).unwrap();

        let content = fs::read_to_string(report.path()).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("log_name;max. runtime;min_runtime;"));
        assert!(lines[0].contains(";Wind;Abfall;gas;PV;ext_grid;"));
        assert!(lines[1].starts_with("a.log;3.0;1.0;2.0;"));
        assert!(lines[2].starts_with("b.log;"));
        assert_eq!(lines[1].split(';').count(), 20);
    }

    #[test]
    fn test_new_category_against_existing_header() {
        let dir = tempfile::tempdir().unwrap();
        let report = CsvReport::with_path(dir.path().join("report.csv"));

        report.append(&ReportRow::from_analysis(&analysis("a.log"))).unwrap();
        let result = report.append(&ReportRow::from_analysis(&with_category(analysis("b.log"), "household")));
        assert!(matches!(result, Err(AnalysisError::HeaderMismatch { .. })));

        // the refused row was not written
        let content = fs::read_to_string(report.path()).unwrap();
        assert_eq!(content.lines().count(), 2);
    }

    #[test]
    fn test_empty_existing_file_gets_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        fs::write(&path, "").unwrap();

        let report = CsvReport::with_path(&path);
        report.append(&ReportRow::from_analysis(&analysis("a.log"))).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("log_name;"));
        assert_eq!(content.lines().count(), 2);
    }
}

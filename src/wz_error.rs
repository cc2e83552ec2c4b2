use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while analysing a single log file or writing its report row.
///
/// Any of these aborts the current file only; batch runs log it and move on.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// An expected marker or follow-up line was not found
    #[error("line {line}: expected {expected}")]
    MissingMarker { line: usize, expected: &'static str },

    /// A marker line is too short to hold the value at `index`
    #[error("line {line}: no token at position {index}")]
    MissingToken { line: usize, index: usize },

    /// The token at the expected position does not parse
    #[error("line {line}: token {index} `{token}` is not a valid {expected}")]
    MalformedToken {
        line: usize,
        index: usize,
        token: String,
        expected: &'static str,
    },

    /// The ethics score payload is not a mapping of name to numbers
    #[error("line {line}: malformed ethics scores: {message}")]
    LiteralParse { line: usize, message: String },

    /// Ethics score categories differ between occurrences
    #[error("line {line}: ethics category `{category}` {problem}")]
    InconsistentCategory {
        line: usize,
        category: String,
        problem: String,
    },

    /// A denominator was zero where a value has to be reported
    #[error("division by zero: {what}")]
    ZeroDivision { what: String },

    /// Power was booked to an energy source that never reported production
    #[error("line {line}: energy source `{label}` has {absolute} power but no PRODUCED entries")]
    InconsistentState {
        line: usize,
        label: String,
        absolute: f64,
    },

    /// The existing report was written with different columns
    #[error("report {} has columns `{found}`, this row needs `{expected}`", .path.display())]
    HeaderMismatch {
        path: PathBuf,
        expected: String,
        found: String,
    },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Errors raised by the scenario generator
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("load profile has no `{column}` column")]
    MissingColumn { column: &'static str },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

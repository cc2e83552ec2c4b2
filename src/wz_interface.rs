use std::fmt;
use std::ops::Add;

use crate::wz_error::AnalysisError;
use crate::wz_log_line::LogLine;

// markers written by the Winzent agents (mango-library, PGASC-Winzent-Changes branch)
pub const RUNTIME_MARKER: &str = "Runtime: ";
pub const MESSAGES_MARKER: &str = "Messages sent: ";
pub const NEEDED_LOADS_MARKER: &str = "Needed Loads: ";
pub const STEP_MARKER: &str = "Needed Loads:";
pub const PRODUCED_MARKER: &str = "PRODUCED";
pub const ETHICS_MARKER: &str = "ethics_scores";
pub const ETHICS_DELIMITER: &str = "-->";
pub const WARNING_MARKER: &str = "Invalid";

/// Synthetic energy source covering whatever the agents did not produce
pub const EXT_GRID: &str = "ext_grid";

/// Energy sources that always get a column in the report
pub const REPORTED_SOURCES: [&str; 5] = ["Wind", "Abfall", "gas", "PV", EXT_GRID];

/// Base name of the CSV report (".csv" is appended)
pub const DEFAULT_REPORT_NAME: &str = "winzent_log_results";

// ============================================================================
// Numbers
// ============================================================================

/// A numeric value that remembers whether it was written as an integer.
///
/// Ethics score payloads mix ints and floats; summing two ints keeps an int,
/// anything involving a float becomes a float.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Int(v) => v as f64,
            Number::Float(v) => v,
        }
    }

    pub fn is_zero(self) -> bool {
        self.as_f64() == 0.0
    }
}

impl Add for Number {
    type Output = Number;

    fn add(self, rhs: Number) -> Number {
        match (self, rhs) {
            (Number::Int(a), Number::Int(b)) => match a.checked_add(b) {
                Some(sum) => Number::Int(sum),
                None => Number::Float(a as f64 + b as f64),
            },
            (a, b) => Number::Float(a.as_f64() + b.as_f64()),
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(v) => write!(f, "{}", v),
            Number::Float(v) => f.write_str(&format_float(*v)),
        }
    }
}

/// Format a float so that integral values keep a trailing ".0" (1.0, not 1)
pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    let text = value.to_string();
    if text.contains('.') {
        text
    } else {
        format!("{}.0", text)
    }
}

// ============================================================================
// Running statistics
// ============================================================================

/// Update `min`/`max` with a new observation.
///
/// Bounds start at 0.0 and 0.0 doubles as "unset": a bound is replaced when
/// the value beats it or when `min` is still 0.0. The max test reads the min
/// already updated by this observation. Zero and negative extremes can be
/// lost this way; existing reports depend on it, so it stays.
pub fn fold_extremum(min: &mut f64, max: &mut f64, value: f64) {
    if *min > value || *min == 0.0 {
        *min = value;
    }
    if *max < value || *min == 0.0 {
        *max = value;
    }
}

/// min / max / sum / count over observed values
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningStat {
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub count: usize,
}

impl RunningStat {
    pub fn observe(&mut self, value: f64) {
        fold_extremum(&mut self.min, &mut self.max, value);
        self.sum += value;
        self.count += 1;
    }

    pub fn avg(&self) -> f64 {
        self.avg_over(self.count)
    }

    /// Average over an externally counted number of steps (0 when there are none)
    pub fn avg_over(&self, steps: usize) -> f64 {
        if steps == 0 {
            0.0
        } else {
            self.sum / steps as f64
        }
    }

    pub fn summary(&self) -> StatSummary {
        self.summary_over(self.count)
    }

    pub fn summary_over(&self, steps: usize) -> StatSummary {
        StatSummary {
            min: self.min,
            max: self.max,
            avg: self.avg_over(steps),
        }
    }
}

/// Reported form of a [`RunningStat`]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StatSummary {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
}

// ============================================================================
// Accumulators
// ============================================================================

/// A single-pass scan over the lines of one log file.
///
/// Every statistic group is its own accumulator; they share nothing but the
/// input lines, so they can be folded independently.
pub trait LineAccumulator: Default {
    type Output;

    fn observe(&mut self, line: &LogLine<'_>) -> Result<(), AnalysisError>;

    fn finish(self) -> Result<Self::Output, AnalysisError>;
}

/// Fold all lines into a fresh accumulator and return its result
pub fn scan<A: LineAccumulator>(lines: &[LogLine<'_>]) -> Result<A::Output, AnalysisError> {
    lines
        .iter()
        .try_fold(A::default(), |mut acc, line| {
            acc.observe(line)?;
            Ok::<A, AnalysisError>(acc)
        })?
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stat_is_zero() {
        let stat = RunningStat::default();
        assert_eq!(stat.summary(), StatSummary::default());
        assert_eq!(stat.avg(), 0.0);
    }

    #[test]
    fn test_avg_is_sum_over_count() {
        let mut stat = RunningStat::default();
        for v in [2.0, 4.0, 9.0] {
            stat.observe(v);
        }
        assert_eq!(stat.count, 3);
        assert_eq!(stat.sum, 15.0);
        assert_eq!(stat.avg(), 5.0);
        assert_eq!(stat.min, 2.0);
        assert_eq!(stat.max, 9.0);
    }

    #[test]
    fn test_avg_over_steps() {
        let mut stat = RunningStat::default();
        stat.observe(1.0);
        assert_eq!(stat.avg_over(4), 0.25);
        assert_eq!(stat.avg_over(0), 0.0);
    }

    #[test]
    fn test_fold_extremum_zero_is_unset() {
        let (mut min, mut max) = (0.0, 0.0);

        // a zero observation leaves min "unset", so the next value wins both
        fold_extremum(&mut min, &mut max, 0.0);
        fold_extremum(&mut min, &mut max, 5.0);
        assert_eq!((min, max), (5.0, 5.0));

        fold_extremum(&mut min, &mut max, 3.0);
        assert_eq!((min, max), (3.0, 5.0));
    }

    #[test]
    fn test_fold_extremum_negative_first_value() {
        let (mut min, mut max) = (0.0, 0.0);
        fold_extremum(&mut min, &mut max, -2.0);
        // max stays at its 0.0 start value
        assert_eq!((min, max), (-2.0, 0.0));
    }

    #[test]
    fn test_number_addition_promotes() {
        assert_eq!(Number::Int(1) + Number::Int(2), Number::Int(3));
        assert_eq!(Number::Int(1) + Number::Float(0.5), Number::Float(1.5));
        assert_eq!(Number::Float(0.5) + Number::Float(0.25), Number::Float(0.75));
    }

    #[test]
    fn test_number_display() {
        assert_eq!(Number::Int(1).to_string(), "1");
        assert_eq!(Number::Float(1.0).to_string(), "1.0");
        assert_eq!(Number::Float(0.25).to_string(), "0.25");
    }

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(0.0), "0.0");
        assert_eq!(format_float(-3.0), "-3.0");
        assert_eq!(format_float(0.5), "0.5");
        assert_eq!(format_float(f64::INFINITY), "inf");
    }
}

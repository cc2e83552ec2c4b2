//! Line classifier for Winzent experiment logs.
//!
//! The log format is a set of ad-hoc markers. A line carries a marker as a
//! substring and its values as tokens at fixed positions after splitting on
//! single spaces. All knowledge about those positions lives here; the
//! accumulators only see typed values.

use std::str::FromStr;

use crate::wz_error::AnalysisError;
use crate::wz_interface::{
    ETHICS_DELIMITER, ETHICS_MARKER, MESSAGES_MARKER, NEEDED_LOADS_MARKER, PRODUCED_MARKER,
    RUNTIME_MARKER, STEP_MARKER, WARNING_MARKER,
};

// token positions after splitting on ' '
const RUNTIME_TOKEN: usize = 1;
const MESSAGES_TOKEN: usize = 2;
const NEEDED_LOADS_TOKEN: usize = 2;
const NEGOTIATED_TOKEN: usize = 4;
const PRODUCED_POWER_TOKEN: usize = 1;
const PRODUCED_SOURCE_TOKEN: usize = 2;
const PRODUCED_SCALING_TOKEN: usize = 3;

/// One `PRODUCED <power> <source> <scaling>` entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Produced<'a> {
    pub power: i64,
    pub source: &'a str,
    pub scaling: f64,
}

/// A single log line with its 1-based line number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLine<'a> {
    number: usize,
    text: &'a str,
}

impl<'a> LogLine<'a> {
    pub fn new(number: usize, text: &'a str) -> Self {
        Self {
            number,
            text: text.trim_end_matches(&['\r', '\n'][..]),
        }
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// `Runtime: <seconds>`
    pub fn runtime(&self) -> Result<Option<f64>, AnalysisError> {
        if !self.text.contains(RUNTIME_MARKER) {
            return Ok(None);
        }
        self.parse_token(RUNTIME_TOKEN, "float").map(Some)
    }

    /// `Messages sent: <count>`
    pub fn messages_sent(&self) -> Result<Option<f64>, AnalysisError> {
        if !self.text.contains(MESSAGES_MARKER) {
            return Ok(None);
        }
        self.parse_token(MESSAGES_TOKEN, "float").map(Some)
    }

    /// `Needed Loads: <load>` as seen by the negotiation scan
    pub fn needed_loads(&self) -> Result<Option<f64>, AnalysisError> {
        if !self.text.contains(NEEDED_LOADS_MARKER) {
            return Ok(None);
        }
        self.parse_token(NEEDED_LOADS_TOKEN, "float").map(Some)
    }

    /// `Needed Loads:` as a step delimiter for the energy mix
    pub fn step_load(&self) -> Result<Option<f64>, AnalysisError> {
        if !self.text.contains(STEP_MARKER) {
            return Ok(None);
        }
        self.parse_token(NEEDED_LOADS_TOKEN, "float").map(Some)
    }

    /// Negotiated power on the line that follows a `Needed Loads` line
    pub fn negotiated_value(&self) -> Result<f64, AnalysisError> {
        self.parse_token(NEGOTIATED_TOKEN, "float")
    }

    /// `PRODUCED <power> <source> <scaling>`
    pub fn produced(&self) -> Result<Option<Produced<'a>>, AnalysisError> {
        if !self.text.contains(PRODUCED_MARKER) {
            return Ok(None);
        }
        Ok(Some(Produced {
            power: self.parse_token(PRODUCED_POWER_TOKEN, "integer")?,
            source: self.token(PRODUCED_SOURCE_TOKEN)?,
            scaling: self.parse_token(PRODUCED_SCALING_TOKEN, "float")?,
        }))
    }

    /// The serialized mapping after `-->` on an `ethics_scores` line
    pub fn ethics_payload(&self) -> Result<Option<&'a str>, AnalysisError> {
        if !self.text.contains(ETHICS_MARKER) {
            return Ok(None);
        }
        // the payload ends at the next delimiter, if any
        match self.text.split(ETHICS_DELIMITER).nth(1) {
            Some(payload) => Ok(Some(payload)),
            None => Err(AnalysisError::MissingMarker {
                line: self.number,
                expected: "`-->` before the ethics scores",
            }),
        }
    }

    pub fn is_warning(&self) -> bool {
        self.text.contains(WARNING_MARKER)
    }

    fn token(&self, index: usize) -> Result<&'a str, AnalysisError> {
        self.text
            .split(' ')
            .nth(index)
            .ok_or(AnalysisError::MissingToken {
                line: self.number,
                index,
            })
    }

    fn parse_token<T: FromStr>(&self, index: usize, expected: &'static str) -> Result<T, AnalysisError> {
        let token = self.token(index)?;
        token
            .trim()
            .parse()
            .map_err(|_| AnalysisError::MalformedToken {
                line: self.number,
                index,
                token: token.to_string(),
                expected,
            })
    }
}

/// Split a whole log file into numbered lines
pub fn split_lines(content: &str) -> Vec<LogLine<'_>> {
    content
        .lines()
        .enumerate()
        .map(|(i, text)| LogLine::new(i + 1, text))
        .collect()
}

//! Per-step runtime, message count and warning scans.
//!
//! Each marker line contributes one observation; files without markers
//! report an all-zero summary.

use log::warn;

use crate::wz_error::AnalysisError;
use crate::wz_interface::{LineAccumulator, RunningStat, StatSummary};
use crate::wz_log_line::LogLine;

/// Folds `Runtime:` markers
#[derive(Debug, Default)]
pub struct RuntimeAccumulator {
    stat: RunningStat,
}

impl LineAccumulator for RuntimeAccumulator {
    type Output = StatSummary;

    fn observe(&mut self, line: &LogLine<'_>) -> Result<(), AnalysisError> {
        if let Some(runtime) = line.runtime()? {
            self.stat.observe(runtime);
        }
        Ok(())
    }

    fn finish(self) -> Result<StatSummary, AnalysisError> {
        if self.stat.count == 0 {
            warn!("no runtime markers found, reporting 0");
        }
        Ok(self.stat.summary())
    }
}

/// Folds `Messages sent:` markers
#[derive(Debug, Default)]
pub struct MessagesAccumulator {
    stat: RunningStat,
}

impl LineAccumulator for MessagesAccumulator {
    type Output = StatSummary;

    fn observe(&mut self, line: &LogLine<'_>) -> Result<(), AnalysisError> {
        if let Some(messages) = line.messages_sent()? {
            self.stat.observe(messages);
        }
        Ok(())
    }

    fn finish(self) -> Result<StatSummary, AnalysisError> {
        if self.stat.count == 0 {
            warn!("no message count markers found, reporting 0");
        }
        Ok(self.stat.summary())
    }
}

/// Counts lines mentioning `Invalid`
#[derive(Debug, Default)]
pub struct WarningCounter {
    count: usize,
}

impl LineAccumulator for WarningCounter {
    type Output = usize;

    fn observe(&mut self, line: &LogLine<'_>) -> Result<(), AnalysisError> {
        if line.is_warning() {
            self.count += 1;
        }
        Ok(())
    }

    fn finish(self) -> Result<usize, AnalysisError> {
        Ok(self.count)
    }
}

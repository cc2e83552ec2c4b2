// Negotiation quality: negotiated power over the load that was needed.
//
// A `Needed Loads: ` line opens a step; the line right after it carries the
// negotiated value. Loads of -1 or below mark steps without a negotiation,
// which are counted but not measured.

use log::warn;

use crate::wz_error::AnalysisError;
use crate::wz_interface::{LineAccumulator, RunningStat, StatSummary};
use crate::wz_log_line::LogLine;

const NO_NEGOTIATION: f64 = -1.0;

#[derive(Debug, Default)]
pub struct NegotiationAccumulator {
    stat: RunningStat,
    steps: usize,
    // (line number, needed load) waiting for its value line
    pending: Option<(usize, f64)>,
}

impl LineAccumulator for NegotiationAccumulator {
    type Output = StatSummary;

    fn observe(&mut self, line: &LogLine<'_>) -> Result<(), AnalysisError> {
        if let Some(needed) = line.needed_loads()? {
            if self.pending.is_some() {
                return Err(AnalysisError::MissingMarker {
                    line: line.number(),
                    expected: "a negotiated value line, found another `Needed Loads`",
                });
            }
            self.steps += 1;
            if needed > NO_NEGOTIATION {
                self.pending = Some((line.number(), needed));
            }
            return Ok(());
        }

        if let Some((needed_at, needed)) = self.pending.take() {
            let negotiated = line.negotiated_value()?;
            if needed == 0.0 {
                return Err(AnalysisError::ZeroDivision {
                    what: format!("negotiation ratio for the zero load on line {}", needed_at),
                });
            }
            self.stat.observe(negotiated / needed);
        }
        Ok(())
    }

    fn finish(self) -> Result<StatSummary, AnalysisError> {
        if let Some((needed_at, _)) = self.pending {
            return Err(AnalysisError::MissingMarker {
                line: needed_at,
                expected: "a negotiated value line before the end of the log",
            });
        }
        if self.steps == 0 {
            warn!("no negotiation steps found, reporting 0");
        }
        Ok(self.stat.summary_over(self.steps))
    }
}

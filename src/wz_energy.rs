//! Energy mix per step.
//!
//! `PRODUCED` lines book power and scaling to a source; a `Needed Loads:`
//! line closes the step. Whatever the sources did not cover is booked to
//! `ext_grid`. Shares are relative to the needed load and averaged over all
//! steps, including steps skipped for a non-positive load.

use indexmap::IndexMap;
use log::warn;

use crate::wz_error::AnalysisError;
use crate::wz_interface::{LineAccumulator, EXT_GRID};
use crate::wz_log_line::LogLine;

/// Averaged energy mix of one log
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnergyMix {
    /// Share of the needed load covered by each source
    pub shares: IndexMap<String, f64>,
    /// Mean scaling factor of each source, i.e. how much of its potential was used
    pub utilisation: IndexMap<String, f64>,
}

impl EnergyMix {
    pub fn share(&self, source: &str) -> f64 {
        self.shares.get(source).copied().unwrap_or(0.0)
    }

    pub fn utilisation(&self, source: &str) -> f64 {
        self.utilisation.get(source).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct SourceStep {
    absolute: f64,
    scaling: f64,
    count: usize,
}

#[derive(Debug, Default)]
pub struct EnergyMixAccumulator {
    steps: usize,
    produced_this_step: f64,
    current: IndexMap<String, SourceStep>,
    share_sums: IndexMap<String, f64>,
    utilisation_sums: IndexMap<String, f64>,
}

impl EnergyMixAccumulator {
    fn close_step(&mut self, line: usize, needed: f64) -> Result<(), AnalysisError> {
        let ext_grid = self.current.entry(EXT_GRID.to_string()).or_default();
        *ext_grid = SourceStep {
            absolute: needed - self.produced_this_step,
            scaling: 1.0,
            count: 1,
        };
        self.produced_this_step = 0.0;
        self.steps += 1;

        if needed <= 0.0 {
            // booked power carries over into the next step
            warn!("line {}: needed load {} is not positive, step skipped", line, needed);
            return Ok(());
        }

        for (label, step) in self.current.iter_mut() {
            if step.count == 0 && step.absolute != 0.0 {
                return Err(AnalysisError::InconsistentState {
                    line,
                    label: label.clone(),
                    absolute: step.absolute,
                });
            }
            let share = step.absolute / needed;
            match self.share_sums.get_mut(label) {
                Some(sum) => {
                    *sum += share;
                    if step.count > 0 {
                        *self.utilisation_sums.entry(label.clone()).or_default() +=
                            step.scaling / step.count as f64;
                    }
                }
                None => {
                    let utilisation = if step.count > 0 {
                        step.scaling / step.count as f64
                    } else {
                        0.0
                    };
                    self.share_sums.insert(label.clone(), share);
                    self.utilisation_sums.insert(label.clone(), utilisation);
                }
            }
            *step = SourceStep::default();
        }
        Ok(())
    }
}

impl LineAccumulator for EnergyMixAccumulator {
    type Output = EnergyMix;

    fn observe(&mut self, line: &LogLine<'_>) -> Result<(), AnalysisError> {
        if let Some(produced) = line.produced()? {
            let power = produced.power as f64;
            self.produced_this_step += power;
            let step = self.current.entry(produced.source.to_string()).or_default();
            step.absolute += power;
            step.scaling += produced.scaling;
            step.count += 1;
        }
        if let Some(needed) = line.step_load()? {
            self.close_step(line.number(), needed)?;
        }
        Ok(())
    }

    fn finish(self) -> Result<EnergyMix, AnalysisError> {
        if self.steps == 0 {
            warn!("no energy steps found, reporting an empty mix");
            return Ok(EnergyMix::default());
        }
        let steps = self.steps as f64;
        Ok(EnergyMix {
            shares: self
                .share_sums
                .into_iter()
                .map(|(label, sum)| (label, sum / steps))
                .collect(),
            utilisation: self
                .utilisation_sums
                .into_iter()
                .map(|(label, sum)| (label, sum / steps))
                .collect(),
        })
    }
}

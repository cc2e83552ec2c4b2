//! Ethics score accumulation.
//!
//! Every `ethics_scores-->{...}` line carries, per category,
//! `[numerator, outages, denominator]`. The first line fixes the set of
//! categories; later lines are added element-wise. The reported score is
//! `numerator / denominator` next to the summed outage count.

use indexmap::IndexMap;

use crate::wz_error::AnalysisError;
use crate::wz_interface::{LineAccumulator, Number};
use crate::wz_literal::{parse_scores, ScoreMap};
use crate::wz_log_line::LogLine;

const NUMERATOR: usize = 0;
const OUTAGES: usize = 1;
const DENOMINATOR: usize = 2;

/// Final score of one category
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EthicsScore {
    pub ratio: f64,
    pub outages: Number,
}

/// Scores in the order the categories first appeared
pub type EthicsScores = IndexMap<String, EthicsScore>;

#[derive(Debug, Default)]
pub struct EthicsAccumulator {
    totals: ScoreMap,
    first_line: usize,
    occurrences: usize,
}

impl EthicsAccumulator {
    fn add(&mut self, line: usize, scores: ScoreMap) -> Result<(), AnalysisError> {
        if let Some(extra) = scores.keys().find(|key| !self.totals.contains_key(*key)) {
            return Err(AnalysisError::InconsistentCategory {
                line,
                category: extra.clone(),
                problem: format!("is not among the categories of line {}", self.first_line),
            });
        }

        for (category, total) in self.totals.iter_mut() {
            let values = scores.get(category).ok_or_else(|| AnalysisError::InconsistentCategory {
                line,
                category: category.clone(),
                problem: "is missing".to_string(),
            })?;
            if values.len() != total.len() {
                return Err(AnalysisError::InconsistentCategory {
                    line,
                    category: category.clone(),
                    problem: format!("has {} values, expected {}", values.len(), total.len()),
                });
            }
            for (sum, value) in total.iter_mut().zip(values) {
                *sum = *sum + *value;
            }
        }
        Ok(())
    }
}

impl LineAccumulator for EthicsAccumulator {
    type Output = EthicsScores;

    fn observe(&mut self, line: &LogLine<'_>) -> Result<(), AnalysisError> {
        let Some(payload) = line.ethics_payload()? else {
            return Ok(());
        };
        let scores = parse_scores(payload).map_err(|message| AnalysisError::LiteralParse {
            line: line.number(),
            message,
        })?;

        self.occurrences += 1;
        if self.totals.is_empty() {
            // an empty mapping does not fix the categories yet
            self.totals = scores;
            self.first_line = line.number();
            return Ok(());
        }
        self.add(line.number(), scores)
    }

    fn finish(self) -> Result<EthicsScores, AnalysisError> {
        let mut final_scores = EthicsScores::new();
        for (category, total) in self.totals {
            if total.len() <= DENOMINATOR {
                return Err(AnalysisError::InconsistentCategory {
                    line: self.first_line,
                    category,
                    problem: format!("has {} values, expected at least 3", total.len()),
                });
            }
            let denominator = total[DENOMINATOR];
            if denominator.is_zero() {
                return Err(AnalysisError::ZeroDivision {
                    what: format!(
                        "ethics score `{}` over {} occurrences",
                        category, self.occurrences
                    ),
                });
            }
            final_scores.insert(
                category,
                EthicsScore {
                    ratio: total[NUMERATOR].as_f64() / denominator.as_f64(),
                    outages: total[OUTAGES],
                },
            );
        }
        Ok(final_scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wz_interface::scan;
    use crate::wz_log_line::split_lines;

    #[test]
    fn test_scores_are_summed() {
        let lines = split_lines(
            "ethics_scores-->{\"A\": [1,0,2]}\n\
             Runtime: 1.0\n\
             ethics_scores-->{\"A\": [3,1,2]}\n",
        );
        let scores = scan::<EthicsAccumulator>(&lines).unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores["A"].ratio, 1.0);
        assert_eq!(scores["A"].outages, Number::Int(1));
    }

    #[test]
    fn test_category_order_is_kept() {
        let lines = split_lines(
            "ethics_scores-->{'z': [1, 2, 4], 'a': [0.5, 0, 1]}\n\
             ethics_scores-->{'a': [0.5, 0, 1], 'z': [1, 0, 4]}\n",
        );
        let scores = scan::<EthicsAccumulator>(&lines).unwrap();
        let keys: Vec<_> = scores.keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a"]);
        assert_eq!(scores["z"].ratio, 0.25);
        assert_eq!(scores["z"].outages, Number::Int(2));
        assert_eq!(scores["a"].ratio, 0.5);
    }

    #[test]
    fn test_no_scores() {
        let lines = split_lines("Runtime: 1.0\n");
        assert!(scan::<EthicsAccumulator>(&lines).unwrap().is_empty());
    }

    #[test]
    fn test_new_category_is_rejected() {
        let lines = split_lines(
            "ethics_scores-->{'A': [1, 0, 2]}\n\
             ethics_scores-->{'A': [1, 0, 2], 'B': [1, 0, 2]}\n",
        );
        match scan::<EthicsAccumulator>(&lines) {
            Err(AnalysisError::InconsistentCategory { line, category, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(category, "B");
            }
            other => panic!("expected inconsistent category, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_category_is_rejected() {
        let lines = split_lines(
            "ethics_scores-->{'A': [1, 0, 2], 'B': [1, 0, 2]}\n\
             ethics_scores-->{'A': [1, 0, 2]}\n",
        );
        assert!(matches!(
            scan::<EthicsAccumulator>(&lines),
            Err(AnalysisError::InconsistentCategory { line: 2, .. })
        ));
    }

    #[test]
    fn test_length_change_is_rejected() {
        let lines = split_lines(
            "ethics_scores-->{'A': [1, 0, 2]}\n\
             ethics_scores-->{'A': [1, 0]}\n",
        );
        assert!(matches!(
            scan::<EthicsAccumulator>(&lines),
            Err(AnalysisError::InconsistentCategory { line: 2, .. })
        ));
    }

    #[test]
    fn test_malformed_literal() {
        let lines = split_lines("ethics_scores-->{'A': [1, 0, 2}\n");
        assert!(matches!(
            scan::<EthicsAccumulator>(&lines),
            Err(AnalysisError::LiteralParse { line: 1, .. })
        ));
    }

    #[test]
    fn test_zero_denominator() {
        let lines = split_lines("ethics_scores-->{'A': [1, 0, 0]}\n");
        assert!(matches!(
            scan::<EthicsAccumulator>(&lines),
            Err(AnalysisError::ZeroDivision { .. })
        ));
    }

    #[test]
    fn test_float_outages_stay_float() {
        let lines = split_lines(
            "ethics_scores-->{'A': [1, 0.5, 2]}\n\
             ethics_scores-->{'A': [1, 1, 2]}\n",
        );
        let scores = scan::<EthicsAccumulator>(&lines).unwrap();
        assert_eq!(scores["A"].outages, Number::Float(1.5));
        assert_eq!(scores["A"].ratio, 0.5);
    }
}

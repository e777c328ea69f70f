//! Test coverage criterion
//!
//! Scores the reported coverage percentage directly. The weight grows with
//! the natural log of the code size, so coverage matters more for large
//! codebases than for a handful of lines.

use crate::model::api::{CriterionDetail, Record, SubtaskKind};
use crate::scoring::criterion::Criterion;

pub struct CoverageCriterion;

impl CoverageCriterion {
    pub const NAME: &'static str = "coverage";
}

impl Criterion for CoverageCriterion {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Share of statements exercised by the test suite"
    }

    fn evaluate(&self, record: &Record) -> CriterionDetail {
        let Some(results) = record.test_results() else {
            let reason = record
                .error(SubtaskKind::TestResults)
                .map(|e| format!("test results unavailable: {}", e))
                .unwrap_or_else(|| "test results unavailable".to_string());
            return CriterionDetail::unscored(Self::NAME, reason);
        };
        let Some(coverage) = results.coverage_percent else {
            return CriterionDetail::unscored(Self::NAME, "coverage was not reported");
        };
        let Some(stats) = record.code_statistics() else {
            return CriterionDetail::unscored(Self::NAME, "code size unknown");
        };
        if stats.lines_of_code == 0 {
            return CriterionDetail::unscored(Self::NAME, "no code to cover");
        }

        let weight = (1.0 + stats.lines_of_code as f64).ln();
        CriterionDetail::scored(
            Self::NAME,
            coverage,
            weight,
            format!("{:.1}% of {} lines covered", coverage, stats.lines_of_code),
        )
    }
}

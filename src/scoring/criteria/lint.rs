//! Lint criterion
//!
//! Composite over every linter check: the score decays exponentially with
//! findings per thousand lines of code, and each check contributes one
//! detail line. Checks listed in `expected_checks` appear even when clean.

use crate::model::api::{CriterionDetail, Record};
use crate::scoring::criterion::{exponential_decay, Criterion};
use std::collections::BTreeMap;

/// Findings per kLOC at which the score falls to ~37
const DENSITY_SCALE: f64 = 2.0;
const WEIGHT: f64 = 2.0;

#[derive(Debug, Default, Clone)]
pub struct LintCriterion {
    expected_checks: Vec<String>,
}

impl LintCriterion {
    pub const NAME: &'static str = "lint";

    pub fn with_checks(checks: Vec<String>) -> Self {
        Self {
            expected_checks: checks,
        }
    }
}

impl Criterion for LintCriterion {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Linter findings per thousand lines of code"
    }

    fn evaluate(&self, record: &Record) -> CriterionDetail {
        let Some(lint) = record.lint_findings() else {
            return CriterionDetail::unscored(Self::NAME, "lint findings unavailable");
        };
        let Some(stats) = record.code_statistics() else {
            return CriterionDetail::unscored(Self::NAME, "code size unknown");
        };
        if stats.lines_of_code == 0 {
            return CriterionDetail::unscored(Self::NAME, "no code to lint");
        }

        let kloc = stats.lines_of_code as f64 / 1000.0;
        let mut per_check: BTreeMap<&str, usize> = self
            .expected_checks
            .iter()
            .map(|check| (check.as_str(), 0))
            .collect();
        for finding in &lint.findings {
            *per_check.entry(finding.check.as_str()).or_insert(0) += 1;
        }

        let details = per_check
            .iter()
            .map(|(check, count)| match count {
                0 => format!("{}: clean", check),
                n => format!("{}: {} finding(s), {:.2}/kLOC", check, n, *n as f64 / kloc),
            })
            .collect();

        let total = lint.findings.len();
        let density = total as f64 / kloc;
        CriterionDetail::scored(
            Self::NAME,
            exponential_decay(density, DENSITY_SCALE),
            WEIGHT,
            format!("{} finding(s), {:.2} per kLOC", total, density),
        )
        .with_details(details)
    }
}

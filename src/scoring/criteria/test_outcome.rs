//! Test outcome criterion: logistic over the pass ratio

use crate::model::api::{CriterionDetail, Record};
use crate::scoring::criterion::{logistic, Criterion};

const MIDPOINT: f64 = 0.75;
const STEEPNESS: f64 = 12.0;

pub struct TestOutcomeCriterion;

impl TestOutcomeCriterion {
    pub const NAME: &'static str = "tests";
}

impl Criterion for TestOutcomeCriterion {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Proportion of executed tests that pass"
    }

    fn evaluate(&self, record: &Record) -> CriterionDetail {
        let Some(results) = record.test_results() else {
            return CriterionDetail::unscored(Self::NAME, "test results unavailable");
        };

        let executed = results.executed();
        if executed == 0 {
            // An empty suite is a finding, not missing data
            return CriterionDetail::scored(Self::NAME, 0.0, 1.0, "no tests were executed");
        }

        let ratio = results.passed as f64 / executed as f64;
        let mut message = format!("{}/{} tests passed", results.passed, executed);
        if results.skipped > 0 {
            message.push_str(&format!(", {} skipped", results.skipped));
        }
        CriterionDetail::scored(Self::NAME, logistic(ratio, MIDPOINT, STEEPNESS), 1.0, message)
    }
}

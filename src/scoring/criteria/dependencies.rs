//! Dependency footprint criterion (only scored when the optional
//! dependency listing subtask is enabled)

use crate::model::api::{CriterionDetail, Record};
use crate::scoring::criterion::{exponential_decay, Criterion};

const SCALE: f64 = 40.0;

pub struct DependencyCriterion;

impl DependencyCriterion {
    pub const NAME: &'static str = "dependencies";
}

impl Criterion for DependencyCriterion {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn evaluate(&self, record: &Record) -> CriterionDetail {
        let Some(deps) = record.dependencies() else {
            return CriterionDetail::unscored(Self::NAME, "dependency listing unavailable");
        };

        let direct = deps.direct.len();
        CriterionDetail::scored(
            Self::NAME,
            exponential_decay(direct as f64, SCALE),
            0.5,
            format!("{} direct, {} indirect dependencies", direct, deps.indirect),
        )
    }
}

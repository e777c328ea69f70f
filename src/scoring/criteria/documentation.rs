//! Documentation criterion
//!
//! Saturating curve over the comment-to-code ratio: roughly 70 at 10%
//! comments, 95 at 25%.

use crate::model::api::{CriterionDetail, Record};
use crate::scoring::criterion::Criterion;

const SATURATION: f64 = 0.08;

pub struct DocumentationCriterion;

impl DocumentationCriterion {
    pub const NAME: &'static str = "documentation";
}

impl Criterion for DocumentationCriterion {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn evaluate(&self, record: &Record) -> CriterionDetail {
        let Some(stats) = record.code_statistics() else {
            return CriterionDetail::unscored(Self::NAME, "code statistics unavailable");
        };
        if stats.lines_of_code == 0 {
            return CriterionDetail::unscored(Self::NAME, "no code");
        }

        let ratio = stats.comment_lines as f64 / stats.lines_of_code as f64;
        let score = 100.0 * (1.0 - (-ratio / SATURATION).exp());
        CriterionDetail::scored(
            Self::NAME,
            score,
            0.5,
            format!("{:.1}% comment lines", ratio * 100.0),
        )
    }
}

//! Formatting criterion: share of files already in canonical format

use crate::model::api::{CriterionDetail, Record};
use crate::scoring::criterion::Criterion;

pub struct FormattingCriterion;

impl FormattingCriterion {
    pub const NAME: &'static str = "formatting";
}

impl Criterion for FormattingCriterion {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn description(&self) -> &str {
        "Files that need no changes from the formatter"
    }

    fn evaluate(&self, record: &Record) -> CriterionDetail {
        let Some(stats) = record.code_statistics() else {
            return CriterionDetail::unscored(Self::NAME, "code statistics unavailable");
        };
        if stats.files == 0 {
            return CriterionDetail::unscored(Self::NAME, "no source files");
        }

        let unformatted = (stats.unformatted_files.len() as u64).min(stats.files);
        let score = 100.0 * (1.0 - unformatted as f64 / stats.files as f64);

        let mut files = stats.unformatted_files.clone();
        files.sort();
        CriterionDetail::scored(
            Self::NAME,
            score,
            1.0,
            format!("{} of {} files need formatting", unformatted, stats.files),
        )
        .with_details(files)
    }
}

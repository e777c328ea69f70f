//! Built-in criteria
//!
//! Each criterion maps one raw signal of a Record to a 0–100 score and
//! picks its own weight, dropping to zero when its inputs are missing.

mod coverage;
mod dependencies;
mod documentation;
mod formatting;
mod lint;
mod test_outcome;

pub use coverage::CoverageCriterion;
pub use dependencies::DependencyCriterion;
pub use documentation::DocumentationCriterion;
pub use formatting::FormattingCriterion;
pub use lint::LintCriterion;
pub use test_outcome::TestOutcomeCriterion;

use crate::scoring::error::ScoringResult;
use crate::scoring::registry::CriteriaSet;
use std::sync::Arc;

/// Criteria set with every built-in criterion registered
pub fn default_criteria() -> ScoringResult<CriteriaSet> {
    builtin_criteria(&[])
}

/// Built-in criteria, with the lint criterion reporting on `lint_checks`
/// even when they have no findings
pub fn builtin_criteria(lint_checks: &[String]) -> ScoringResult<CriteriaSet> {
    CriteriaSet::new()
        .with(Arc::new(CoverageCriterion))?
        .with(Arc::new(TestOutcomeCriterion))?
        .with(Arc::new(LintCriterion::with_checks(lint_checks.to_vec())))?
        .with(Arc::new(FormattingCriterion))?
        .with(Arc::new(DocumentationCriterion))?
        .with(Arc::new(DependencyCriterion))
}

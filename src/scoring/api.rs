//! Public API for the scoring engine

pub use crate::scoring::criteria::{
    builtin_criteria, default_criteria, CoverageCriterion, DependencyCriterion, DocumentationCriterion,
    FormattingCriterion, LintCriterion, TestOutcomeCriterion,
};
pub use crate::scoring::criterion::{exponential_decay, logistic, Criterion};
pub use crate::scoring::engine::{combine, ScoringEngine};
pub use crate::scoring::error::{ScoringError, ScoringResult};
pub use crate::scoring::rank::{Rank, BANDS};
pub use crate::scoring::registry::CriteriaSet;

//! Criterion trait
//!
//! A criterion is a pure evaluator over a finished Record. It reports its
//! own score and its own weight; when the data it needs is missing it
//! lowers its weight (usually to zero) instead of failing.

use crate::model::api::{CriterionDetail, Record};

pub trait Criterion: Send + Sync {
    /// Unique, non-empty name within a criteria set
    fn name(&self) -> &str;

    /// Short description shown in listings
    fn description(&self) -> &str {
        ""
    }

    /// Evaluate the Record. Must not panic on missing data.
    fn evaluate(&self, record: &Record) -> CriterionDetail;
}

impl std::fmt::Debug for dyn Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Criterion").field("name", &self.name()).finish()
    }
}

/// Map a non-negative raw metric to 0–100 with exponential decay
///
/// `scale` is the metric value at which the score drops to ~37.
pub fn exponential_decay(value: f64, scale: f64) -> f64 {
    if scale <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    100.0 * (-value.max(0.0) / scale).exp()
}

/// Logistic curve over a ratio in [0, 1] centred at `midpoint`
pub fn logistic(ratio: f64, midpoint: f64, steepness: f64) -> f64 {
    if !ratio.is_finite() {
        return 0.0;
    }
    100.0 / (1.0 + (-steepness * (ratio - midpoint)).exp())
}

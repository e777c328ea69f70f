//! Scoring Engine
//!
//! Runs every registered criterion over the same read-only Record in
//! parallel (rayon), then combines the results:
//!
//! ```text
//! value = Σ(score_i · weight_i) / Σ(weight_i)   over criteria with weight_i > 0
//! value = 0                                       when no criterion has positive weight
//! ```
//!
//! Results are collected in registration order and summed in that order,
//! so the same Record always produces the same value.

use crate::model::api::{CriterionDetail, Record, Score};
use crate::scoring::criterion::Criterion;
use crate::scoring::rank::Rank;
use crate::scoring::registry::CriteriaSet;
use rayon::prelude::*;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ScoringEngine {
    criteria: Arc<CriteriaSet>,
}

impl ScoringEngine {
    pub fn new(criteria: CriteriaSet) -> Self {
        Self {
            criteria: Arc::new(criteria),
        }
    }

    pub fn criteria(&self) -> &CriteriaSet {
        &self.criteria
    }

    /// Evaluate all criteria and return the combined value with per-criterion details
    pub fn process(&self, record: &Record) -> (f64, Vec<CriterionDetail>) {
        let details: Vec<CriterionDetail> = self
            .criteria
            .as_slice()
            .par_iter()
            .map(|criterion| evaluate_isolated(criterion.as_ref(), record))
            .collect();

        (combine(&details), details)
    }

    /// Full Score (value, rank, details) for a Record
    pub fn score(&self, record: &Record) -> Score {
        let (value, criteria) = self.process(record);
        let score = Score {
            value,
            rank: Rank::from_score(value),
            criteria,
        };
        log::debug!(
            "Scored {}: {:.2} ({}) from {} criteria",
            record.repo(),
            score.value,
            score.rank,
            score.criteria.len()
        );
        score
    }
}

/// Weighted average over contributing details; 0 when total weight is 0
pub fn combine(details: &[CriterionDetail]) -> f64 {
    let (weighted, total) = details
        .iter()
        .filter_map(|d| d.score.filter(|_| d.weight > 0.0).map(|s| (s, d.weight)))
        .fold((0.0, 0.0), |(weighted, total), (score, weight)| {
            (weighted + score * weight, total + weight)
        });

    if total > 0.0 {
        weighted / total
    } else {
        0.0
    }
}

fn evaluate_isolated(criterion: &dyn Criterion, record: &Record) -> CriterionDetail {
    match catch_unwind(AssertUnwindSafe(|| criterion.evaluate(record))) {
        Ok(detail) => sanitise(criterion.name(), detail),
        Err(_) => {
            log::error!(
                "Criterion '{}' panicked while scoring {}",
                criterion.name(),
                record.repo()
            );
            CriterionDetail::unscored(criterion.name(), "criterion failed to evaluate")
        }
    }
}

// Clamp scores into [0, 100], zero out unusable weights and pin the name
fn sanitise(name: &str, mut detail: CriterionDetail) -> CriterionDetail {
    if detail.name != name {
        detail.name = name.to_string();
    }
    if !detail.weight.is_finite() || detail.weight < 0.0 {
        log::warn!("Criterion '{}' reported invalid weight {}", name, detail.weight);
        detail.weight = 0.0;
    }
    detail.score = match detail.score {
        Some(score) if score.is_finite() => Some(score.clamp(0.0, 100.0)),
        Some(_) => {
            log::warn!("Criterion '{}' reported a non-finite score", name);
            None
        }
        None => None,
    };
    if detail.score.is_none() {
        detail.weight = 0.0;
    }
    detail
}

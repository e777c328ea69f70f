//! Score and per-criterion details attached to a Record

use crate::scoring::rank::Rank;
use serde::{Deserialize, Serialize};

/// Outcome of one criterion for one Record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CriterionDetail {
    pub name: String,
    /// 0–100, or `None` when the criterion had nothing to score
    pub score: Option<f64>,
    pub weight: f64,
    pub message: String,
    /// One line per underlying check for composite criteria
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl CriterionDetail {
    pub fn scored(name: &str, score: f64, weight: f64, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            score: Some(score),
            weight,
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// A criterion without usable data; its weight is forced to zero
    pub fn unscored(name: &str, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            score: None,
            weight: 0.0,
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    /// Whether this detail takes part in the weighted average
    pub fn contributes(&self) -> bool {
        self.score.is_some() && self.weight > 0.0
    }
}

/// Combined score of a Record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Score {
    /// Weighted average over contributing criteria, 0 when none contribute
    pub value: f64,
    pub rank: Rank,
    /// In registration order
    pub criteria: Vec<CriterionDetail>,
}

impl Score {
    pub fn criterion(&self, name: &str) -> Option<&CriterionDetail> {
        self.criteria.iter().find(|c| c.name == name)
    }
}

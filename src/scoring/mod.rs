//! Scoring Engine
//!
//! Converts a finished Record into a Score through an explicit set of
//! independent criteria.
//!
//! - **Criterion**: pure evaluator producing (score, weight, message, details)
//! - **CriteriaSet**: registry built at startup; duplicate names are rejected
//! - **ScoringEngine**: parallel evaluation and weighted-average combination
//! - **Rank**: total, monotonic mapping of the combined value to a band label

pub(crate) mod criteria;
pub(crate) mod criterion;
pub(crate) mod engine;
pub(crate) mod error;
pub mod rank;
pub(crate) mod registry;

pub mod api;

#[cfg(test)]
mod tests;

//! Repository Analysis
//!
//! Everything that happens to one repository identifier:
//!
//! - **Validation**: pre-flight checks that short-circuit before any work is scheduled
//! - **Analyzer**: fan-out of the configured subtasks with per-subtask timeouts,
//!   fan-in into a Record, metadata fetch, scoring, persistence and promotion

pub(crate) mod error;
pub(crate) mod orchestrator;
pub(crate) mod validation;

pub mod api;

#[cfg(test)]
mod tests;

//! Public API for repository analysis

pub use crate::analysis::error::SubtaskError;
pub use crate::analysis::orchestrator::{Analyzer, AnalyzerConfig};
pub use crate::analysis::validation::{validate, ValidationPolicy};

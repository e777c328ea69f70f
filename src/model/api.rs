//! Public API for the data model

pub use crate::model::error::{ValidationError, ValidationResult};
pub use crate::model::record::{InfraStage, Record, RecordState, RepoMetadata};
pub use crate::model::repo_id::RepoId;
pub use crate::model::score::{CriterionDetail, Score};
pub use crate::model::subtask::{
    CodeStatistics, Dependency, DependencyList, LintFinding, LintFindings, SubtaskKind,
    SubtaskOutput, TestResults,
};

//! Record: the aggregate result of analyzing one repository identifier
//!
//! A Record is created empty when a job begins and is mutated only by the
//! orchestrator (the mutators are crate-private). Each subtask writes its
//! own slot, and errors live in ordered maps, so merging outcomes in any
//! order produces the same Record.

use crate::model::repo_id::RepoId;
use crate::model::score::Score;
use crate::model::subtask::{
    CodeStatistics, DependencyList, LintFindings, SubtaskKind, SubtaskOutput, TestResults,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use strum_macros::Display;

/// Lifecycle of a Record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RecordState {
    #[default]
    Pending,
    InFlight,
    Aggregating,
    Scored,
    Persisted,
    PersistFailed,
}

/// Infrastructure stages whose failures are attached to a Record
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InfraStage {
    Metadata,
    Persistence,
    /// The unit of work itself panicked
    Fault,
}

/// Hosting-provider metadata, fetched once per Record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoMetadata {
    pub description: Option<String>,
    /// Popularity signal
    pub stars: u64,
    pub pushed_at: Option<DateTime<Utc>>,
    pub language: Option<String>,
    pub size_kb: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    repo: RepoId,
    code_statistics: Option<CodeStatistics>,
    test_results: Option<TestResults>,
    lint_findings: Option<LintFindings>,
    dependencies: Option<DependencyList>,
    errors: BTreeMap<SubtaskKind, String>,
    infrastructure: BTreeMap<InfraStage, String>,
    metadata: Option<RepoMetadata>,
    score: Score,
    state: RecordState,
    started_at: Option<DateTime<Utc>>,
    execution_time: Duration,
    scoring_revision: u32,
}

impl Record {
    pub(crate) fn new(repo: RepoId) -> Self {
        Self {
            repo,
            code_statistics: None,
            test_results: None,
            lint_findings: None,
            dependencies: None,
            errors: BTreeMap::new(),
            infrastructure: BTreeMap::new(),
            metadata: None,
            score: Score::default(),
            state: RecordState::Pending,
            started_at: None,
            execution_time: Duration::ZERO,
            scoring_revision: crate::core::version::scoring_revision(),
        }
    }

    /// Terminal Record for a unit of work that faulted before finishing
    pub(crate) fn faulted(repo: RepoId, message: impl Into<String>) -> Self {
        let mut record = Self::new(repo);
        record.started_at = Some(Utc::now());
        record.record_infrastructure_error(InfraStage::Fault, message);
        record.state = RecordState::PersistFailed;
        record
    }

    pub fn repo(&self) -> &RepoId {
        &self.repo
    }

    pub fn code_statistics(&self) -> Option<&CodeStatistics> {
        self.code_statistics.as_ref()
    }

    pub fn test_results(&self) -> Option<&TestResults> {
        self.test_results.as_ref()
    }

    pub fn lint_findings(&self) -> Option<&LintFindings> {
        self.lint_findings.as_ref()
    }

    pub fn dependencies(&self) -> Option<&DependencyList> {
        self.dependencies.as_ref()
    }

    /// Whether the slot for `kind` holds data
    pub fn has_output(&self, kind: SubtaskKind) -> bool {
        match kind {
            SubtaskKind::CodeStatistics => self.code_statistics.is_some(),
            SubtaskKind::TestResults => self.test_results.is_some(),
            SubtaskKind::LintFindings => self.lint_findings.is_some(),
            SubtaskKind::Dependencies => self.dependencies.is_some(),
        }
    }

    /// Subtask kind → error message for every failed or timed-out subtask
    pub fn errors(&self) -> &BTreeMap<SubtaskKind, String> {
        &self.errors
    }

    pub fn error(&self, kind: SubtaskKind) -> Option<&str> {
        self.errors.get(&kind).map(String::as_str)
    }

    pub fn infrastructure_errors(&self) -> &BTreeMap<InfraStage, String> {
        &self.infrastructure
    }

    pub fn metadata(&self) -> Option<&RepoMetadata> {
        self.metadata.as_ref()
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn state(&self) -> RecordState {
        self.state
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn execution_time(&self) -> Duration {
        self.execution_time
    }

    pub fn scoring_revision(&self) -> u32 {
        self.scoring_revision
    }

    /// One-line human summary
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{} scored {:.1} ({}) in {:.1}s",
            self.repo,
            self.score.value,
            self.score.rank,
            self.execution_time.as_secs_f64()
        );
        let failures = self.errors.len() + self.infrastructure.len();
        if failures > 0 {
            line.push_str(&format!(", {} failed step(s)", failures));
        }
        line
    }

    pub(crate) fn mark_started(&mut self, at: DateTime<Utc>) {
        self.started_at = Some(at);
        self.state = RecordState::InFlight;
    }

    /// Store a successful subtask payload in its slot
    pub(crate) fn store(&mut self, output: SubtaskOutput) {
        self.errors.remove(&output.kind());
        match output {
            SubtaskOutput::CodeStatistics(stats) => self.code_statistics = Some(stats),
            SubtaskOutput::TestResults(results) => self.test_results = Some(results),
            SubtaskOutput::LintFindings(findings) => self.lint_findings = Some(findings),
            SubtaskOutput::Dependencies(deps) => self.dependencies = Some(deps),
        }
    }

    pub(crate) fn record_error(&mut self, kind: SubtaskKind, message: impl Into<String>) {
        self.errors.insert(kind, message.into());
    }

    pub(crate) fn record_infrastructure_error(&mut self, stage: InfraStage, message: impl Into<String>) {
        self.infrastructure.insert(stage, message.into());
    }

    pub(crate) fn set_metadata(&mut self, metadata: RepoMetadata) {
        self.metadata = Some(metadata);
    }

    pub(crate) fn set_state(&mut self, state: RecordState) {
        self.state = state;
    }

    pub(crate) fn set_score(&mut self, score: Score) {
        self.score = score;
    }

    pub(crate) fn set_execution_time(&mut self, elapsed: Duration) {
        self.execution_time = elapsed;
    }
}

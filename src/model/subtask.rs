//! Subtask kinds and their typed payloads
//!
//! Each independent check contributes one payload to a Record. The payloads
//! form a closed sum type so the orchestrator and the criteria read them
//! through typed accessors rather than by name.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Independent checks the orchestrator can fan out to
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SubtaskKind {
    /// File and line counts plus formatting state
    CodeStatistics,
    /// Test execution outcome and coverage
    TestResults,
    /// Findings of every configured linter
    LintFindings,
    /// Declared dependencies (optional check)
    Dependencies,
}

impl SubtaskKind {
    /// Kinds enabled when configuration does not say otherwise
    pub fn default_set() -> Vec<SubtaskKind> {
        vec![
            SubtaskKind::CodeStatistics,
            SubtaskKind::TestResults,
            SubtaskKind::LintFindings,
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeStatistics {
    pub files: u64,
    pub lines_of_code: u64,
    pub comment_lines: u64,
    /// Files the formatter would rewrite
    #[serde(default)]
    pub unformatted_files: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestResults {
    pub passed: u64,
    pub failed: u64,
    #[serde(default)]
    pub skipped: u64,
    /// `None` when coverage could not be computed; distinct from 0%
    #[serde(default)]
    pub coverage_percent: Option<f64>,
}

impl TestResults {
    pub fn executed(&self) -> u64 {
        self.passed.saturating_add(self.failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintFinding {
    /// Name of the check that raised it (`vet`, `ineffassign`, ...)
    pub check: String,
    pub file: String,
    #[serde(default)]
    pub line: u32,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintFindings {
    pub findings: Vec<LintFinding>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyList {
    pub direct: Vec<Dependency>,
    #[serde(default)]
    pub indirect: u64,
}

/// Typed result of one subtask
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum SubtaskOutput {
    CodeStatistics(CodeStatistics),
    TestResults(TestResults),
    LintFindings(LintFindings),
    Dependencies(DependencyList),
}

impl SubtaskOutput {
    pub fn kind(&self) -> SubtaskKind {
        match self {
            SubtaskOutput::CodeStatistics(_) => SubtaskKind::CodeStatistics,
            SubtaskOutput::TestResults(_) => SubtaskKind::TestResults,
            SubtaskOutput::LintFindings(_) => SubtaskKind::LintFindings,
            SubtaskOutput::Dependencies(_) => SubtaskKind::Dependencies,
        }
    }

    /// Parse a bare JSON payload as the variant for `kind`
    pub fn from_json(kind: SubtaskKind, bytes: &[u8]) -> serde_json::Result<Self> {
        Ok(match kind {
            SubtaskKind::CodeStatistics => SubtaskOutput::CodeStatistics(serde_json::from_slice(bytes)?),
            SubtaskKind::TestResults => SubtaskOutput::TestResults(serde_json::from_slice(bytes)?),
            SubtaskKind::LintFindings => SubtaskOutput::LintFindings(serde_json::from_slice(bytes)?),
            SubtaskKind::Dependencies => SubtaskOutput::Dependencies(serde_json::from_slice(bytes)?),
        })
    }
}

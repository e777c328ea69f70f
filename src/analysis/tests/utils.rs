//! Analysis Test Utilities
//!
//! Scripted collaborators for driving the orchestrator through success,
//! failure, timeout and panic paths.

use crate::analysis::api::{Analyzer, AnalyzerConfig};
use crate::backend::api::*;
use crate::model::api::*;
use crate::scoring::api::{default_criteria, ScoringEngine};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Behavior {
    Return(SubtaskOutput),
    Delayed(Duration, SubtaskOutput),
    Fail(&'static str),
    Hang,
    Panic,
}

/// Task runner answering each kind from a script
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    script: BTreeMap<SubtaskKind, Behavior>,
    pub calls: AtomicUsize,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: SubtaskKind, behavior: Behavior) -> Self {
        self.script.insert(kind, behavior);
        self
    }

    /// Runner that answers every default kind successfully
    pub fn healthy() -> Self {
        Self::new()
            .with(SubtaskKind::CodeStatistics, Behavior::Return(code_statistics()))
            .with(SubtaskKind::TestResults, Behavior::Return(test_results()))
            .with(SubtaskKind::LintFindings, Behavior::Return(lint_findings()))
    }
}

#[async_trait::async_trait]
impl TaskRunner for ScriptedRunner {
    async fn fetch_code_statistics(&self, _repo: &RepoId) -> BackendResult<CodeStatistics> {
        Err(BackendError::Unsupported {
            operation: "typed fetch".to_string(),
        })
    }

    async fn fetch_test_results(&self, _repo: &RepoId) -> BackendResult<TestResults> {
        Err(BackendError::Unsupported {
            operation: "typed fetch".to_string(),
        })
    }

    async fn fetch_lint_findings(&self, _repo: &RepoId) -> BackendResult<LintFindings> {
        Err(BackendError::Unsupported {
            operation: "typed fetch".to_string(),
        })
    }

    async fn fetch(&self, kind: SubtaskKind, _repo: &RepoId) -> BackendResult<SubtaskOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script.get(&kind).cloned() {
            Some(Behavior::Return(output)) => Ok(output),
            Some(Behavior::Delayed(delay, output)) => {
                tokio::time::sleep(delay).await;
                Ok(output)
            }
            Some(Behavior::Fail(message)) => Err(BackendError::Command {
                command: kind.to_string(),
                message: message.to_string(),
            }),
            Some(Behavior::Hang) => std::future::pending().await,
            Some(Behavior::Panic) => panic!("scripted panic in {}", kind),
            None => Err(BackendError::Unsupported {
                operation: kind.to_string(),
            }),
        }
    }
}

/// Host serving fixed metadata and files
#[derive(Debug, Default)]
pub struct StaticHost {
    pub metadata: Option<RepoMetadata>,
    pub files: BTreeMap<String, Vec<u8>>,
    pub hang: bool,
    pub lookups: AtomicUsize,
}

impl StaticHost {
    pub fn with_metadata(metadata: RepoMetadata) -> Self {
        Self {
            metadata: Some(metadata),
            ..Self::default()
        }
    }

    pub fn with_file(mut self, path: &str, content: &[u8]) -> Self {
        self.files.insert(path.to_string(), content.to_vec());
        self
    }
}

#[async_trait::async_trait]
impl RepositoryHost for StaticHost {
    async fn get(&self, owner: &str, name: &str) -> BackendResult<RepoMetadata> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.hang {
            std::future::pending::<()>().await;
        }
        self.metadata.clone().ok_or_else(|| BackendError::NotFound {
            what: format!("{}/{}", owner, name),
        })
    }

    async fn get_file_content(&self, _owner: &str, _name: &str, path: &str) -> BackendResult<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| BackendError::NotFound {
            what: path.to_string(),
        })
    }
}

/// Database whose writes always fail
#[derive(Debug, Default)]
pub struct FailingDatabase;

#[async_trait::async_trait]
impl Database for FailingDatabase {
    async fn get(&self, _key: &str) -> BackendResult<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn put(&self, _key: &str, _value: Vec<u8>) -> BackendResult<()> {
        Err(BackendError::Io {
            operation: "write entry".to_string(),
            message: "disk full".to_string(),
        })
    }

    async fn delete(&self, _key: &str) -> BackendResult<()> {
        Ok(())
    }

    async fn delete_all_matching_prefix(&self, _prefix: &str) -> BackendResult<usize> {
        Ok(0)
    }
}

pub fn metadata() -> RepoMetadata {
    RepoMetadata {
        description: Some("Widgets".to_string()),
        stars: 420,
        pushed_at: None,
        language: Some("Go".to_string()),
        size_kb: Some(1500),
    }
}

pub fn code_statistics() -> SubtaskOutput {
    SubtaskOutput::CodeStatistics(CodeStatistics {
        files: 12,
        lines_of_code: 3400,
        comment_lines: 420,
        unformatted_files: vec!["internal/util.go".to_string()],
    })
}

pub fn test_results() -> SubtaskOutput {
    SubtaskOutput::TestResults(TestResults {
        passed: 57,
        failed: 1,
        skipped: 2,
        coverage_percent: Some(68.0),
    })
}

pub fn lint_findings() -> SubtaskOutput {
    SubtaskOutput::LintFindings(LintFindings {
        findings: vec![LintFinding {
            check: "vet".to_string(),
            file: "main.go".to_string(),
            line: 14,
            message: "unreachable code".to_string(),
        }],
    })
}

pub fn repo() -> RepoId {
    RepoId::parse("github.com/acme/widgets", "1.22").unwrap()
}

pub fn quick_config() -> AnalyzerConfig {
    AnalyzerConfig {
        subtask_timeout: Duration::from_secs(5),
        metadata_timeout: Duration::from_secs(2),
        ..AnalyzerConfig::default()
    }
}

pub fn analyzer(
    runner: Arc<dyn TaskRunner>,
    host: Arc<dyn RepositoryHost>,
    database: Arc<dyn Database>,
) -> Analyzer {
    let (promoter, _rx) = ChannelPromoter::new(8);
    Analyzer::new(
        runner,
        host,
        database,
        Arc::new(promoter),
        ScoringEngine::new(default_criteria().unwrap()),
        quick_config(),
    )
}

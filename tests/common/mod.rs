//! Common test utilities and helpers
//!
//! Test doubles for the backend capabilities plus builders for an
//! Analyzer and DispatchPool wired to them.

#![allow(dead_code)]

use reporank::analysis::api::{Analyzer, AnalyzerConfig};
use reporank::backend::api::*;
use reporank::model::api::*;
use reporank::pool::api::{DispatchPool, PoolConfig};
use reporank::scoring::api::{default_criteria, ScoringEngine};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Task runner with canned payloads, an optional delay and injectable faults
///
/// `analyses` counts code statistics calls, which happen once per analysis,
/// and `started` keeps the cache keys in the order those calls began.
#[derive(Debug, Default)]
pub struct TestRunner {
    pub delay: Option<Duration>,
    pub hang_on: Option<SubtaskKind>,
    pub panic_on: Option<SubtaskKind>,
    pub analyses: AtomicUsize,
    pub active: AtomicUsize,
    pub max_active: AtomicUsize,
    pub started: Mutex<Vec<String>>,
}

impl TestRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delayed(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn analyses(&self) -> usize {
        self.analyses.load(Ordering::SeqCst)
    }

    pub fn started(&self) -> Vec<String> {
        self.started.lock().unwrap().clone()
    }

    async fn step(&self, kind: SubtaskKind) {
        if self.panic_on == Some(kind) {
            panic!("runner crashed during {}", kind);
        }
        if self.hang_on == Some(kind) {
            std::future::pending::<()>().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[async_trait::async_trait]
impl TaskRunner for TestRunner {
    async fn fetch_code_statistics(&self, repo: &RepoId) -> BackendResult<CodeStatistics> {
        self.analyses.fetch_add(1, Ordering::SeqCst);
        self.started.lock().unwrap().push(repo.cache_key());
        let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(active, Ordering::SeqCst);
        self.step(SubtaskKind::CodeStatistics).await;
        self.active.fetch_sub(1, Ordering::SeqCst);

        Ok(CodeStatistics {
            files: 8,
            lines_of_code: 2400,
            comment_lines: 300,
            unformatted_files: vec![],
        })
    }

    async fn fetch_test_results(&self, _repo: &RepoId) -> BackendResult<TestResults> {
        self.step(SubtaskKind::TestResults).await;
        Ok(TestResults {
            passed: 40,
            failed: 2,
            skipped: 1,
            coverage_percent: Some(71.5),
        })
    }

    async fn fetch_lint_findings(&self, _repo: &RepoId) -> BackendResult<LintFindings> {
        self.step(SubtaskKind::LintFindings).await;
        Ok(LintFindings {
            findings: vec![LintFinding {
                check: "vet".to_string(),
                file: "cmd/main.go".to_string(),
                line: 7,
                message: "printf format mismatch".to_string(),
            }],
        })
    }
}

/// Host that knows every repository
#[derive(Debug, Default)]
pub struct TestHost;

#[async_trait::async_trait]
impl RepositoryHost for TestHost {
    async fn get(&self, _owner: &str, _name: &str) -> BackendResult<RepoMetadata> {
        Ok(RepoMetadata {
            description: None,
            stars: 12,
            pushed_at: None,
            language: Some("Go".to_string()),
            size_kb: Some(640),
        })
    }

    async fn get_file_content(&self, _owner: &str, _name: &str, _path: &str) -> BackendResult<Vec<u8>> {
        Ok(b"module example.com/widgets\n".to_vec())
    }
}

/// Host whose metadata lookup panics for one repository name
#[derive(Debug)]
pub struct PanickingHost {
    pub name: &'static str,
}

#[async_trait::async_trait]
impl RepositoryHost for PanickingHost {
    async fn get(&self, owner: &str, name: &str) -> BackendResult<RepoMetadata> {
        if name == self.name {
            panic!("host blew up");
        }
        TestHost.get(owner, name).await
    }

    async fn get_file_content(&self, owner: &str, name: &str, path: &str) -> BackendResult<Vec<u8>> {
        TestHost.get_file_content(owner, name, path).await
    }
}

/// Database rejecting every write
#[derive(Debug, Default)]
pub struct ReadOnlyDatabase;

#[async_trait::async_trait]
impl Database for ReadOnlyDatabase {
    async fn get(&self, _key: &str) -> BackendResult<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn put(&self, key: &str, _value: Vec<u8>) -> BackendResult<()> {
        Err(BackendError::Io {
            operation: format!("write {}", key),
            message: "read-only file system".to_string(),
        })
    }

    async fn delete(&self, _key: &str) -> BackendResult<()> {
        Ok(())
    }

    async fn delete_all_matching_prefix(&self, _prefix: &str) -> BackendResult<usize> {
        Ok(0)
    }
}

pub fn quick_config() -> AnalyzerConfig {
    AnalyzerConfig {
        subtask_timeout: Duration::from_secs(5),
        metadata_timeout: Duration::from_secs(2),
        ..AnalyzerConfig::default()
    }
}

pub fn analyzer_with(
    runner: Arc<TestRunner>,
    database: Arc<dyn Database>,
    promoter: Arc<dyn Promoter>,
) -> Arc<Analyzer> {
    analyzer_with_host(runner, Arc::new(TestHost), database, promoter)
}

pub fn analyzer_with_host(
    runner: Arc<TestRunner>,
    host: Arc<dyn RepositoryHost>,
    database: Arc<dyn Database>,
    promoter: Arc<dyn Promoter>,
) -> Arc<Analyzer> {
    Arc::new(Analyzer::new(
        runner,
        host,
        database,
        promoter,
        ScoringEngine::new(default_criteria().unwrap()),
        quick_config(),
    ))
}

/// Pool over an in-memory database with a logging promoter
pub fn pool(runner: Arc<TestRunner>, capacity: usize) -> DispatchPool {
    let analyzer = analyzer_with(runner, Arc::new(MemoryDatabase::new()), Arc::new(LogPromoter));
    DispatchPool::new(
        analyzer,
        PoolConfig {
            capacity,
            use_cache: true,
        },
    )
}

pub fn repo(path: &str) -> RepoId {
    RepoId::parse(path, "1.22").unwrap()
}

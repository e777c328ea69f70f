//! Analysis Orchestrator
//!
//! Runs the configured subtasks for exactly one repository and finalizes
//! its Record:
//!
//! 1. stamp the start time
//! 2. spawn every subtask through the TaskRunner at once
//! 3. wait for each one up to the per-subtask timeout, storing data or the
//!    error under its kind; nothing here aborts the other subtasks
//! 4. fetch hosting metadata once (failure is attached, not fatal)
//! 5. score the settled Record
//! 6. persist it under the identifier's cache key
//!
//! A subtask that times out keeps running on its own task; its eventual
//! result is discarded. The runner is not told to stop, so the leak is
//! bounded only by the runner's own limits.

use crate::analysis::error::SubtaskError;
use crate::analysis::validation::{self, ValidationPolicy};
use crate::backend::api::{BackendError, BackendResult, Database, Promoter, RepositoryHost, TaskRunner};
use crate::model::api::{
    InfraStage, Record, RecordState, RepoId, SubtaskKind, SubtaskOutput, ValidationError,
    ValidationResult,
};
use crate::scoring::api::ScoringEngine;
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Subtask kinds to fan out to, fixed for the lifetime of the Analyzer
    pub subtasks: Vec<SubtaskKind>,
    pub subtask_timeout: Duration,
    pub metadata_timeout: Duration,
    pub validation: ValidationPolicy,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            subtasks: SubtaskKind::default_set(),
            subtask_timeout: Duration::from_secs(280),
            metadata_timeout: Duration::from_secs(30),
            validation: ValidationPolicy::default(),
        }
    }
}

pub struct Analyzer {
    runner: Arc<dyn TaskRunner>,
    host: Arc<dyn RepositoryHost>,
    database: Arc<dyn Database>,
    promoter: Arc<dyn Promoter>,
    engine: ScoringEngine,
    config: AnalyzerConfig,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("engine", &self.engine)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Analyzer {
    pub fn new(
        runner: Arc<dyn TaskRunner>,
        host: Arc<dyn RepositoryHost>,
        database: Arc<dyn Database>,
        promoter: Arc<dyn Promoter>,
        engine: ScoringEngine,
        mut config: AnalyzerConfig,
    ) -> Self {
        config.subtasks.sort();
        config.subtasks.dedup();
        Self {
            runner,
            host,
            database,
            promoter,
            engine,
            config,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Pre-flight checks; hosting lookups share the metadata timeout
    pub async fn validate(&self, repo: &RepoId) -> ValidationResult<()> {
        let checks = validation::validate(self.host.as_ref(), repo, &self.config.validation);
        match tokio::time::timeout(self.config.metadata_timeout, checks).await {
            Ok(result) => result,
            Err(_) => Err(ValidationError::LookupFailed {
                repo: repo.host_path().to_string(),
                reason: format!(
                    "no response from host after {}s",
                    self.config.metadata_timeout.as_secs_f64()
                ),
            }),
        }
    }

    /// Analyze one repository and return its finalized Record
    ///
    /// Always produces a Record; failures are attached to it.
    pub async fn analyze(&self, repo: RepoId) -> Record {
        let started = Instant::now();
        let mut record = Record::new(repo);
        record.mark_started(chrono::Utc::now());
        log::debug!(
            "Analyzing {} ({} subtasks)",
            record.repo(),
            self.config.subtasks.len()
        );

        self.run_subtasks(&mut record).await;
        record.set_state(RecordState::Aggregating);

        self.fetch_metadata(&mut record).await;

        let score = self.engine.score(&record);
        record.set_score(score);
        record.set_state(RecordState::Scored);
        record.set_execution_time(started.elapsed());

        self.persist(&mut record).await;
        record
    }

    async fn run_subtasks(&self, record: &mut Record) {
        let limit = self.config.subtask_timeout;
        let mut pending: FuturesUnordered<_> = self
            .config
            .subtasks
            .iter()
            .map(|&kind| {
                let runner = Arc::clone(&self.runner);
                let repo = record.repo().clone();
                let handle = tokio::spawn(async move { runner.fetch(kind, &repo).await });
                async move { (kind, settle(kind, limit, handle).await) }
            })
            .collect();

        // Each subtask owns a disjoint slot, so completion order does not matter
        while let Some((kind, outcome)) = pending.next().await {
            match outcome {
                Ok(output) => {
                    log::debug!("{}: {} settled", record.repo(), kind);
                    record.store(output);
                }
                Err(error) => {
                    log::warn!("{}: {} failed: {}", record.repo(), kind, error);
                    record.record_error(kind, error.to_string());
                }
            }
        }
    }

    async fn fetch_metadata(&self, record: &mut Record) {
        let repo = record.repo().clone();
        let limit = self.config.metadata_timeout;
        let outcome = tokio::time::timeout(limit, self.host.get(repo.owner(), repo.name())).await;

        let error = match outcome {
            Ok(Ok(metadata)) => {
                record.set_metadata(metadata);
                return;
            }
            Ok(Err(error)) => error.to_string(),
            Err(_) => format!("no response after {}s", limit.as_secs_f64()),
        };
        log::warn!("{}: metadata unavailable: {}", repo, error);
        record.record_infrastructure_error(InfraStage::Metadata, error);
    }

    async fn persist(&self, record: &mut Record) {
        let key = record.repo().cache_key();
        let result = match serde_json::to_vec(&*record) {
            Ok(bytes) => self.database.put(&key, bytes).await,
            Err(e) => Err(BackendError::Serialization {
                what: format!("record {}", key),
                message: e.to_string(),
            }),
        };

        match result {
            Ok(()) => record.set_state(RecordState::Persisted),
            Err(error) => {
                log::warn!("Failed to persist {}: {}", key, error);
                record.record_infrastructure_error(InfraStage::Persistence, error.to_string());
                record.set_state(RecordState::PersistFailed);
            }
        }
    }

    /// Hand a finalized Record to the promoter without waiting for it
    pub fn promote(&self, record: Record) {
        let promoter = Arc::clone(&self.promoter);
        tokio::spawn(async move {
            promoter.process(record).await;
        });
    }

    /// Stored Record for `repo`, if present and scored by this scoring revision
    pub async fn cached(&self, repo: &RepoId) -> Option<Record> {
        let key = repo.cache_key();
        let bytes = match self.database.get(&key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(error) => {
                log::warn!("Cache lookup for {} failed: {}", key, error);
                return None;
            }
        };

        let mut record: Record = match serde_json::from_slice(&bytes) {
            Ok(record) => record,
            Err(error) => {
                log::warn!("Ignoring unreadable cache entry {}: {}", key, error);
                return None;
            }
        };
        if record.repo() != repo {
            log::warn!("Cache entry {} belongs to {}", key, record.repo());
            return None;
        }
        if record.scoring_revision() != crate::core::version::scoring_revision() {
            log::debug!(
                "Cache entry {} is from scoring revision {}",
                key,
                record.scoring_revision()
            );
            return None;
        }

        record.set_state(RecordState::Persisted);
        Some(record)
    }

    /// Drop the stored Record for one identifier
    pub async fn invalidate(&self, repo: &RepoId) -> BackendResult<()> {
        log::debug!("Invalidating {}", repo.cache_key());
        self.database.delete(&repo.cache_key()).await
    }

    /// Drop stored Records for every branch and toolchain of a repository
    pub async fn invalidate_repository(&self, host_path: &str) -> BackendResult<usize> {
        let removed = self
            .database
            .delete_all_matching_prefix(&RepoId::cache_prefix(host_path))
            .await?;
        log::debug!("Invalidated {} cached record(s) for {}", removed, host_path);
        Ok(removed)
    }
}

/// Wait for one subtask, bounded by `limit`
///
/// On timeout the JoinHandle is dropped, which detaches the task rather
/// than cancelling it.
async fn settle(
    kind: SubtaskKind,
    limit: Duration,
    handle: JoinHandle<BackendResult<SubtaskOutput>>,
) -> Result<SubtaskOutput, SubtaskError> {
    let output = match tokio::time::timeout(limit, handle).await {
        Err(_) => return Err(SubtaskError::Timeout { after: limit }),
        Ok(joined) => joined??,
    };
    if output.kind() != kind {
        return Err(SubtaskError::KindMismatch {
            expected: kind,
            found: output.kind(),
        });
    }
    Ok(output)
}

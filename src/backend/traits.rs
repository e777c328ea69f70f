//! Capability traits consumed by the analysis core
//!
//! All capabilities are shared across concurrently running analyses and
//! must be safe for concurrent use; the core performs no client-side
//! locking around them.

use crate::backend::error::{BackendError, BackendResult};
use crate::model::api::{
    CodeStatistics, DependencyList, LintFindings, Record, RepoId, RepoMetadata, SubtaskKind,
    SubtaskOutput, TestResults,
};

/// Executes the independent per-repository checks
///
/// Each method may be backed by a different execution strategy. A call
/// either returns data or an error; partial results are not a thing.
#[async_trait::async_trait]
pub trait TaskRunner: Send + Sync {
    async fn fetch_code_statistics(&self, repo: &RepoId) -> BackendResult<CodeStatistics>;

    async fn fetch_test_results(&self, repo: &RepoId) -> BackendResult<TestResults>;

    async fn fetch_lint_findings(&self, repo: &RepoId) -> BackendResult<LintFindings>;

    /// Optional check; runners that cannot list dependencies keep the default
    async fn fetch_dependencies(&self, _repo: &RepoId) -> BackendResult<DependencyList> {
        Err(BackendError::Unsupported {
            operation: "dependency listing".to_string(),
        })
    }

    /// Dispatch by kind, wrapping the payload in its variant
    async fn fetch(&self, kind: SubtaskKind, repo: &RepoId) -> BackendResult<SubtaskOutput> {
        Ok(match kind {
            SubtaskKind::CodeStatistics => {
                SubtaskOutput::CodeStatistics(self.fetch_code_statistics(repo).await?)
            }
            SubtaskKind::TestResults => {
                SubtaskOutput::TestResults(self.fetch_test_results(repo).await?)
            }
            SubtaskKind::LintFindings => {
                SubtaskOutput::LintFindings(self.fetch_lint_findings(repo).await?)
            }
            SubtaskKind::Dependencies => {
                SubtaskOutput::Dependencies(self.fetch_dependencies(repo).await?)
            }
        })
    }
}

/// Hosting-provider access
#[async_trait::async_trait]
pub trait RepositoryHost: Send + Sync {
    /// Repository metadata
    async fn get(&self, owner: &str, name: &str) -> BackendResult<RepoMetadata>;

    /// Raw content of one file on the default branch
    async fn get_file_content(&self, owner: &str, name: &str, path: &str)
        -> BackendResult<Vec<u8>>;
}

/// Key/value storage for finished Records
#[async_trait::async_trait]
pub trait Database: Send + Sync {
    /// `Ok(None)` on a miss
    async fn get(&self, key: &str) -> BackendResult<Option<Vec<u8>>>;

    async fn put(&self, key: &str, value: Vec<u8>) -> BackendResult<()>;

    /// Deleting a missing key is not an error
    async fn delete(&self, key: &str) -> BackendResult<()>;

    /// Returns the number of entries removed
    async fn delete_all_matching_prefix(&self, prefix: &str) -> BackendResult<usize>;
}

/// Receives every finalized Record; the core never waits on it
#[async_trait::async_trait]
pub trait Promoter: Send + Sync {
    async fn process(&self, record: Record);
}

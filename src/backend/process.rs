//! Process-backed task runner
//!
//! Each subtask kind maps to a configured command line. The command runs
//! with the repository identifier in its environment and must print the
//! JSON payload for its kind on stdout:
//!
//! | Variable             | Value                      |
//! |----------------------|----------------------------|
//! | `REPORANK_REPO`      | host path (`host/owner/name`) |
//! | `REPORANK_BRANCH`    | branch                     |
//! | `REPORANK_TOOLCHAIN` | toolchain version          |
//!
//! Kinds without a configured command report `Unsupported`.

use crate::backend::error::{BackendError, BackendResult};
use crate::backend::traits::TaskRunner;
use crate::model::api::{
    CodeStatistics, DependencyList, LintFindings, RepoId, SubtaskKind, SubtaskOutput, TestResults,
};
use std::collections::BTreeMap;
use std::process::Stdio;
use tokio::process::Command;

#[derive(Debug, Clone, Default)]
pub struct ProcessTaskRunner {
    commands: BTreeMap<SubtaskKind, Vec<String>>,
}

impl ProcessTaskRunner {
    pub fn new(commands: BTreeMap<SubtaskKind, Vec<String>>) -> Self {
        let commands = commands
            .into_iter()
            .filter(|(kind, argv)| {
                if argv.is_empty() {
                    log::warn!("Ignoring empty command for {}", kind);
                }
                !argv.is_empty()
            })
            .collect();
        Self { commands }
    }

    pub fn supports(&self, kind: SubtaskKind) -> bool {
        self.commands.contains_key(&kind)
    }

    async fn run(&self, kind: SubtaskKind, repo: &RepoId) -> BackendResult<SubtaskOutput> {
        let Some((program, args)) = self.commands.get(&kind).and_then(|argv| argv.split_first())
        else {
            return Err(BackendError::Unsupported {
                operation: kind.to_string(),
            });
        };

        log::trace!("Running {} for {}: {} {:?}", kind, repo, program, args);
        let output = Command::new(program)
            .args(args)
            .env("REPORANK_REPO", repo.host_path())
            .env("REPORANK_BRANCH", repo.branch())
            .env("REPORANK_TOOLCHAIN", repo.toolchain())
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| BackendError::Command {
                command: program.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BackendError::Command {
                command: program.clone(),
                message: format!("{}: {}", output.status, stderr.trim()),
            });
        }

        SubtaskOutput::from_json(kind, &output.stdout).map_err(|e| BackendError::Serialization {
            what: format!("{} output", kind),
            message: e.to_string(),
        })
    }
}

fn wrong_payload(expected: SubtaskKind, output: &SubtaskOutput) -> BackendError {
    BackendError::Serialization {
        what: format!("{} output", expected),
        message: format!("parsed as {}", output.kind()),
    }
}

#[async_trait::async_trait]
impl TaskRunner for ProcessTaskRunner {
    async fn fetch_code_statistics(&self, repo: &RepoId) -> BackendResult<CodeStatistics> {
        match self.run(SubtaskKind::CodeStatistics, repo).await? {
            SubtaskOutput::CodeStatistics(stats) => Ok(stats),
            other => Err(wrong_payload(SubtaskKind::CodeStatistics, &other)),
        }
    }

    async fn fetch_test_results(&self, repo: &RepoId) -> BackendResult<TestResults> {
        match self.run(SubtaskKind::TestResults, repo).await? {
            SubtaskOutput::TestResults(results) => Ok(results),
            other => Err(wrong_payload(SubtaskKind::TestResults, &other)),
        }
    }

    async fn fetch_lint_findings(&self, repo: &RepoId) -> BackendResult<LintFindings> {
        match self.run(SubtaskKind::LintFindings, repo).await? {
            SubtaskOutput::LintFindings(findings) => Ok(findings),
            other => Err(wrong_payload(SubtaskKind::LintFindings, &other)),
        }
    }

    async fn fetch_dependencies(&self, repo: &RepoId) -> BackendResult<DependencyList> {
        match self.run(SubtaskKind::Dependencies, repo).await? {
            SubtaskOutput::Dependencies(dependencies) => Ok(dependencies),
            other => Err(wrong_payload(SubtaskKind::Dependencies, &other)),
        }
    }
}

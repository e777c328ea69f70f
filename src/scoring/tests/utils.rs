//! Scoring Test Utilities
//!
//! Fixed-output criteria and Record builders shared by the scoring tests.

use crate::model::api::{
    CodeStatistics, CriterionDetail, LintFinding, LintFindings, Record, RepoId, SubtaskKind,
    SubtaskOutput, TestResults,
};
use crate::scoring::criterion::Criterion;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Criterion that always reports the same score and weight
pub struct FixedCriterion {
    pub name: String,
    pub score: Option<f64>,
    pub weight: f64,
    pub calls: AtomicUsize,
}

impl FixedCriterion {
    pub fn new(name: &str, score: f64, weight: f64) -> Self {
        Self {
            name: name.to_string(),
            score: Some(score),
            weight,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unscored(name: &str) -> Self {
        Self {
            name: name.to_string(),
            score: None,
            weight: 1.0,
            calls: AtomicUsize::new(0),
        }
    }
}

impl Criterion for FixedCriterion {
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&self, _record: &Record) -> CriterionDetail {
        self.calls.fetch_add(1, Ordering::SeqCst);
        CriterionDetail {
            name: self.name.clone(),
            score: self.score,
            weight: self.weight,
            message: "fixed".to_string(),
            details: Vec::new(),
        }
    }
}

/// Criterion that panics on evaluation
pub struct PanickingCriterion;

impl Criterion for PanickingCriterion {
    fn name(&self) -> &str {
        "panicking"
    }

    fn evaluate(&self, _record: &Record) -> CriterionDetail {
        panic!("criterion bug");
    }
}

pub fn empty_record() -> Record {
    Record::new(RepoId::parse("github.com/acme/widgets", "1.22").unwrap())
}

pub fn stats(files: u64, loc: u64, comments: u64, unformatted: &[&str]) -> SubtaskOutput {
    SubtaskOutput::CodeStatistics(CodeStatistics {
        files,
        lines_of_code: loc,
        comment_lines: comments,
        unformatted_files: unformatted.iter().map(|f| f.to_string()).collect(),
    })
}

pub fn tests(passed: u64, failed: u64, coverage: Option<f64>) -> SubtaskOutput {
    SubtaskOutput::TestResults(TestResults {
        passed,
        failed,
        skipped: 0,
        coverage_percent: coverage,
    })
}

pub fn lint(findings: &[(&str, &str)]) -> SubtaskOutput {
    SubtaskOutput::LintFindings(LintFindings {
        findings: findings
            .iter()
            .enumerate()
            .map(|(i, (check, file))| LintFinding {
                check: check.to_string(),
                file: file.to_string(),
                line: i as u32 + 1,
                message: format!("{} issue", check),
            })
            .collect(),
    })
}

/// Record with every default subtask filled
pub fn full_record() -> Record {
    let mut record = empty_record();
    record.store(stats(10, 2000, 300, &["b.go"]));
    record.store(tests(48, 2, Some(72.5)));
    record.store(lint(&[("vet", "a.go"), ("vet", "b.go"), ("ineffassign", "c.go")]));
    record
}

pub fn record_with_error(kind: SubtaskKind, message: &str) -> Record {
    let mut record = empty_record();
    record.record_error(kind, message);
    record
}

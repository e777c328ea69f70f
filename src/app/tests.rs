//! Rendering tests
//!
//! Output is checked with colour disabled so assertions see plain text.

use crate::app::render::{criteria_table, failure_lines, header_line, rank_role};
use crate::core::styles::StyleRole;
use crate::model::api::{
    CodeStatistics, InfraStage, LintFinding, LintFindings, Record, RepoId, SubtaskKind,
    SubtaskOutput, TestResults,
};
use crate::scoring::api::{default_criteria, Rank, ScoringEngine};

fn repo() -> RepoId {
    RepoId::parse("github.com/acme/widgets@main", "1.22").unwrap()
}

fn scored_record() -> Record {
    let mut record = Record::new(repo());
    record.store(SubtaskOutput::CodeStatistics(CodeStatistics {
        files: 4,
        lines_of_code: 1000,
        comment_lines: 150,
        unformatted_files: vec![],
    }));
    record.store(SubtaskOutput::TestResults(TestResults {
        passed: 9,
        failed: 1,
        skipped: 0,
        coverage_percent: Some(80.0),
    }));
    record.store(SubtaskOutput::LintFindings(LintFindings {
        findings: vec![LintFinding {
            check: "vet".to_string(),
            file: "main.go".to_string(),
            line: 12,
            message: "unreachable code".to_string(),
        }],
    }));
    let engine = ScoringEngine::new(default_criteria().unwrap());
    let score = engine.score(&record);
    record.set_score(score);
    record
}

#[test]
fn test_rank_roles_follow_bands() {
    assert!(matches!(rank_role(Rank::APlus), StyleRole::GradeTop));
    assert!(matches!(rank_role(Rank::A), StyleRole::GradeGood));
    assert!(matches!(rank_role(Rank::C), StyleRole::GradeFair));
    assert!(matches!(rank_role(Rank::F), StyleRole::GradePoor));
}

#[test]
fn test_header_line_shows_identifier_and_rank() {
    let record = scored_record();
    let line = header_line(&record, false);

    assert!(line.starts_with("github.com/acme/widgets@main (1.22)"));
    assert!(line.contains(&record.score().rank.to_string()));
    assert!(line.ends_with(&format!("{:.1}", record.score().value)));
}

#[test]
fn test_criteria_table_has_row_per_criterion_and_detail() {
    let record = scored_record();
    let table = criteria_table(&record, false);

    let detail_rows: usize = record
        .score()
        .criteria
        .iter()
        .map(|c| c.details.len())
        .sum();
    assert_eq!(table.len(), record.score().criteria.len() + detail_rows);

    let rendered = table.to_string();
    assert!(rendered.contains("coverage"));
    assert!(rendered.contains("vet: 1 finding(s)"));
}

#[test]
fn test_unscored_criteria_render_a_dash() {
    let record = scored_record();
    let rendered = criteria_table(&record, false).to_string();

    // No dependency list was stored
    let deps_line = rendered
        .lines()
        .find(|line| line.trim_start().starts_with("dependencies"))
        .unwrap();
    assert!(deps_line.contains(" - "));
}

#[test]
fn test_failure_lines_list_subtasks_then_infrastructure() {
    let mut record = Record::new(repo());
    record.record_error(SubtaskKind::TestResults, "RoutineTimeout: no result after 280s");
    record.record_error(SubtaskKind::CodeStatistics, "exit status 2");
    record.record_infrastructure_error(InfraStage::Persistence, "disk full");

    let lines = failure_lines(&record, false);
    assert_eq!(
        lines,
        vec![
            "  code_statistics: exit status 2",
            "  test_results: RoutineTimeout: no result after 280s",
            "  persistence: disk full",
        ]
    );
}

#[test]
fn test_failure_lines_empty_for_clean_record() {
    assert!(failure_lines(&scored_record(), false).is_empty());
}

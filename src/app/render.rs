//! Rendering of finished Records for the terminal
//!
//! Text output is a header line with the rank, a prettytable of criteria
//! (composite criteria add one dimmed row per detail) and any recorded
//! failures. JSON output is the Record itself.

use crate::core::styles::StyleRole;
use crate::model::api::{CriterionDetail, Record};
use crate::pool::api::PoolError;
use crate::scoring::api::Rank;
use prettytable::{format, Cell, Row, Table};

/// Style used for a rank band
pub fn rank_role(rank: Rank) -> StyleRole {
    match rank {
        Rank::APlus => StyleRole::GradeTop,
        Rank::A => StyleRole::GradeGood,
        Rank::B | Rank::C => StyleRole::GradeFair,
        Rank::D | Rank::E | Rank::F => StyleRole::GradePoor,
    }
}

fn styled_cell(text: &str, role: StyleRole, color: bool) -> Cell {
    let cell = Cell::new(text);
    match role.to_prettytable_spec() {
        Some(spec) if color => cell.style_spec(&spec),
        _ => cell,
    }
}

fn format_score(detail: &CriterionDetail) -> String {
    detail
        .score
        .map(|s| format!("{:.1}", s))
        .unwrap_or_else(|| "-".to_string())
}

/// One-line header: identifier, rank and value
pub fn header_line(record: &Record, color: bool) -> String {
    let score = record.score();
    format!(
        "{}  {}  {}",
        StyleRole::Key.paint(&record.repo().to_string(), color),
        rank_role(score.rank).paint(&score.rank.to_string(), color),
        StyleRole::Value.paint(&format!("{:.1}", score.value), color)
    )
}

/// Criteria table for a Record
pub fn criteria_table(record: &Record, color: bool) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_CLEAN);
    table.set_titles(Row::new(
        ["Criterion", "Score", "Weight", "Message"]
            .iter()
            .map(|title| styled_cell(title, StyleRole::Header, color))
            .collect(),
    ));

    for detail in &record.score().criteria {
        let role = if detail.contributes() {
            StyleRole::Value
        } else {
            StyleRole::Dim
        };
        table.add_row(Row::new(vec![
            styled_cell(&detail.name, StyleRole::Literal, color),
            styled_cell(&format_score(detail), role, color),
            styled_cell(&format!("{:.2}", detail.weight), role, color),
            styled_cell(&detail.message, role, color),
        ]));
        for line in &detail.details {
            table.add_row(Row::new(vec![
                Cell::new(""),
                Cell::new(""),
                Cell::new(""),
                styled_cell(&format!("  {}", line), StyleRole::Dim, color),
            ]));
        }
    }
    table
}

/// Lines describing failed subtasks and infrastructure steps
pub fn failure_lines(record: &Record, color: bool) -> Vec<String> {
    let subtasks = record
        .errors()
        .iter()
        .map(|(kind, message)| (kind.to_string(), message));
    let infrastructure = record
        .infrastructure_errors()
        .iter()
        .map(|(stage, message)| (stage.to_string(), message));

    subtasks
        .chain(infrastructure)
        .map(|(name, message)| {
            format!(
                "  {}: {}",
                StyleRole::Error.paint(&name, color),
                message
            )
        })
        .collect()
}

/// Print a Record in text form to stdout
pub fn print_record(record: &Record, color: bool) {
    println!("{}", header_line(record, color));
    if let Err(e) = criteria_table(record, color).print_tty(color) {
        log::warn!("Failed to print criteria table: {}", e);
    }
    let failures = failure_lines(record, color);
    if !failures.is_empty() {
        println!("{}", StyleRole::Header.paint("Failures:", color));
        for line in failures {
            println!("{}", line);
        }
    }
    println!();
}

/// Print a Record as pretty JSON to stdout
pub fn print_record_json(record: &Record) {
    match serde_json::to_string_pretty(record) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialise {}: {}", record.repo(), e),
    }
}

/// Print a rejected submission to stderr
pub fn print_rejection(spec: &str, error: &PoolError, color: bool) {
    eprintln!(
        "{}  {}",
        StyleRole::Key.paint(spec, color),
        StyleRole::Error.paint(&error.to_string(), color)
    );
}

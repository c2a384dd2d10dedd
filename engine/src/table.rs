//! Plain-text rendering of results in the layout of the results
//! table: one column per Armor Class, rows for chance to hit and average
//! damage per attack.

use std::fmt::Write;

use crate::api::{BuildReport, Comparison};
use crate::Emphasis;

const LABEL_WIDTH: usize = 12;
const CELL_WIDTH: usize = 9;
const EMPHASIS_MARK: char = '*';

pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}

pub fn format_damage(value: f64) -> String {
    format!("{:.2}", value)
}

pub fn report_header(report: &BuildReport) -> String {
    format!(
        "{} ({:+} to hit, {}, {})",
        report.name, report.to_hit, report.dice, report.roll_mode
    )
}

pub fn render_report(report: &BuildReport) -> String {
    let mut out = String::new();
    out.push_str(&report_header(report));
    out.push('\n');
    push_row(&mut out, "AC", report.defenses.iter().map(|d| d.to_string()), None);
    push_row(
        &mut out,
        "Hit chance",
        report.hit_chances.iter().map(|&h| format_percent(h)),
        None,
    );
    push_row(
        &mut out,
        "Avg damage",
        report.expected_damage.iter().map(|&d| format_damage(d)),
        None,
    );
    out
}

/// Both builds over the same Armor Classes. The larger average damage in
/// each column is marked with `*`; ties are left unmarked.
pub fn render_comparison(cmp: &Comparison) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "L: {}", report_header(&cmp.left));
    let _ = writeln!(out, "R: {}", report_header(&cmp.right));
    push_row(&mut out, "AC", cmp.left.defenses.iter().map(|d| d.to_string()), None);
    push_row(
        &mut out,
        "L hit",
        cmp.left.hit_chances.iter().map(|&h| format_percent(h)),
        None,
    );
    push_row(
        &mut out,
        "L damage",
        cmp.left.expected_damage.iter().map(|&d| format_damage(d)),
        Some((cmp.emphasis.as_slice(), Emphasis::Left)),
    );
    push_row(
        &mut out,
        "R hit",
        cmp.right.hit_chances.iter().map(|&h| format_percent(h)),
        None,
    );
    push_row(
        &mut out,
        "R damage",
        cmp.right.expected_damage.iter().map(|&d| format_damage(d)),
        Some((cmp.emphasis.as_slice(), Emphasis::Right)),
    );
    out
}

fn push_row(
    out: &mut String,
    label: &str,
    cells: impl Iterator<Item = String>,
    emphasis: Option<(&[Emphasis], Emphasis)>,
) {
    let mut line = format!("{:<width$}", label, width = LABEL_WIDTH);
    for (idx, cell) in cells.enumerate() {
        let marked = emphasis
            .and_then(|(row, side)| row.get(idx).map(|e| *e == side))
            .unwrap_or(false);
        let mark = if marked { EMPHASIS_MARK } else { ' ' };
        let _ = write!(line, "{:>width$}{}", cell, mark, width = CELL_WIDTH);
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

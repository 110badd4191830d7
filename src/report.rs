//! Text and JSON rendering of grading statistics.

use std::fmt::Write as _;

use anyhow::{Context, Result};

use crate::grading::Statistics;

/// Render the describe block followed by the grade histogram.
///
/// ```text
/// count     5.000000
/// mean     63.400000
/// ...
/// Name: exam1
///
/// Grade Counts:
/// A    1
/// ```
pub fn render_text(column: &str, stats: &Statistics) -> String {
    let s = &stats.summary;
    let rows: [(&str, String); 8] = [
        ("count", format!("{:.6}", s.count as f64)),
        ("mean", format!("{:.6}", s.mean)),
        ("std", s.std.map_or_else(|| "NaN".to_string(), |v| format!("{v:.6}"))),
        ("min", format!("{:.6}", s.min)),
        ("25%", format!("{:.6}", s.q25)),
        ("50%", format!("{:.6}", s.median)),
        ("75%", format!("{:.6}", s.q75)),
        ("max", format!("{:.6}", s.max)),
    ];
    let width = rows.iter().map(|(_, v)| v.len()).max().unwrap_or(0);

    let mut out = String::new();
    for (name, value) in &rows {
        let _ = writeln!(out, "{name:<5} {value:>width$}");
    }
    let _ = writeln!(out, "Name: {column}");

    out.push_str("\nGrade Counts:\n");
    let label_width = stats
        .grade_counts
        .iter()
        .map(|(label, _)| label.len())
        .max()
        .unwrap_or(0);
    for (label, n) in stats.grade_counts.iter() {
        let _ = writeln!(out, "{label:<label_width$}    {n}");
    }
    out
}

/// Pretty-printed JSON of the full statistics snapshot.
pub fn render_json(stats: &Statistics) -> Result<String> {
    serde_json::to_string_pretty(stats).context("serialising statistics")
}

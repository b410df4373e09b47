// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Markdown table renderers.

use super::ResultSet;
use crate::catalog::TestCase;
use crate::registry::{Capability, ModelDescriptor};

fn mark(value: bool) -> &'static str {
    if value {
        "✓"
    } else {
        "✗"
    }
}

fn row<S: AsRef<str>>(cells: &[S]) -> String {
    let cells: Vec<&str> = cells.iter().map(AsRef::as_ref).collect();
    format!("| {} |", cells.join(" | "))
}

fn separator(columns: usize) -> String {
    format!("|{}|", vec!["---"; columns].join("|"))
}

/// One row per model, one ✓/✗ column per capability
pub fn capability_table(models: &[&ModelDescriptor]) -> String {
    let mut header = vec!["Model".to_string()];
    header.extend(Capability::ALL.iter().map(|c| c.title()));

    let mut lines = vec![row(&header), separator(header.len())];
    for descriptor in models {
        let mut cells = vec![descriptor.identifier.clone()];
        cells.extend(
            Capability::ALL
                .iter()
                .map(|c| mark(descriptor.capabilities.supports(*c)).to_string()),
        );
        lines.push(row(&cells));
    }
    lines.join("\n")
}

const METRICS_HEADERS: [&str; 9] = [
    "Model",
    "Test Case",
    "Success",
    "Duration (s)",
    "Response Length",
    "Has Headers",
    "Has Lists",
    "Has Code Blocks",
    "Matches Pattern",
];

/// Per-result structural metrics plus one summary row per model.
///
/// Only successful results get a row. The summary averages duration and
/// response length over every result of the model, counting a failure's
/// length as zero.
pub fn metrics_table(results: &ResultSet, cases: &[TestCase]) -> String {
    let sep = separator(METRICS_HEADERS.len());
    let mut lines = vec![row(&METRICS_HEADERS), sep.clone()];

    for (model, model_results) in results {
        if model_results.is_empty() {
            continue;
        }

        let mut successes = 0usize;
        let mut total_length = 0usize;
        for result in model_results.iter().filter(|r| r.success) {
            let response = result.response_text();
            let length = response.chars().count();
            let pattern = cases
                .iter()
                .find(|c| c.name == result.test_case)
                .and_then(|c| c.matches_pattern(response))
                .map_or("-", mark);

            lines.push(row(&[
                model.clone(),
                result.test_case.clone(),
                mark(true).to_string(),
                format!("{:.2}", result.duration),
                length.to_string(),
                mark(response.contains('#')).to_string(),
                mark(response.contains('*') || response.contains('-')).to_string(),
                mark(response.contains("```")).to_string(),
                pattern.to_string(),
            ]));
            successes += 1;
            total_length += length;
        }

        let count = model_results.len() as f64;
        let total_duration: f64 = model_results.iter().map(|r| r.duration).sum();
        lines.push(row(&[
            format!("{} (Summary)", model),
            "ALL".to_string(),
            format!("{:.1}%", successes as f64 / count * 100.0),
            format!("{:.2}", total_duration / count),
            format!("{:.0}", total_length as f64 / count),
            "-".to_string(),
            "-".to_string(),
            "-".to_string(),
            "-".to_string(),
        ]));
        lines.push(sep.clone());
    }
    lines.join("\n")
}

struct SpeedStats<'a> {
    model: &'a str,
    avg: f64,
    min: f64,
    max: f64,
    total: f64,
}

const SPEED_HEADERS: [&str; 7] = [
    "Rank",
    "Model",
    "Avg Time (s)",
    "Min Time (s)",
    "Max Time (s)",
    "Total Time (s)",
    "Relative Speed",
];

/// Models ranked fastest first by average duration.
///
/// Relative speed is `slowest_avg / avg`, so the slowest model reads `1.0x`.
/// Models without results are left out.
pub fn speed_ranking(results: &ResultSet) -> String {
    let mut stats: Vec<SpeedStats<'_>> = results
        .iter()
        .filter(|(_, r)| !r.is_empty())
        .map(|(model, r)| {
            let total: f64 = r.iter().map(|x| x.duration).sum();
            SpeedStats {
                model,
                avg: total / r.len() as f64,
                min: r.iter().map(|x| x.duration).fold(f64::INFINITY, f64::min),
                max: r.iter().map(|x| x.duration).fold(0.0, f64::max),
                total,
            }
        })
        .collect();
    stats.sort_by(|a, b| a.avg.total_cmp(&b.avg));

    let slowest = stats.iter().map(|s| s.avg).fold(0.0, f64::max);
    let mut lines = vec![row(&SPEED_HEADERS), separator(SPEED_HEADERS.len())];
    for (rank, s) in stats.iter().enumerate() {
        lines.push(row(&[
            (rank + 1).to_string(),
            s.model.to_string(),
            format!("{:.2}", s.avg),
            format!("{:.2}", s.min),
            format!("{:.2}", s.max),
            format!("{:.2}", s.total),
            format!("{:.1}x faster", slowest / s.avg),
        ]));
    }
    lines.join("\n")
}

#[cfg(test)]
#[path = "tables_tests.rs"]
mod tests;

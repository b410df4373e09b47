// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Report files written after a run.

use chrono::{DateTime, Utc};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::paths::{markdown_dir, results_path, summary_path, transcript_path};
use super::tables::{metrics_table, speed_ranking};
use super::ResultSet;
use crate::catalog::TestCase;
use crate::runner::TestResult;

/// Timestamp used in report file names
pub fn file_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y%m%d_%H%M%S").to_string()
}

fn ensure_dir(dir: &Path) -> std::io::Result<()> {
    if !dir.as_os_str().is_empty() {
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Write `<root>/<model>_<ts>.json`, a pretty array of results
pub fn write_results_json(
    root: &Path,
    model: &str,
    results: &[TestResult],
    timestamp: &str,
) -> std::io::Result<PathBuf> {
    ensure_dir(root)?;
    let path = results_path(root, model, timestamp);
    let json = serde_json::to_string_pretty(results)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    std::fs::write(&path, json)?;
    Ok(path)
}

/// Write the model's transcript from its last non-empty successful result.
///
/// Returns `None` when no result qualifies; an existing transcript is then
/// left as it was.
pub fn write_transcript(
    root: &Path,
    model: &str,
    results: &[TestResult],
    timestamp: &str,
) -> std::io::Result<Option<PathBuf>> {
    let Some(latest) = results
        .iter()
        .rev()
        .find(|r| r.success && !r.response_text().is_empty())
    else {
        return Ok(None);
    };

    ensure_dir(&markdown_dir(root))?;
    let path = transcript_path(root, model);
    let mut file = std::fs::File::create(&path)?;
    write!(
        file,
        "---\nmodel: {}\ntest_case: {}\ntimestamp: {}\nduration: {:.2}s\n---\n\n{}",
        model,
        latest.test_case,
        timestamp,
        latest.duration,
        latest.response_text()
    )?;
    Ok(Some(path))
}

/// Full run summary: header, metrics table and speed ranking
pub fn summary_markdown(results: &ResultSet, cases: &[TestCase], run_at: DateTime<Utc>) -> String {
    format!(
        "# Model Test Results Summary\n\n\
         Test run: {}\n\n\
         ## Detailed Metrics\n\n\
         {}\n\n\
         ## Speed Rankings (Lower is Better)\n\n\
         {}\n",
        run_at.format("%Y-%m-%d %H:%M:%S UTC"),
        metrics_table(results, cases),
        speed_ranking(results)
    )
}

/// Write `<root>/markdown/model_test_summary_<ts>.md`
pub fn write_summary(
    root: &Path,
    results: &ResultSet,
    cases: &[TestCase],
    run_at: DateTime<Utc>,
) -> std::io::Result<PathBuf> {
    ensure_dir(&markdown_dir(root))?;
    let path = summary_path(root, &file_timestamp(run_at));
    std::fs::write(&path, summary_markdown(results, cases, run_at))?;
    Ok(path)
}

#[cfg(test)]
#[path = "files_tests.rs"]
mod tests;

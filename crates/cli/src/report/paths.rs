// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Output directory layout.

use std::path::{Path, PathBuf};

/// File-name form of a model: provider prefix and `-latest` removed
pub fn normalize_model_name(model: &str) -> String {
    let base = model.split_once(':').map_or(model, |(_, name)| name);
    base.replace("-latest", "")
}

pub fn markdown_dir(root: &Path) -> PathBuf {
    root.join("markdown")
}

/// `<root>/<model>_<ts>.json`
pub fn results_path(root: &Path, model: &str, timestamp: &str) -> PathBuf {
    root.join(format!("{}_{}.json", model, timestamp))
}

/// `<root>/markdown/<normalized>.md`
pub fn transcript_path(root: &Path, model: &str) -> PathBuf {
    markdown_dir(root).join(format!("{}.md", normalize_model_name(model)))
}

pub fn summary_path(root: &Path, timestamp: &str) -> PathBuf {
    markdown_dir(root).join(format!("model_test_summary_{}.md", timestamp))
}

#[cfg(test)]
#[path = "paths_tests.rs"]
mod tests;

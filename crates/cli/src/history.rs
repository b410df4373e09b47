// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-model history persisted across runs.
//!
//! The store is a single JSON object keyed by model identifier. Provider,
//! base name and capabilities are written for readers of the file but are
//! always recomputed from the registry on load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::provider::Provider;
use crate::registry::{Capability, ModelCapabilities, ModelDescriptor, ModelRegistry};
use crate::runner::TestResult;

/// File name of the history store inside the output directory
pub const HISTORY_FILE: &str = "test_history.json";

/// Known issues shown per model by [`render_history`]
pub const RECENT_ISSUES: usize = 3;

/// Histories keyed by model identifier
pub type HistoryMap = BTreeMap<String, ModelHistory>;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("Failed to access history file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode history: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to replace history file: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Accumulated outcomes for one model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelHistory {
    pub model: String,
    pub provider: Provider,
    pub base_name: String,
    pub capabilities: ModelCapabilities,
    pub last_success: Option<DateTime<Utc>>,
    pub last_failure: Option<DateTime<Utc>>,
    pub failure_count: u64,
    pub success_count: u64,
    pub known_issues: Vec<String>,
}

impl ModelHistory {
    /// Empty history for a registered model
    pub fn new(descriptor: &ModelDescriptor) -> Self {
        Self {
            model: descriptor.identifier.clone(),
            provider: descriptor.provider,
            base_name: descriptor.base_name.clone(),
            capabilities: descriptor.capabilities,
            last_success: None,
            last_failure: None,
            failure_count: 0,
            success_count: 0,
            known_issues: Vec::new(),
        }
    }

    /// Fold one result into the counters
    pub fn record(&mut self, result: &TestResult) {
        if result.success {
            self.success_count += 1;
            self.last_success = Some(result.timestamp);
        } else {
            self.failure_count += 1;
            self.last_failure = Some(result.timestamp);
            if let Some(error) = &result.error {
                self.known_issues.push(error.clone());
            }
        }
    }

    pub fn total(&self) -> u64 {
        self.success_count + self.failure_count
    }

    /// The most recent `n` known issues, oldest first
    pub fn recent_issues(&self, n: usize) -> &[String] {
        let start = self.known_issues.len().saturating_sub(n);
        &self.known_issues[start..]
    }
}

/// Stored fields that survive re-resolution against the registry
#[derive(Deserialize)]
struct StoredHistory {
    #[serde(default)]
    last_success: Option<DateTime<Utc>>,
    #[serde(default)]
    last_failure: Option<DateTime<Utc>>,
    #[serde(default)]
    failure_count: u64,
    #[serde(default)]
    success_count: u64,
    #[serde(default)]
    known_issues: Vec<String>,
}

/// Flat-file history store
#[derive(Clone, Debug)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<dir>/test_history.json`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(HISTORY_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every entry that still resolves against `registry`.
    ///
    /// A missing file is an empty history. Unreadable content and bad
    /// entries are logged and skipped; only I/O failures are errors.
    pub fn load(&self, registry: &ModelRegistry) -> Result<HistoryMap, HistoryError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HistoryMap::new()),
            Err(e) => return Err(e.into()),
        };

        let entries = match serde_json::from_str::<serde_json::Value>(&content) {
            Ok(serde_json::Value::Object(entries)) => entries,
            Ok(_) => {
                tracing::warn!(path = %self.path.display(), "history file is not a JSON object, ignoring it");
                return Ok(HistoryMap::new());
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "could not parse history file, ignoring it");
                return Ok(HistoryMap::new());
            }
        };

        let mut histories = HistoryMap::new();
        for (model, value) in entries {
            let descriptor = match registry.lookup(&model) {
                Ok(descriptor) => descriptor,
                Err(e) => {
                    tracing::warn!(model = %model, error = %e, "dropping history entry");
                    continue;
                }
            };
            let stored: StoredHistory = match serde_json::from_value(value) {
                Ok(stored) => stored,
                Err(e) => {
                    tracing::warn!(model = %model, error = %e, "dropping malformed history entry");
                    continue;
                }
            };

            let mut history = ModelHistory::new(descriptor);
            history.last_success = stored.last_success;
            history.last_failure = stored.last_failure;
            history.failure_count = stored.failure_count;
            history.success_count = stored.success_count;
            history.known_issues = stored.known_issues;
            histories.insert(model, history);
        }
        Ok(histories)
    }

    /// Rewrite the whole file atomically
    pub fn save(&self, histories: &HistoryMap) -> Result<(), HistoryError> {
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, histories)?;
        file.write_all(b"\n")?;
        file.flush()?;
        file.persist(&self.path)?;
        tracing::debug!(path = %self.path.display(), models = histories.len(), "saved history");
        Ok(())
    }
}

/// Human-readable dump of every history entry, sorted by model
pub fn render_history(histories: &HistoryMap) -> String {
    let mut out = String::from("\nTest History:\n");
    if histories.is_empty() {
        out.push_str("\nNo test history recorded yet.\n");
        return out;
    }

    for (model, history) in histories {
        let _ = writeln!(out, "\n{}:", model);
        let _ = writeln!(out, "  Provider: {}", history.provider);
        let _ = writeln!(out, "  Base Name: {}", history.base_name);
        out.push_str("  Capabilities:\n");
        for capability in Capability::ALL {
            let mark = if history.capabilities.supports(capability) {
                "✓"
            } else {
                "✗"
            };
            let _ = writeln!(out, "    • {}: {}", capability.as_str(), mark);
        }
        let _ = writeln!(
            out,
            "  Success Rate: {}/{}",
            history.success_count,
            history.total()
        );
        if let Some(ts) = history.last_success {
            let _ = writeln!(out, "  Last Success: {}", ts.to_rfc3339());
        }
        if let Some(ts) = history.last_failure {
            let _ = writeln!(out, "  Last Failure: {}", ts.to_rfc3339());
        }
        let issues = history.recent_issues(RECENT_ISSUES);
        if !issues.is_empty() {
            out.push_str("  Known Issues:\n");
            for issue in issues {
                let _ = writeln!(out, "    • {}", issue);
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "history_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Call log implementation.

use crate::call::{CapturedCall, CapturedOutcome, CapturedRequest};
use parking_lot::Mutex;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::sync::Arc;
use std::time::{Instant, SystemTime};

/// Shared log of completion calls.
///
/// Clones share the same underlying storage, so a client and the test that
/// owns it can both hold a handle.
pub struct CallLog {
    start: Instant,
    calls: Arc<Mutex<Vec<CapturedCall>>>,
    file_writer: Option<Arc<Mutex<BufWriter<File>>>>,
}

impl CallLog {
    /// Create a new in-memory call log
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            calls: Arc::new(Mutex::new(Vec::new())),
            file_writer: None,
        }
    }

    /// Create a call log that also appends JSONL records to a file
    pub fn with_file(path: &Path) -> std::io::Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            start: Instant::now(),
            calls: Arc::new(Mutex::new(Vec::new())),
            file_writer: Some(Arc::new(Mutex::new(BufWriter::new(file)))),
        })
    }

    /// Record a finished call
    pub fn record(&self, request: CapturedRequest, outcome: CapturedOutcome) {
        let mut calls = self.calls.lock();
        let call = CapturedCall {
            seq: calls.len() as u64,
            timestamp: SystemTime::now(),
            elapsed_ms: self.start.elapsed().as_millis() as u64,
            request,
            outcome,
        };

        calls.push(call.clone());

        if let Some(ref writer) = self.file_writer {
            use std::io::Write;
            let mut w = writer.lock();
            if let Ok(json) = serde_json::to_string(&call) {
                let _ = writeln!(w, "{}", json);
                let _ = w.flush();
            }
        }
    }

    /// Get all captured calls
    pub fn calls(&self) -> Vec<CapturedCall> {
        self.calls.lock().clone()
    }

    /// Calls made for one model identifier
    pub fn calls_for(&self, model: &str) -> Vec<CapturedCall> {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.request.model == model)
            .cloned()
            .collect()
    }

    /// Count calls made for one model identifier
    pub fn count_for(&self, model: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| c.request.model == model)
            .count()
    }

    /// Calls that ended in a failure
    pub fn failures(&self) -> Vec<CapturedCall> {
        self.calls
            .lock()
            .iter()
            .filter(|c| !c.outcome.is_response())
            .cloned()
            .collect()
    }

    /// Get the total number of calls
    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    /// Check if the log is empty
    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }
}

impl Default for CallLog {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for CallLog {
    fn clone(&self) -> Self {
        Self {
            start: self.start,
            calls: Arc::clone(&self.calls),
            file_writer: self.file_writer.as_ref().map(Arc::clone),
        }
    }
}

impl std::fmt::Debug for CallLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallLog")
            .field("calls", &self.len())
            .field("file", &self.file_writer.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;

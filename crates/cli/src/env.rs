// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! All runtime environment variables read by modeltest are defined here.
//! The process environment is only ever read; credentials found here are
//! handed to the completion client explicitly.

/// Generated env var name constants.
mod names {
    include!(concat!(env!("OUT_DIR"), "/env_names.rs"));
}

// Re-export name constants for callers that need the raw name string.
pub use names::*;

use std::path::PathBuf;

/// Read a variable, treating blank values as unset.
pub fn non_blank(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// `MODELTEST_OUTPUT_DIR`: Default results directory when `--output-dir` is absent.
pub fn output_dir() -> Option<PathBuf> {
    non_blank(names::MODELTEST_OUTPUT_DIR).map(PathBuf::from)
}

/// `MODELTEST_COOLDOWN_MS`: Delay between consecutive test cases. Default 500.
pub fn cooldown_ms() -> Option<u64> {
    var_u64(names::MODELTEST_COOLDOWN_MS)
}

/// `MODELTEST_LOG`: Tracing filter directive (e.g. `debug`, `modeltest=trace`).
pub fn log_filter() -> Option<String> {
    non_blank(names::MODELTEST_LOG)
}

fn var_u64(name: &str) -> Option<u64> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;

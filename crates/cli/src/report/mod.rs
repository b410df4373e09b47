// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Reports rendered from a finished run.
//!
//! [`tables`] holds the pure markdown renderers; [`files`] writes results,
//! transcripts and the run summary under the layout described in [`paths`].

pub mod files;
pub mod paths;
pub mod tables;

use std::collections::BTreeMap;

use crate::runner::TestResult;

pub use files::{file_timestamp, summary_markdown, write_results_json, write_summary, write_transcript};
pub use paths::normalize_model_name;
pub use tables::{capability_table, metrics_table, speed_ranking};

/// Results of a run keyed by model identifier
pub type ResultSet = BTreeMap<String, Vec<TestResult>>;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Completion call capture for test assertions.
//!
//! Every call a completion client makes can be recorded here, in memory and
//! optionally as JSONL on disk. Tests use the log to assert which models were
//! actually contacted and which were skipped before any request went out.

mod call;
mod log;

pub use call::{CapturedCall, CapturedOutcome, CapturedRequest};
pub use log::CallLog;

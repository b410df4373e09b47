// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! LLM provider test harness.
//!
//! Runs a fixed battery of prompts against every registered model whose
//! provider has an API key, gates each case on the model's capabilities,
//! and reports success, structure and speed. History accumulates across runs
//! in a flat JSON file.
//!
//! The pieces, leaves first: [`registry`] (models and the capability gate),
//! [`catalog`] (test cases per scenario), [`client`] (the completion
//! boundary), [`runner`], [`history`] and [`report`].
#![doc = include_str!("../README.md")]

pub mod app;
pub mod catalog;
pub mod cli;
pub mod client;
pub mod diagnostic;
pub mod env;
pub mod help;
pub mod history;
pub mod logging;
pub mod provider;
pub mod registry;
pub mod report;
pub mod runner;
pub mod time;

/// Re-exported capture types from the `modeltest-capture` crate.
pub mod capture {
    pub use modeltest_capture::{CallLog, CapturedCall, CapturedOutcome, CapturedRequest};
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line arguments.

use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use crate::catalog::TestScenario;
use crate::provider::Provider;
use crate::runner::DEFAULT_MAX_CONCURRENCY;

pub const DEFAULT_OUTPUT_DIR: &str = "test_results";

const EXAMPLES: &str = "\
Examples:
  # Show available providers and their status
  modeltest --list-providers

  # Run tests with all available models
  modeltest --run-tests

  # Run tests with specific providers
  modeltest --run-tests --providers anthropic openai

  # Show test history for all models
  modeltest --show-history

  # Re-test only models that have failed before
  modeltest --run-tests --failed-only

  # Run the multi-file scenario
  modeltest --run-tests --scenario multi-file";

/// Commands a run-only modifier cannot be combined with
const OTHER_COMMANDS: [&str; 3] = ["list_providers", "show_history", "help_verbose"];

/// Test LLM models and track results
#[derive(Parser, Debug, Clone)]
#[command(name = "modeltest", version, about, after_help = EXAMPLES)]
#[command(group(
    ArgGroup::new("command")
        .required(true)
        .args(["run_tests", "list_providers", "show_history", "help_verbose"]),
))]
pub struct Cli {
    /// Run model tests
    #[arg(long)]
    pub run_tests: bool,

    /// List available providers and their status
    #[arg(long)]
    pub list_providers: bool,

    /// Show test history for all models
    #[arg(long)]
    pub show_history: bool,

    /// Show detailed help information
    #[arg(long)]
    pub help_verbose: bool,

    /// Specific providers to test (default: all available)
    #[arg(long, value_enum, num_args = 1.., conflicts_with_all = OTHER_COMMANDS)]
    pub providers: Vec<Provider>,

    /// Only test models that have failed before
    #[arg(long, conflicts_with_all = OTHER_COMMANDS)]
    pub failed_only: bool,

    /// Test scenario to run
    #[arg(
        long,
        value_enum,
        default_value_t = TestScenario::Standard,
        conflicts_with_all = OTHER_COMMANDS
    )]
    pub scenario: TestScenario,

    /// Directory for test results [default: test_results]
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Run tests concurrently across models
    #[arg(long, conflicts_with_all = OTHER_COMMANDS)]
    pub concurrent: bool,

    /// Model batches in flight with --concurrent
    #[arg(
        long,
        default_value_t = DEFAULT_MAX_CONCURRENCY,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..),
        requires = "concurrent",
        conflicts_with_all = OTHER_COMMANDS
    )]
    pub max_concurrency: usize,

    /// Answer from a TOML/JSON script instead of calling provider APIs
    #[arg(long, value_name = "FILE", conflicts_with_all = OTHER_COMMANDS)]
    pub script: Option<PathBuf>,

    /// Record every completion call as JSON lines
    #[arg(long, value_name = "FILE", conflicts_with_all = OTHER_COMMANDS)]
    pub capture: Option<PathBuf>,
}

impl Cli {
    /// `--output-dir`, else `MODELTEST_OUTPUT_DIR`, else `test_results`
    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .or_else(crate::env::output_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    /// Batches allowed in flight at once
    pub fn effective_concurrency(&self) -> usize {
        if self.concurrent {
            self.max_concurrency.max(1)
        } else {
            1
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use clap::error::ErrorKind;
use serial_test::serial;
use yare::parameterized;

fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
    Cli::try_parse_from(std::iter::once("modeltest").chain(args.iter().copied()))
}

#[test]
fn run_tests_defaults() {
    let cli = parse(&["--run-tests"]).unwrap();
    assert!(cli.run_tests);
    assert!(cli.providers.is_empty());
    assert!(!cli.failed_only);
    assert_eq!(cli.scenario, TestScenario::Standard);
    assert!(!cli.concurrent);
    assert_eq!(cli.max_concurrency, DEFAULT_MAX_CONCURRENCY);
    assert_eq!(cli.effective_concurrency(), 1);
    assert!(cli.script.is_none());
}

#[test]
fn providers_take_multiple_values() {
    let cli = parse(&["--run-tests", "--providers", "anthropic", "google-gla", "groq"]).unwrap();
    assert_eq!(
        cli.providers,
        vec![Provider::Anthropic, Provider::GoogleGla, Provider::Groq]
    );
}

#[test]
fn unknown_provider_is_rejected() {
    let err = parse(&["--run-tests", "--providers", "acme"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidValue);
}

#[test]
fn multi_file_scenario() {
    let cli = parse(&["--run-tests", "--scenario", "multi-file"]).unwrap();
    assert_eq!(cli.scenario, TestScenario::MultiFile);
}

#[test]
fn concurrent_uses_max_concurrency() {
    let cli = parse(&["--run-tests", "--concurrent", "--max-concurrency", "8"]).unwrap();
    assert_eq!(cli.effective_concurrency(), 8);
}

#[test]
fn zero_concurrency_is_rejected() {
    let err = parse(&["--run-tests", "--concurrent", "--max-concurrency", "0"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValueValidation);
}

#[test]
fn a_command_is_required() {
    let err = parse(&[]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
}

#[parameterized(
    run_and_list = { &["--run-tests", "--list-providers"] },
    list_and_history = { &["--list-providers", "--show-history"] },
    history_and_help = { &["--show-history", "--help-verbose"] },
)]
fn commands_are_exclusive(args: &[&str]) {
    let err = parse(args).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    assert_eq!(err.exit_code(), 2);
}

#[parameterized(
    providers = { &["--list-providers", "--providers", "openai"] },
    failed_only = { &["--show-history", "--failed-only"] },
    concurrent = { &["--list-providers", "--concurrent"] },
    script = { &["--show-history", "--script", "s.toml"] },
    capture = { &["--help-verbose", "--capture", "calls.jsonl"] },
    scenario = { &["--list-providers", "--scenario", "multi-file"] },
    scenario_with_history = { &["--show-history", "--scenario", "standard"] },
    max_concurrency = { &["--list-providers", "--max-concurrency", "2"] },
)]
fn run_modifiers_conflict_with_other_commands(args: &[&str]) {
    let err = parse(args).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn max_concurrency_requires_concurrent() {
    let err = parse(&["--run-tests", "--max-concurrency", "3"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
}


#[test]
fn output_dir_flag() {
    let cli = parse(&["--show-history", "--output-dir", "/tmp/results"]).unwrap();
    assert_eq!(cli.output_dir(), PathBuf::from("/tmp/results"));
}

#[test]
#[serial]
fn output_dir_falls_back_to_env_then_default() {
    let cli = parse(&["--show-history"]).unwrap();

    std::env::set_var(crate::env::MODELTEST_OUTPUT_DIR, "/tmp/from-env");
    let from_env = cli.output_dir();
    std::env::remove_var(crate::env::MODELTEST_OUTPUT_DIR);

    assert_eq!(from_env, PathBuf::from("/tmp/from-env"));
    assert_eq!(cli.output_dir(), PathBuf::from(DEFAULT_OUTPUT_DIR));
}

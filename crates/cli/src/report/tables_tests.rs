// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use crate::catalog::TestScenario;
use crate::registry::ModelRegistry;
use crate::runner::TestResult;
use chrono::{TimeZone, Utc};

fn passed(model: &str, case: &str, response: &str, duration: f64) -> TestResult {
    TestResult::passed(model, case, response.into(), duration, Utc.timestamp_opt(0, 0).unwrap())
}

fn failed(model: &str, case: &str, duration: f64) -> TestResult {
    TestResult::failed(model, case, "nope".into(), duration, Utc.timestamp_opt(0, 0).unwrap())
}

#[test]
fn capability_table_layout() {
    let registry = ModelRegistry::builtin();
    let qwen = registry.lookup("groq:qwen-2.5-coder-32b").unwrap();
    let table = capability_table(&[qwen]);
    let lines: Vec<&str> = table.lines().collect();

    assert_eq!(
        lines[0],
        "| Model | Tools | Function Calling | Json Mode | System Prompt | Vision | Audio |"
    );
    assert_eq!(lines[1], "|---|---|---|---|---|---|---|");
    assert_eq!(lines[2], "| groq:qwen-2.5-coder-32b | ✗ | ✗ | ✓ | ✓ | ✗ | ✗ |");
}

#[test]
fn capability_table_keeps_input_order() {
    let registry = ModelRegistry::builtin();
    let a = registry.lookup("openai:gpt-4o").unwrap();
    let b = registry.lookup("anthropic:claude-3-5-sonnet-latest").unwrap();
    let table = capability_table(&[a, b]);
    let lines: Vec<&str> = table.lines().collect();
    assert!(lines[2].starts_with("| openai:gpt-4o |"));
    assert!(lines[3].starts_with("| anthropic:claude-3-5-sonnet-latest |"));
}

#[test]
fn metrics_rows_only_for_successes() {
    let cases = TestScenario::Standard.test_cases();
    let results = ResultSet::from([(
        "openai:gpt-4o".to_string(),
        vec![
            passed("openai:gpt-4o", "basic_response", "# 2 + 2 = 4", 1.0),
            failed("openai:gpt-4o", "markdown_structure", 3.0),
        ],
    )]);

    let table = metrics_table(&results, &cases);
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(
        lines[0],
        "| Model | Test Case | Success | Duration (s) | Response Length | Has Headers | Has Lists | Has Code Blocks | Matches Pattern |"
    );
    assert_eq!(
        lines[2],
        "| openai:gpt-4o | basic_response | ✓ | 1.00 | 11 | ✓ | ✗ | ✗ | ✓ |"
    );
    // 1 of 2 passed, mean duration 2.0, mean length 11 / 2 rounds to 6
    assert_eq!(
        lines[3],
        "| openai:gpt-4o (Summary) | ALL | 50.0% | 2.00 | 6 | - | - | - | - |"
    );
    assert_eq!(lines[4], lines[1]);
}

#[test]
fn metrics_marker_columns() {
    let response = "# Title\n- item\n```python\nprint(1)\n```";
    let results = ResultSet::from([(
        "a:b".to_string(),
        vec![passed("a:b", "custom", response, 0.5)],
    )]);

    let table = metrics_table(&results, &[]);
    let row = table.lines().nth(2).unwrap();
    assert!(row.ends_with("| ✓ | ✓ | ✓ | - |"));
}

#[test]
fn metrics_pattern_mismatch_marked() {
    let cases = TestScenario::Standard.test_cases();
    let results = ResultSet::from([(
        "a:b".to_string(),
        vec![passed("a:b", "code_generation", "no headers here", 0.5)],
    )]);

    let row = metrics_table(&results, &cases).lines().nth(2).unwrap().to_string();
    assert!(row.ends_with("| ✗ |"));
}

#[test]
fn metrics_skip_models_without_results() {
    let results = ResultSet::from([("a:b".to_string(), Vec::new())]);
    assert_eq!(metrics_table(&results, &[]).lines().count(), 2);
}

#[test]
fn slowest_model_is_one_x() {
    let results = ResultSet::from([
        (
            "fast:model".to_string(),
            vec![passed("fast:model", "a", "x", 1.0), passed("fast:model", "b", "x", 1.0)],
        ),
        (
            "slow:model".to_string(),
            vec![passed("slow:model", "a", "x", 3.0), failed("slow:model", "b", 5.0)],
        ),
    ]);

    let table = speed_ranking(&results);
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(
        lines[0],
        "| Rank | Model | Avg Time (s) | Min Time (s) | Max Time (s) | Total Time (s) | Relative Speed |"
    );
    assert_eq!(lines[2], "| 1 | fast:model | 1.00 | 1.00 | 1.00 | 2.00 | 4.0x faster |");
    assert_eq!(lines[3], "| 2 | slow:model | 4.00 | 3.00 | 5.00 | 8.00 | 1.0x faster |");
}

#[test]
fn speed_ranking_skips_empty_models() {
    let results = ResultSet::from([
        ("empty:model".to_string(), Vec::new()),
        ("only:model".to_string(), vec![passed("only:model", "a", "x", 0.25)]),
    ]);
    let table = speed_ranking(&results);
    assert_eq!(table.lines().count(), 3);
    assert!(table.contains("| 1 | only:model | 0.25 |"));
    assert!(table.ends_with("1.0x faster |"));
}

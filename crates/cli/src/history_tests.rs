// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use chrono::TimeZone;
use tracing_test::traced_test;

const CLAUDE: &str = "anthropic:claude-3-5-sonnet-latest";
const QWEN: &str = "groq:qwen-2.5-coder-32b";

fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).single().unwrap()
}

fn result(model: &str, success: bool, at: i64) -> TestResult {
    if success {
        TestResult::passed(model, "basic_response", "# ok".into(), 1.0, ts(at))
    } else {
        TestResult::failed(model, "basic_response", format!("boom {}", at), 1.0, ts(at))
    }
}

fn history_for(registry: &ModelRegistry, model: &str) -> ModelHistory {
    ModelHistory::new(registry.lookup(model).unwrap())
}

#[test]
fn record_updates_counters_and_issues() {
    let registry = ModelRegistry::builtin();
    let mut history = history_for(&registry, CLAUDE);

    history.record(&result(CLAUDE, true, 10));
    history.record(&result(CLAUDE, false, 20));
    history.record(&result(CLAUDE, false, 30));

    assert_eq!(history.success_count, 1);
    assert_eq!(history.failure_count, 2);
    assert_eq!(history.total(), 3);
    assert_eq!(history.last_success, Some(ts(10)));
    assert_eq!(history.last_failure, Some(ts(30)));
    assert_eq!(history.known_issues, vec!["boom 20", "boom 30"]);
}

#[test]
fn recent_issues_keeps_newest() {
    let registry = ModelRegistry::builtin();
    let mut history = history_for(&registry, CLAUDE);
    for i in 0..5 {
        history.record(&result(CLAUDE, false, i));
    }
    assert_eq!(history.recent_issues(3), ["boom 2", "boom 3", "boom 4"]);
    assert_eq!(history.known_issues.len(), 5);
}

#[test]
fn missing_file_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::in_dir(dir.path());
    assert!(store.load(&ModelRegistry::builtin()).unwrap().is_empty());
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::in_dir(&dir.path().join("nested"));
    let registry = ModelRegistry::builtin();

    let mut claude = history_for(&registry, CLAUDE);
    claude.record(&result(CLAUDE, true, 100));
    claude.record(&result(CLAUDE, false, 200));
    let mut qwen = history_for(&registry, QWEN);
    qwen.record(&result(QWEN, false, 300));

    let histories = HistoryMap::from([(CLAUDE.to_string(), claude), (QWEN.to_string(), qwen)]);
    store.save(&histories).unwrap();
    let loaded = store.load(&registry).unwrap();

    assert_eq!(loaded, histories);
    assert!(store.path().ends_with("nested/test_history.json"));
}

#[test]
fn saved_file_uses_documented_field_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::in_dir(dir.path());
    let registry = ModelRegistry::builtin();
    let mut claude = history_for(&registry, CLAUDE);
    claude.record(&result(CLAUDE, true, 0));
    store
        .save(&HistoryMap::from([(CLAUDE.to_string(), claude)]))
        .unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
    let entry = &raw[CLAUDE];
    assert_eq!(entry["model"], CLAUDE);
    assert_eq!(entry["provider"], "anthropic");
    assert_eq!(entry["base_name"], "claude-3-5-sonnet");
    assert_eq!(entry["capabilities"]["system_prompt"], true);
    assert_eq!(entry["success_count"], 1);
    assert_eq!(entry["failure_count"], 0);
    assert_eq!(entry["last_success"], "1970-01-01T00:00:00Z");
    assert!(entry["last_failure"].is_null());
    assert_eq!(entry["known_issues"], serde_json::json!([]));
}

#[test]
#[traced_test]
fn good_and_bad_entries_load_only_good() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::in_dir(dir.path());
    std::fs::write(
        store.path(),
        format!(
            r#"{{
                "{CLAUDE}": {{ "success_count": 3, "failure_count": 1, "known_issues": ["x"] }},
                "{QWEN}": {{ "success_count": "many" }}
            }}"#
        ),
    )
    .unwrap();

    let loaded = store.load(&ModelRegistry::builtin()).unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[CLAUDE].success_count, 3);
    assert_eq!(loaded[CLAUDE].known_issues, vec!["x"]);
    assert!(logs_contain("dropping malformed history entry"));
}

#[test]
#[traced_test]
fn unregistered_model_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::in_dir(dir.path());
    std::fs::write(store.path(), r#"{"acme:rocket": {"success_count": 1}}"#).unwrap();

    assert!(store.load(&ModelRegistry::builtin()).unwrap().is_empty());
    assert!(logs_contain("not found in registry"));
}

#[test]
fn stored_metadata_is_recomputed_from_registry() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::in_dir(dir.path());
    std::fs::write(
        store.path(),
        format!(
            r#"{{"{QWEN}": {{"provider": "openai", "base_name": "stale", "capabilities": {{"vision": true}}, "success_count": 2}}}}"#
        ),
    )
    .unwrap();

    let loaded = store.load(&ModelRegistry::builtin()).unwrap();
    let qwen = &loaded[QWEN];
    assert_eq!(qwen.provider, crate::provider::Provider::Groq);
    assert_eq!(qwen.base_name, "qwen-2.5-coder");
    assert!(!qwen.capabilities.vision);
    assert_eq!(qwen.success_count, 2);
}

#[test]
#[traced_test]
fn non_object_top_level_loads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = HistoryStore::in_dir(dir.path());
    std::fs::write(store.path(), "[1, 2, 3]").unwrap();

    assert!(store.load(&ModelRegistry::builtin()).unwrap().is_empty());
    assert!(logs_contain("not a JSON object"));
}

#[test]
fn render_history_shows_recent_issues_only() {
    let registry = ModelRegistry::builtin();
    let mut qwen = history_for(&registry, QWEN);
    for i in 0..4 {
        qwen.record(&result(QWEN, false, i));
    }
    qwen.record(&result(QWEN, true, 9));

    let out = render_history(&HistoryMap::from([(QWEN.to_string(), qwen)]));
    assert!(out.contains("groq:qwen-2.5-coder-32b:"));
    assert!(out.contains("  Provider: groq"));
    assert!(out.contains("  Base Name: qwen-2.5-coder"));
    assert!(out.contains("    • json_mode: ✓"));
    assert!(out.contains("    • vision: ✗"));
    assert!(out.contains("  Success Rate: 1/5"));
    assert!(out.contains("  Last Success: 1970-01-01T00:00:09+00:00"));
    assert!(!out.contains("boom 0"));
    assert!(out.contains("    • boom 1"));
    assert!(out.contains("    • boom 3"));
}

#[test]
fn render_history_empty() {
    assert!(render_history(&HistoryMap::new()).contains("No test history recorded yet."));
}

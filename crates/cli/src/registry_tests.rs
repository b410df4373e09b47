// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use proptest::prelude::*;
use yare::parameterized;

fn descriptor(caps: ModelCapabilities) -> ModelDescriptor {
    ModelDescriptor::new("test:model", Provider::Anthropic, "model", caps)
}

#[test]
fn capabilities_default_only_system_prompt() {
    let caps = ModelCapabilities::default();
    assert!(caps.system_prompt);
    for cap in Capability::ALL {
        assert_eq!(caps.supports(cap), cap == Capability::SystemPrompt);
    }
}

#[test]
fn capabilities_missing_fields_use_defaults() {
    let caps: ModelCapabilities = serde_json::from_str(r#"{"vision": true}"#).unwrap();
    assert!(caps.vision);
    assert!(caps.system_prompt);
    assert!(!caps.tools);
}

#[parameterized(
    tools = { "tools", Capability::Tools },
    function_calling = { "function_calling", Capability::FunctionCalling },
    json_mode = { "json_mode", Capability::JsonMode },
    audio = { "audio", Capability::Audio },
)]
fn capability_parse(name: &str, expected: Capability) {
    assert_eq!(Capability::parse(name), Some(expected));
}

#[test]
fn capability_title_case() {
    assert_eq!(Capability::FunctionCalling.title(), "Function Calling");
    assert_eq!(Capability::Tools.title(), "Tools");
}

#[test]
fn lookup_known_model() {
    let registry = ModelRegistry::builtin();
    let model = registry.lookup("groq:qwen-2.5-coder-32b").unwrap();
    assert_eq!(model.provider, Provider::Groq);
    assert_eq!(model.base_name, "qwen-2.5-coder");
    assert!(model.capabilities.json_mode);
    assert!(!model.capabilities.tools);
}

#[test]
fn lookup_unknown_model_is_not_found() {
    let registry = ModelRegistry::builtin();
    let err = registry.lookup("nobody:nothing").unwrap_err();
    assert_eq!(err, RegistryError::NotFound("nobody:nothing".to_string()));
    assert_eq!(err.to_string(), "Model nobody:nothing not found in registry");
}

#[test]
fn api_model_strips_provider_prefix() {
    let registry = ModelRegistry::builtin();
    let model = registry.lookup("anthropic:claude-3-5-sonnet-latest").unwrap();
    assert_eq!(model.api_model(), "claude-3-5-sonnet-latest");
}

#[test]
fn gate_passes_with_all_capabilities() {
    let case = TestCase::new("t", "s", "p").requiring(["system_prompt", "vision"]);
    assert!(can_run(&descriptor(ModelCapabilities::all()), &case));
}

#[test]
fn gate_passes_with_no_requirements() {
    let case = TestCase::new("t", "s", "p").requiring(Vec::<String>::new());
    let caps = ModelCapabilities::default().with(Capability::SystemPrompt, false);
    assert!(can_run(&descriptor(caps), &case));
}

#[test]
fn gate_reports_missing_capabilities() {
    let case = TestCase::new("t", "s", "p").requiring(["vision", "system_prompt", "audio"]);
    let d = descriptor(ModelCapabilities::default());
    assert!(!can_run(&d, &case));
    assert_eq!(missing_capabilities(&d, &case), vec!["audio", "vision"]);
}

#[test]
fn gate_treats_unknown_capability_as_missing() {
    let case = TestCase::new("t", "s", "p").requiring(["telepathy"]);
    let d = descriptor(ModelCapabilities::all());
    assert!(!can_run(&d, &case));
    assert_eq!(missing_capabilities(&d, &case), vec!["telepathy"]);
}

#[test]
fn select_models_for_available_providers() {
    let registry = ModelRegistry::builtin();
    let selected = registry.select_models(&[Provider::Anthropic, Provider::Groq]);
    assert_eq!(
        selected,
        vec![
            "anthropic:claude-3-5-sonnet-latest",
            "groq:deepseek-r1-distill-llama-70b-specdec",
            "groq:qwen-2.5-coder-32b",
        ]
    );
}

#[test]
fn select_models_empty_without_providers() {
    let registry = ModelRegistry::builtin();
    assert!(registry.select_models(&[]).is_empty());
    assert!(registry.select_models(&[Provider::Cohere]).is_empty());
}

#[test]
fn select_models_dedupes_base_names() {
    let caps = ModelCapabilities::default();
    let registry = ModelRegistry::from_descriptors([
        ModelDescriptor::new("groq:llama-3-a", Provider::Groq, "llama-3", caps),
        ModelDescriptor::new("groq:llama-3-b", Provider::Groq, "llama-3", caps),
    ]);
    assert_eq!(registry.select_models(&[Provider::Groq]), vec!["groq:llama-3-a"]);
}

fn caps_strategy() -> impl Strategy<Value = ModelCapabilities> {
    proptest::collection::vec(any::<bool>(), 6).prop_map(|flags| {
        Capability::ALL
            .into_iter()
            .zip(flags)
            .fold(ModelCapabilities::default(), |caps, (cap, on)| {
                caps.with(cap, on)
            })
    })
}

proptest! {
    #[test]
    fn gate_agrees_with_flags(
        caps in caps_strategy(),
        required in proptest::sample::subsequence(Capability::ALL.to_vec(), 0..=6),
    ) {
        let case = TestCase::new("t", "s", "p").requiring(required.iter().map(|c| c.as_str()));
        let expected = required.iter().all(|c| caps.supports(*c));
        prop_assert_eq!(can_run(&descriptor(caps), &case), expected);
    }
}

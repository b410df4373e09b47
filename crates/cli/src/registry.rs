// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Model registry and capability gate.
//!
//! The registry is a static table of known models. The gate compares a test
//! case's required capability names against a model's flags before any
//! completion call is attempted.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use crate::catalog::TestCase;
use crate::provider::Provider;

/// Errors from registry lookups
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Model {0} not found in registry")]
    NotFound(String),
}

/// A named model feature
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    Tools,
    FunctionCalling,
    JsonMode,
    SystemPrompt,
    Vision,
    Audio,
}

impl Capability {
    pub const ALL: [Capability; 6] = [
        Self::Tools,
        Self::FunctionCalling,
        Self::JsonMode,
        Self::SystemPrompt,
        Self::Vision,
        Self::Audio,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tools => "tools",
            Self::FunctionCalling => "function_calling",
            Self::JsonMode => "json_mode",
            Self::SystemPrompt => "system_prompt",
            Self::Vision => "vision",
            Self::Audio => "audio",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == name)
    }

    /// Column title: `function_calling` becomes `Function Calling`
    pub fn title(self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Capability flags of one model
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelCapabilities {
    pub tools: bool,
    pub function_calling: bool,
    pub json_mode: bool,
    pub system_prompt: bool,
    pub vision: bool,
    pub audio: bool,
}

impl Default for ModelCapabilities {
    fn default() -> Self {
        Self {
            tools: false,
            function_calling: false,
            json_mode: false,
            system_prompt: true,
            vision: false,
            audio: false,
        }
    }
}

impl ModelCapabilities {
    /// Every flag set
    pub fn all() -> Self {
        Self {
            tools: true,
            function_calling: true,
            json_mode: true,
            system_prompt: true,
            vision: true,
            audio: true,
        }
    }

    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Tools => self.tools,
            Capability::FunctionCalling => self.function_calling,
            Capability::JsonMode => self.json_mode,
            Capability::SystemPrompt => self.system_prompt,
            Capability::Vision => self.vision,
            Capability::Audio => self.audio,
        }
    }

    /// Look up a flag by name; unknown names are unsupported
    pub fn supports_named(&self, name: &str) -> bool {
        Capability::parse(name).is_some_and(|c| self.supports(c))
    }

    /// Builder-style toggle used by tests and the built-in table
    pub fn with(mut self, capability: Capability, enabled: bool) -> Self {
        let flag = match capability {
            Capability::Tools => &mut self.tools,
            Capability::FunctionCalling => &mut self.function_calling,
            Capability::JsonMode => &mut self.json_mode,
            Capability::SystemPrompt => &mut self.system_prompt,
            Capability::Vision => &mut self.vision,
            Capability::Audio => &mut self.audio,
        };
        *flag = enabled;
        self
    }
}

/// A registered model
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelDescriptor {
    pub identifier: String,
    pub provider: Provider,
    pub base_name: String,
    pub capabilities: ModelCapabilities,
}

impl ModelDescriptor {
    pub fn new(
        identifier: impl Into<String>,
        provider: Provider,
        base_name: impl Into<String>,
        capabilities: ModelCapabilities,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            provider,
            base_name: base_name.into(),
            capabilities,
        }
    }

    /// Model name as the provider's API expects it (identifier minus prefix)
    pub fn api_model(&self) -> &str {
        self.identifier
            .split_once(':')
            .map_or(self.identifier.as_str(), |(_, name)| name)
    }
}

/// Required capability names the model does not satisfy, in declaration order
pub fn missing_capabilities<'a>(
    descriptor: &ModelDescriptor,
    test_case: &'a TestCase,
) -> Vec<&'a str> {
    test_case
        .required_capabilities
        .iter()
        .map(String::as_str)
        .filter(|name| !descriptor.capabilities.supports_named(name))
        .collect()
}

/// Whether every required capability of `test_case` is satisfied
pub fn can_run(descriptor: &ModelDescriptor, test_case: &TestCase) -> bool {
    missing_capabilities(descriptor, test_case).is_empty()
}

/// Static table of known models keyed by identifier
#[derive(Clone, Debug, Default)]
pub struct ModelRegistry {
    models: BTreeMap<String, ModelDescriptor>,
    /// Preferred models per provider, in selection order
    latest: Vec<String>,
}

impl ModelRegistry {
    /// Build a registry from descriptors; every model counts as a selection candidate
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = ModelDescriptor>) -> Self {
        let mut registry = Self::default();
        for descriptor in descriptors {
            registry.latest.push(descriptor.identifier.clone());
            registry
                .models
                .insert(descriptor.identifier.clone(), descriptor);
        }
        registry
    }

    /// The models shipped with the harness
    pub fn builtin() -> Self {
        let full_tools = ModelCapabilities::default()
            .with(Capability::Tools, true)
            .with(Capability::FunctionCalling, true)
            .with(Capability::JsonMode, true);
        let json_only = ModelCapabilities::default().with(Capability::JsonMode, true);

        Self::from_descriptors([
            ModelDescriptor::new(
                "anthropic:claude-3-5-sonnet-latest",
                Provider::Anthropic,
                "claude-3-5-sonnet",
                full_tools.with(Capability::Vision, true),
            ),
            ModelDescriptor::new(
                "openai:gpt-4o",
                Provider::Openai,
                "gpt-4o",
                full_tools.with(Capability::Vision, true),
            ),
            ModelDescriptor::new(
                "google-gla:gemini-1.5-flash",
                Provider::GoogleGla,
                "gemini-1.5-flash",
                full_tools
                    .with(Capability::Vision, true)
                    .with(Capability::Audio, true),
            ),
            ModelDescriptor::new(
                "mistral:mistral-large-latest",
                Provider::Mistral,
                "mistral-large",
                full_tools,
            ),
            ModelDescriptor::new(
                "groq:deepseek-r1-distill-llama-70b-specdec",
                Provider::Groq,
                "deepseek-r1-distill-llama-70b",
                json_only,
            ),
            ModelDescriptor::new(
                "groq:qwen-2.5-coder-32b",
                Provider::Groq,
                "qwen-2.5-coder",
                json_only,
            ),
        ])
    }

    pub fn lookup(&self, identifier: &str) -> Result<&ModelDescriptor, RegistryError> {
        self.models
            .get(identifier)
            .ok_or_else(|| RegistryError::NotFound(identifier.to_string()))
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.models.contains_key(identifier)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Models to test for the given providers.
    ///
    /// Walks the preferred list, keeps models whose provider is available,
    /// drops later models that share a base name with an earlier pick, and
    /// returns the result sorted by identifier.
    pub fn select_models(&self, providers: &[Provider]) -> Vec<String> {
        let mut seen_base_names = BTreeSet::new();
        let mut selected: Vec<String> = self
            .latest
            .iter()
            .filter_map(|id| self.models.get(id))
            .filter(|d| providers.contains(&d.provider))
            .filter(|d| seen_base_names.insert(d.base_name.clone()))
            .map(|d| d.identifier.clone())
            .collect();
        selected.sort();
        selected
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Supported providers, their API key variables, and availability.

use clap::ValueEnum;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::env;

/// An LLM provider the harness knows how to reach
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Provider {
    Anthropic,
    Openai,
    GoogleGla,
    GoogleVertex,
    Mistral,
    Fireworks,
    Groq,
    Cohere,
    Openrouter,
}

/// Grouping used by the provider status listing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProviderCategory {
    Major,
    Additional,
    Meta,
}

impl ProviderCategory {
    pub const ALL: [ProviderCategory; 3] = [Self::Major, Self::Additional, Self::Meta];

    pub fn title(self) -> &'static str {
        match self {
            Self::Major => "Major Providers",
            Self::Additional => "Additional Providers",
            Self::Meta => "Meta Providers",
        }
    }
}

impl Provider {
    pub const ALL: [Provider; 9] = [
        Self::Anthropic,
        Self::Openai,
        Self::GoogleGla,
        Self::GoogleVertex,
        Self::Mistral,
        Self::Fireworks,
        Self::Groq,
        Self::Cohere,
        Self::Openrouter,
    ];

    /// Prefix used in model identifiers (`<prefix>:<model>`)
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::Openai => "openai",
            Self::GoogleGla => "google-gla",
            Self::GoogleVertex => "google-vertex",
            Self::Mistral => "mistral",
            Self::Fireworks => "fireworks",
            Self::Groq => "groq",
            Self::Cohere => "cohere",
            Self::Openrouter => "openrouter",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == name)
    }

    /// Environment variable holding this provider's API key.
    ///
    /// Both Google providers share `GEMINI_API_KEY`.
    pub fn api_key_env(self) -> &'static str {
        match self {
            Self::Anthropic => env::ANTHROPIC_API_KEY,
            Self::Openai => env::OPENAI_API_KEY,
            Self::GoogleGla | Self::GoogleVertex => env::GEMINI_API_KEY,
            Self::Mistral => env::MISTRAL_API_KEY,
            Self::Fireworks => env::FIREWORKS_API_KEY,
            Self::Groq => env::GROQ_API_KEY,
            Self::Cohere => env::COHERE_API_KEY,
            Self::Openrouter => env::OPENROUTER_API_KEY,
        }
    }

    pub fn category(self) -> ProviderCategory {
        match self {
            Self::Anthropic | Self::Openai | Self::GoogleGla | Self::GoogleVertex => {
                ProviderCategory::Major
            }
            Self::Mistral | Self::Fireworks | Self::Groq | Self::Cohere => {
                ProviderCategory::Additional
            }
            Self::Openrouter => ProviderCategory::Meta,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// API keys found for each provider.
///
/// Presence decides availability; a missing key never fails anything here.
#[derive(Clone, Debug, Default)]
pub struct ProviderKeys {
    keys: BTreeMap<Provider, SecretString>,
}

impl ProviderKeys {
    /// Read every provider's key from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(env::non_blank)
    }

    /// Build from an arbitrary lookup; blank values count as absent
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let keys = Provider::ALL
            .into_iter()
            .filter_map(|p| {
                lookup(p.api_key_env())
                    .filter(|v| !v.trim().is_empty())
                    .map(|v| (p, SecretString::from(v)))
            })
            .collect();
        Self { keys }
    }

    /// Add or replace a key
    pub fn with_key(mut self, provider: Provider, key: impl Into<String>) -> Self {
        self.keys.insert(provider, SecretString::from(key.into()));
        self
    }

    pub fn get(&self, provider: Provider) -> Option<&SecretString> {
        self.keys.get(&provider)
    }

    pub fn is_available(&self, provider: Provider) -> bool {
        self.keys.contains_key(&provider)
    }

    /// Providers with a key, in declaration order
    pub fn available(&self) -> Vec<Provider> {
        self.keys.keys().copied().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keep only the listed providers (`--providers`)
    pub fn restrict_to(&mut self, providers: &[Provider]) {
        self.keys.retain(|p, _| providers.contains(p));
    }
}

/// Render the provider status listing shown by `--list-providers`
pub fn render_status(keys: &ProviderKeys) -> String {
    let mut out = String::new();

    if keys.is_empty() {
        out.push_str("WARNING: No API keys found for any providers!\n");
        out.push_str("Please set at least one of the following environment variables:\n");
        for provider in Provider::ALL {
            out.push_str(&format!(
                "  • {} for {}\n",
                provider.api_key_env(),
                provider
            ));
        }
        return out;
    }

    out.push_str("Provider Status:\n");
    out.push_str(&"=".repeat(50));
    out.push('\n');

    for category in ProviderCategory::ALL {
        out.push_str(&format!("\n{}:\n", category.title()));
        for provider in Provider::ALL.into_iter().filter(|p| p.category() == category) {
            let available = keys.is_available(provider);
            let status = if available { "✓" } else { "✗" };
            out.push_str(&format!(
                "  {} {:<15} ({})\n",
                status,
                provider.as_str(),
                provider.api_key_env()
            ));
            if !available {
                match provider {
                    Provider::Groq => out.push_str(
                        "    Note: GROQ can provide fast access to some open-weight models\n",
                    ),
                    Provider::Openrouter => out.push_str(
                        "    Note: OpenRouter can provide access to most major models\n",
                    ),
                    _ => {}
                }
            }
        }
    }

    let missing = |p: Provider| !keys.is_available(p);
    if missing(Provider::Anthropic) && missing(Provider::Openrouter) {
        out.push_str(
            "\nNo access to Claude models (need either ANTHROPIC_API_KEY or OPENROUTER_API_KEY)\n",
        );
    }
    if missing(Provider::Openai) && missing(Provider::Openrouter) {
        out.push_str(
            "\nNo access to GPT models (need either OPENAI_API_KEY or OPENROUTER_API_KEY)\n",
        );
    }
    if missing(Provider::GoogleGla) {
        out.push_str("\nNo access to Gemini models (need GEMINI_API_KEY)\n");
    }
    if missing(Provider::Mistral) && missing(Provider::Groq) {
        out.push_str(
            "\nNo access to Mistral models (need either MISTRAL_API_KEY or GROQ_API_KEY)\n",
        );
    }

    out
}

#[cfg(test)]
#[path = "provider_tests.rs"]
mod tests;

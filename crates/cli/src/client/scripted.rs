// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Script-driven completion client.
//!
//! A script is a TOML or JSON file of ordered rules. Each rule may narrow by
//! model glob, matches the user prompt with a [`PatternSpec`], and answers
//! with text or an injected [`FailureSpec`]. The first eligible rule wins;
//! `default_response` covers everything else.
//!
//! ```toml
//! name = "smoke"
//! default_response = "# Answer\n\n* done"
//!
//! [[rules]]
//! model = "groq:*"
//! pattern = { type = "contains", text = "binary search tree" }
//! failure = { type = "rate_limit", retry_after = 30 }
//! ```

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use super::{CompletionClient, CompletionError, CompletionRequest};
use crate::time::{Clock, ClockHandle};

/// Errors that can occur when loading a script
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("Failed to read script file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid regex pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Top-level script file
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptConfig {
    /// Name for logging
    #[serde(default)]
    pub name: String,

    /// Response when no rule matches
    #[serde(default)]
    pub default_response: Option<ResponseSpec>,

    /// Ordered rules; first match wins
    #[serde(default)]
    pub rules: Vec<ScriptRule>,
}

/// A single rule
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptRule {
    /// Glob over the full model identifier; absent matches every model
    #[serde(default)]
    pub model: Option<String>,

    /// Pattern over the user prompt
    #[serde(default)]
    pub pattern: PatternSpec,

    /// Optional when `failure` is set
    #[serde(default)]
    pub response: Option<ResponseSpec>,

    #[serde(default)]
    pub failure: Option<FailureSpec>,

    /// How many times this rule can match (None = unlimited)
    #[serde(default)]
    pub max_matches: Option<u32>,
}

/// Pattern specification for matching prompts
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PatternSpec {
    Exact {
        text: String,
    },
    Regex {
        pattern: String,
    },
    /// Shell-style wildcards
    Glob {
        pattern: String,
    },
    Contains {
        text: String,
    },
    #[default]
    Any,
}

/// Response specification
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ResponseSpec {
    Simple(String),
    Detailed {
        text: String,
        /// Delay before responding (ms)
        #[serde(default)]
        delay_ms: Option<u64>,
    },
}

impl ResponseSpec {
    pub fn text(&self) -> &str {
        match self {
            Self::Simple(text) | Self::Detailed { text, .. } => text,
        }
    }

    pub fn delay(&self) -> Option<Duration> {
        match self {
            Self::Simple(_) => None,
            Self::Detailed { delay_ms, .. } => delay_ms.map(Duration::from_millis),
        }
    }
}

/// Injected failure
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FailureSpec {
    NetworkUnreachable,
    ConnectionTimeout { after_ms: u64 },
    AuthError { message: String },
    RateLimit { retry_after: u64 },
    MalformedResponse { raw: String },
    /// Never answer; the caller's timeout decides
    Hang,
}

impl FailureSpec {
    fn into_error(self) -> CompletionError {
        match self {
            Self::NetworkUnreachable => {
                CompletionError::Network("Could not resolve host".to_string())
            }
            Self::ConnectionTimeout { after_ms } => {
                CompletionError::Timeout(Duration::from_millis(after_ms))
            }
            Self::AuthError { message } => CompletionError::Api {
                status: 401,
                message,
            },
            Self::RateLimit { retry_after } => CompletionError::Api {
                status: 429,
                message: format!("Rate limited. Retry after {} seconds.", retry_after),
            },
            Self::MalformedResponse { raw } => CompletionError::MalformedResponse(raw),
            Self::Hang => CompletionError::Network("connection dropped".to_string()),
        }
    }
}

/// What a script decided for one request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Text { text: String, delay: Option<Duration> },
    Failure(FailureSpec),
}

type Matcher = Arc<dyn Fn(&str) -> bool + Send + Sync>;

struct CompiledRule {
    model: Option<glob::Pattern>,
    prompt: Matcher,
}

/// Compiled script ready for matching
pub struct Script {
    config: ScriptConfig,
    compiled: Vec<CompiledRule>,
    match_counts: Vec<u32>,
}

impl std::fmt::Debug for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Script")
            .field("name", &self.config.name)
            .field("rules", &self.config.rules.len())
            .field("match_counts", &self.match_counts)
            .finish_non_exhaustive()
    }
}

impl Script {
    /// Load a script from a TOML or JSON file (by extension)
    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let content = std::fs::read_to_string(path)?;
        let config: ScriptConfig = if path.extension().is_some_and(|e| e == "json") {
            serde_json::from_str(&content)?
        } else {
            toml::from_str(&content)?
        };
        Self::from_config(config)
    }

    pub fn from_config(config: ScriptConfig) -> Result<Self, ScriptError> {
        let mut compiled = Vec::with_capacity(config.rules.len());
        for (idx, rule) in config.rules.iter().enumerate() {
            if rule.response.is_none() && rule.failure.is_none() {
                return Err(ScriptError::Validation(format!(
                    "rule {} has neither a response nor a failure",
                    idx + 1
                )));
            }
            let model = rule
                .model
                .as_deref()
                .map(glob::Pattern::new)
                .transpose()?;
            compiled.push(CompiledRule {
                model,
                prompt: compile_pattern(&rule.pattern)?,
            });
        }
        let match_counts = vec![0; config.rules.len()];
        Ok(Self {
            config,
            compiled,
            match_counts,
        })
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Pick the reply for a request, counting the match
    pub fn reply_for(&mut self, model: &str, prompt: &str) -> Option<Reply> {
        for (idx, compiled) in self.compiled.iter().enumerate() {
            let rule = &self.config.rules[idx];
            if rule
                .max_matches
                .is_some_and(|max| self.match_counts[idx] >= max)
            {
                continue;
            }
            if compiled.model.as_ref().is_some_and(|g| !g.matches(model)) {
                continue;
            }
            if !(compiled.prompt)(prompt) {
                continue;
            }

            self.match_counts[idx] += 1;
            if let Some(failure) = &rule.failure {
                return Some(Reply::Failure(failure.clone()));
            }
            return rule.response.as_ref().map(reply_text);
        }

        self.config.default_response.as_ref().map(reply_text)
    }
}

fn reply_text(spec: &ResponseSpec) -> Reply {
    Reply::Text {
        text: spec.text().to_string(),
        delay: spec.delay(),
    }
}

fn compile_pattern(spec: &PatternSpec) -> Result<Matcher, ScriptError> {
    match spec {
        PatternSpec::Exact { text } => {
            let text = text.clone();
            Ok(Arc::new(move |prompt| prompt == text))
        }
        PatternSpec::Regex { pattern } => {
            let re = regex::Regex::new(pattern)?;
            Ok(Arc::new(move |prompt| re.is_match(prompt)))
        }
        PatternSpec::Glob { pattern } => {
            let glob = glob::Pattern::new(pattern)?;
            Ok(Arc::new(move |prompt| glob.matches(prompt)))
        }
        PatternSpec::Contains { text } => {
            let text = text.clone();
            Ok(Arc::new(move |prompt| prompt.contains(&text)))
        }
        PatternSpec::Any => Ok(Arc::new(|_| true)),
    }
}

/// Completion client that answers from a [`Script`]
pub struct ScriptedClient {
    script: Mutex<Script>,
    clock: ClockHandle,
}

impl ScriptedClient {
    pub fn new(script: Script, clock: ClockHandle) -> Self {
        Self {
            script: Mutex::new(script),
            clock,
        }
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, CompletionError> {
        request.split_model()?;
        let reply = self
            .script
            .lock()
            .reply_for(request.model, request.user_prompt);

        match reply {
            Some(Reply::Text { text, delay }) => {
                if let Some(delay) = delay {
                    self.clock.sleep(delay).await;
                }
                Ok(text)
            }
            Some(Reply::Failure(FailureSpec::Hang)) => {
                futures::future::pending::<()>().await;
                Err(FailureSpec::Hang.into_error())
            }
            Some(Reply::Failure(failure)) => {
                if let FailureSpec::ConnectionTimeout { after_ms } = failure {
                    self.clock.sleep(Duration::from_millis(after_ms)).await;
                }
                Err(failure.into_error())
            }
            None => Err(CompletionError::Unscripted(
                request.user_prompt.chars().take(60).collect(),
            )),
        }
    }
}

#[cfg(test)]
#[path = "scripted_tests.rs"]
mod tests;

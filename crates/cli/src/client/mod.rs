// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Completion client boundary.
//!
//! The runner only sees [`CompletionClient`]: a model identifier, a prompt
//! pair and an explicit credential go in, text or a [`CompletionError`] comes
//! out. [`http::HttpCompletionClient`] talks to the real provider APIs and
//! [`scripted::ScriptedClient`] answers from a script file.

pub mod http;
pub mod scripted;

use async_trait::async_trait;
use modeltest_capture::{CallLog, CapturedOutcome, CapturedRequest};
use secrecy::SecretString;
use std::time::Duration;
use thiserror::Error;

pub use http::HttpCompletionClient;
pub use scripted::{Script, ScriptError, ScriptedClient};

/// Errors a completion call can end with
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("No API key configured for provider '{0}'")]
    MissingCredential(String),

    #[error("Provider '{0}' is not supported by this client")]
    UnsupportedProvider(String),

    #[error("Invalid model identifier '{0}': expected <provider>:<model>")]
    InvalidModel(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("timed out after {:?}", .0)]
    Timeout(Duration),

    #[error("No scripted response for prompt: {0}")]
    Unscripted(String),
}

impl CompletionError {
    /// Short machine-readable category, used in call captures
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredential(_) | Self::UnsupportedProvider(_) | Self::InvalidModel(_) => {
                "config"
            }
            Self::Http(_) | Self::Network(_) => "network",
            Self::Api { status: 401, .. } | Self::Api { status: 403, .. } => "auth",
            Self::Api { status: 429, .. } => "rate_limit",
            Self::Api { .. } => "api",
            Self::MalformedResponse(_) => "malformed",
            Self::Timeout(_) => "timeout",
            Self::Unscripted(_) => "unscripted",
        }
    }
}

/// One completion request
#[derive(Clone, Copy, Debug)]
pub struct CompletionRequest<'a> {
    /// Full identifier, `<provider>:<model>`
    pub model: &'a str,
    pub system_prompt: &'a str,
    pub user_prompt: &'a str,
    /// Key for the model's provider, if one was configured
    pub credential: Option<&'a SecretString>,
}

impl CompletionRequest<'_> {
    /// Split the identifier into provider prefix and API model name
    pub fn split_model(&self) -> Result<(&str, &str), CompletionError> {
        match self.model.split_once(':') {
            Some((provider, name)) if !provider.is_empty() && !name.is_empty() => {
                Ok((provider, name))
            }
            _ => Err(CompletionError::InvalidModel(self.model.to_string())),
        }
    }
}

/// Turns a prompt pair into model output
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, CompletionError>;
}

#[async_trait]
impl<C: CompletionClient + ?Sized> CompletionClient for std::sync::Arc<C> {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, CompletionError> {
        (**self).complete(request).await
    }
}

/// Client wrapper that records every call in a [`CallLog`]
pub struct Captured<C> {
    inner: C,
    log: CallLog,
}

impl<C: CompletionClient> Captured<C> {
    pub fn new(inner: C, log: CallLog) -> Self {
        Self { inner, log }
    }

    pub fn log(&self) -> &CallLog {
        &self.log
    }
}

#[async_trait]
impl<C: CompletionClient> CompletionClient for Captured<C> {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, CompletionError> {
        let result = self.inner.complete(request).await;
        let outcome = match &result {
            Ok(text) => CapturedOutcome::Response { text: text.clone() },
            Err(e) => CapturedOutcome::Failure {
                kind: e.kind().to_string(),
                message: e.to_string(),
            },
        };
        self.log.record(
            CapturedRequest::new(request.model, request.system_prompt, request.user_prompt),
            outcome,
        );
        result
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

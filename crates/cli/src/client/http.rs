// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! HTTP completion client for the real provider APIs.
//!
//! Three wire formats cover the supported providers: the Anthropic Messages
//! API, OpenAI-compatible chat completions, and Gemini `generateContent`.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{CompletionClient, CompletionError, CompletionRequest};
use crate::provider::Provider;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4096;

/// Which request/response shape a provider speaks
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WireFormat {
    Anthropic,
    OpenAiCompatible,
    Gemini,
}

/// Wire format and default base URL for a provider
pub fn endpoint_for(provider: Provider) -> Option<(WireFormat, &'static str)> {
    match provider {
        Provider::Anthropic => Some((WireFormat::Anthropic, "https://api.anthropic.com/v1")),
        Provider::Openai => Some((WireFormat::OpenAiCompatible, "https://api.openai.com/v1")),
        Provider::Groq => Some((WireFormat::OpenAiCompatible, "https://api.groq.com/openai/v1")),
        Provider::Mistral => Some((WireFormat::OpenAiCompatible, "https://api.mistral.ai/v1")),
        Provider::Fireworks => Some((
            WireFormat::OpenAiCompatible,
            "https://api.fireworks.ai/inference/v1",
        )),
        Provider::Openrouter => {
            Some((WireFormat::OpenAiCompatible, "https://openrouter.ai/api/v1"))
        }
        Provider::Cohere => Some((
            WireFormat::OpenAiCompatible,
            "https://api.cohere.ai/compatibility/v1",
        )),
        Provider::GoogleGla => Some((
            WireFormat::Gemini,
            "https://generativelanguage.googleapis.com/v1beta",
        )),
        // Vertex needs OAuth service credentials, not an API key.
        Provider::GoogleVertex => None,
    }
}

/// Completion client backed by `reqwest`
#[derive(Clone, Debug)]
pub struct HttpCompletionClient {
    http: reqwest::Client,
    base_urls: BTreeMap<Provider, String>,
}

impl HttpCompletionClient {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self {
            http,
            base_urls: BTreeMap::new(),
        }
    }

    /// Point one provider at a different base URL (proxies, test servers)
    pub fn with_base_url(mut self, provider: Provider, url: impl Into<String>) -> Self {
        self.base_urls.insert(provider, url.into());
        self
    }

    fn base_url(&self, provider: Provider, default: &'static str) -> String {
        self.base_urls
            .get(&provider)
            .cloned()
            .unwrap_or_else(|| default.to_string())
            .trim_end_matches('/')
            .to_string()
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        url: &str,
        headers: HeaderMap,
        body: &B,
    ) -> Result<serde_json::Value, CompletionError> {
        let response = self.http.post(url).headers(headers).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        serde_json::from_str(&text).map_err(|e| CompletionError::MalformedResponse(e.to_string()))
    }

    async fn anthropic(
        &self,
        base: &str,
        key: &SecretString,
        model: &str,
        request: &CompletionRequest<'_>,
    ) -> Result<String, CompletionError> {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", header_value(key)?);
        headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let body = AnthropicRequest {
            model,
            max_tokens: MAX_TOKENS,
            system: request.system_prompt,
            messages: vec![ChatMessage {
                role: "user",
                content: request.user_prompt,
            }],
        };
        let value = self
            .send(&format!("{}/messages", base), headers, &body)
            .await?;
        let parsed: AnthropicResponse = parse(value)?;

        let text: String = parsed
            .content
            .into_iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text)
            .collect();
        non_empty(text)
    }

    async fn openai_compatible(
        &self,
        base: &str,
        key: &SecretString,
        model: &str,
        request: &CompletionRequest<'_>,
    ) -> Result<String, CompletionError> {
        let mut headers = HeaderMap::new();
        let bearer = SecretString::from(format!("Bearer {}", key.expose_secret()));
        headers.insert(reqwest::header::AUTHORIZATION, header_value(&bearer)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let body = ChatRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: request.user_prompt,
                },
            ],
        };
        let value = self
            .send(&format!("{}/chat/completions", base), headers, &body)
            .await?;
        let parsed: ChatResponse = parse(value)?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();
        non_empty(content)
    }

    async fn gemini(
        &self,
        base: &str,
        key: &SecretString,
        model: &str,
        request: &CompletionRequest<'_>,
    ) -> Result<String, CompletionError> {
        let mut headers = HeaderMap::new();
        headers.insert("x-goog-api-key", header_value(key)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let body = serde_json::json!({
            "systemInstruction": { "parts": [{ "text": request.system_prompt }] },
            "contents": [{ "role": "user", "parts": [{ "text": request.user_prompt }] }],
        });
        let value = self
            .send(
                &format!("{}/models/{}:generateContent", base, model),
                headers,
                &body,
            )
            .await?;
        let parsed: GeminiResponse = parse(value)?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| c.content.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        non_empty(text)
    }
}

impl Default for HttpCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, CompletionError> {
        let (prefix, model) = request.split_model()?;
        let provider = Provider::parse(prefix)
            .ok_or_else(|| CompletionError::UnsupportedProvider(prefix.to_string()))?;
        let (format, default_base) = endpoint_for(provider)
            .ok_or_else(|| CompletionError::UnsupportedProvider(prefix.to_string()))?;
        let key = request
            .credential
            .ok_or_else(|| CompletionError::MissingCredential(prefix.to_string()))?;
        let base = self.base_url(provider, default_base);

        tracing::debug!(provider = prefix, model, ?format, "sending completion request");
        match format {
            WireFormat::Anthropic => self.anthropic(&base, key, model, &request).await,
            WireFormat::OpenAiCompatible => {
                self.openai_compatible(&base, key, model, &request).await
            }
            WireFormat::Gemini => self.gemini(&base, key, model, &request).await,
        }
    }
}

fn header_value(secret: &SecretString) -> Result<HeaderValue, CompletionError> {
    let mut value = HeaderValue::from_str(secret.expose_secret())
        .map_err(|_| CompletionError::MissingCredential("invalid characters in API key".into()))?;
    value.set_sensitive(true);
    Ok(value)
}

fn parse<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> Result<T, CompletionError> {
    serde_json::from_value(value).map_err(|e| CompletionError::MalformedResponse(e.to_string()))
}

fn non_empty(text: String) -> Result<String, CompletionError> {
    if text.is_empty() {
        Err(CompletionError::MalformedResponse(
            "response contained no text".to_string(),
        ))
    } else {
        Ok(text)
    }
}

/// Pull `error.message` (or `message`) out of an error body, else the raw text
fn error_message(body: &str) -> String {
    let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
    let message = parsed.as_ref().and_then(|v| {
        v.pointer("/error/message")
            .or_else(|| v.get("message"))
            .and_then(|m| m.as_str())
            .map(str::to_string)
    });
    message.unwrap_or_else(|| body.chars().take(200).collect())
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicBlock>,
}

#[derive(Deserialize)]
struct AnthropicBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: Option<String>,
}

#[cfg(test)]
#[path = "http_tests.rs"]
mod tests;

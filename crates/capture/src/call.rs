// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Captured completion call records.

use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// One completion call as seen by the client
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CapturedCall {
    /// Sequence number within the log
    pub seq: u64,

    /// Wall-clock timestamp when the call finished
    pub timestamp: SystemTime,

    /// Milliseconds since the log was created
    pub elapsed_ms: u64,

    /// What was sent
    pub request: CapturedRequest,

    /// What came back
    pub outcome: CapturedOutcome,
}

/// Request half of a completion call
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
}

impl CapturedRequest {
    pub fn new(
        model: impl Into<String>,
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
        }
    }
}

/// Outcome half of a completion call
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CapturedOutcome {
    Response { text: String },
    Failure { kind: String, message: String },
}

impl CapturedOutcome {
    /// Whether the call produced a response
    pub fn is_response(&self) -> bool {
        matches!(self, Self::Response { .. })
    }
}

#[cfg(test)]
#[path = "call_tests.rs"]
mod tests;

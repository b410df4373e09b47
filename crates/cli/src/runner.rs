// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Test execution.
//!
//! [`TestRunner::run_one`] turns one (model, case) pair into a
//! [`TestResult`] and never fails on a completion error; only an unknown
//! model is fatal, and only to that model's batch. [`TestRunner::run_models`]
//! fans batches out over a tokio `JoinSet` bounded by a semaphore.

use chrono::{DateTime, Utc};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::catalog::TestCase;
use crate::client::{CompletionClient, CompletionError, CompletionRequest};
use crate::history::{HistoryMap, ModelHistory};
use crate::provider::ProviderKeys;
use crate::registry::{missing_capabilities, ModelRegistry, RegistryError};
use crate::time::{Clock, ClockHandle};

/// Floor applied to every recorded duration, in seconds
pub const MIN_DURATION: f64 = 0.001;

/// Delay between consecutive cases of one model
pub const DEFAULT_COOLDOWN: Duration = Duration::from_millis(500);

/// Batches in flight when running concurrently
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Outcome of one (model, case) execution
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub model: String,
    pub test_case: String,
    pub success: bool,
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    /// Seconds, never below [`MIN_DURATION`]
    pub duration: f64,
    pub timestamp: DateTime<Utc>,
}

impl TestResult {
    pub fn passed(
        model: &str,
        test_case: &str,
        response: String,
        duration: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            model: model.to_string(),
            test_case: test_case.to_string(),
            success: true,
            response: Some(response),
            error: None,
            duration: duration.max(MIN_DURATION),
            timestamp,
        }
    }

    pub fn failed(
        model: &str,
        test_case: &str,
        error: String,
        duration: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            model: model.to_string(),
            test_case: test_case.to_string(),
            success: false,
            response: None,
            error: Some(error),
            duration: duration.max(MIN_DURATION),
            timestamp,
        }
    }

    /// Response text, empty for failures
    pub fn response_text(&self) -> &str {
        self.response.as_deref().unwrap_or("")
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Everything one model's batch produced
#[derive(Clone, Debug)]
pub struct BatchOutcome {
    pub model: String,
    pub results: Vec<TestResult>,
    pub history: ModelHistory,
}

/// Executes test cases against models through a [`CompletionClient`]
#[derive(Clone)]
pub struct TestRunner {
    registry: Arc<ModelRegistry>,
    client: Arc<dyn CompletionClient>,
    keys: Arc<ProviderKeys>,
    clock: ClockHandle,
    cooldown: Duration,
}

impl TestRunner {
    pub fn new(
        registry: Arc<ModelRegistry>,
        client: Arc<dyn CompletionClient>,
        keys: ProviderKeys,
        clock: ClockHandle,
    ) -> Self {
        Self {
            registry,
            client,
            keys: Arc::new(keys),
            clock,
            cooldown: DEFAULT_COOLDOWN,
        }
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Run one case; completion failures become failed results
    pub async fn run_one(&self, model: &str, case: &TestCase) -> Result<TestResult, RunnerError> {
        let descriptor = self.registry.lookup(model)?;

        let missing = missing_capabilities(descriptor, case);
        if !missing.is_empty() {
            tracing::warn!(
                model,
                case = %case.name,
                missing = %missing.join(", "),
                "skipping case, model lacks capabilities"
            );
            return Ok(TestResult::failed(
                model,
                &case.name,
                format!(
                    "Model lacks required capabilities: {}",
                    missing.join(", ")
                ),
                MIN_DURATION,
                self.clock.now(),
            ));
        }

        tracing::info!(model, case = %case.name, "running");
        let request = CompletionRequest {
            model,
            system_prompt: &case.system_prompt,
            user_prompt: &case.prompt,
            credential: self.keys.get(descriptor.provider),
        };

        let start = self.clock.now();
        let outcome = match tokio::time::timeout(case.timeout, self.client.complete(request)).await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(CompletionError::Timeout(case.timeout)),
        };
        let duration = self.clock.secs_since(start);
        let timestamp = self.clock.now();

        Ok(match outcome {
            Ok(response) => {
                tracing::info!(model, case = %case.name, "passed in {:.1}s", duration);
                TestResult::passed(model, &case.name, response, duration, timestamp)
            }
            Err(e) => {
                tracing::warn!(model, case = %case.name, error = %e, "failed in {:.1}s", duration);
                TestResult::failed(model, &case.name, e.to_string(), duration, timestamp)
            }
        })
    }

    /// Run every case in order, folding each result into `history`
    pub async fn run_all(
        &self,
        model: &str,
        cases: &[TestCase],
        history: &mut ModelHistory,
    ) -> Result<Vec<TestResult>, RunnerError> {
        self.registry.lookup(model)?;

        let mut results = Vec::with_capacity(cases.len());
        for (idx, case) in cases.iter().enumerate() {
            if idx > 0 && !self.cooldown.is_zero() {
                self.clock.sleep(self.cooldown).await;
            }
            let result = self.run_one(model, case).await?;
            history.record(&result);
            results.push(result);
        }
        Ok(results)
    }

    /// One model's batch, owning its history
    pub async fn run_batch(
        &self,
        model: String,
        cases: Arc<[TestCase]>,
        history: Option<ModelHistory>,
    ) -> Result<BatchOutcome, RunnerError> {
        let descriptor = self.registry.lookup(&model)?;
        let mut history = history.unwrap_or_else(|| ModelHistory::new(descriptor));
        let results = self.run_all(&model, &cases, &mut history).await?;
        Ok(BatchOutcome {
            model,
            results,
            history,
        })
    }

    /// Run batches for `models`, at most `max_concurrency` at a time.
    ///
    /// Each task works on a copy of its model's history; the copy replaces
    /// the entry in `histories` only when the batch completes. Failed or
    /// panicked batches are logged and left out of the returned map.
    pub async fn run_models(
        &self,
        models: &[String],
        cases: Arc<[TestCase]>,
        histories: &mut HistoryMap,
        max_concurrency: usize,
    ) -> BTreeMap<String, Vec<TestResult>> {
        let semaphore = Arc::new(Semaphore::new(max_concurrency.max(1)));
        let mut tasks = JoinSet::new();

        for model in models {
            let runner = self.clone();
            let semaphore = Arc::clone(&semaphore);
            let cases = Arc::clone(&cases);
            let history = histories.get(model).cloned();
            let model = model.clone();

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let outcome = AssertUnwindSafe(runner.run_batch(model.clone(), cases, history))
                    .catch_unwind()
                    .await;
                (model, outcome)
            });
        }

        let mut results = BTreeMap::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(Ok(batch)))) => {
                    histories.insert(batch.model.clone(), batch.history);
                    results.insert(batch.model, batch.results);
                }
                Ok((model, Ok(Err(e)))) => {
                    tracing::error!(model = %model, error = %e, "batch failed");
                }
                Ok((model, Err(panic))) => {
                    tracing::error!(model = %model, panic = %panic_message(&*panic), "batch panicked");
                }
                Err(e) => {
                    tracing::error!(error = %e, "batch task did not complete");
                }
            }
        }
        results
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;

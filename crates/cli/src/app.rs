// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command dispatch for the `modeltest` binary.

use modeltest_capture::CallLog;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::catalog::TestCase;
use crate::cli::Cli;
use crate::client::{
    Captured, CompletionClient, HttpCompletionClient, Script, ScriptError, ScriptedClient,
};
use crate::diagnostic::print_warning;
use crate::help::render_verbose_help;
use crate::history::{render_history, HistoryError, HistoryMap, HistoryStore};
use crate::provider::{render_status, ProviderKeys};
use crate::registry::ModelRegistry;
use crate::report::{self, ResultSet};
use crate::runner::{TestResult, TestRunner, DEFAULT_COOLDOWN};
use crate::time::{Clock, ClockHandle};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("No API keys found for the selected providers; see --list-providers")]
    NoKeys,

    #[error("No models available for testing with current API keys")]
    NoModels,

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error("Failed to load script: {0}")]
    Script(#[from] ScriptError),

    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Which command the arguments select
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    RunTests,
    ListProviders,
    ShowHistory,
    HelpVerbose,
}

impl Command {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.run_tests {
            Self::RunTests
        } else if cli.list_providers {
            Self::ListProviders
        } else if cli.show_history {
            Self::ShowHistory
        } else {
            Self::HelpVerbose
        }
    }
}

/// Everything a command needs, resolved once at startup
pub struct App {
    cli: Cli,
    keys: ProviderKeys,
    registry: Arc<ModelRegistry>,
    clock: ClockHandle,
    cooldown: Duration,
}

impl App {
    pub fn new(cli: Cli, keys: ProviderKeys, registry: ModelRegistry, clock: ClockHandle) -> Self {
        Self {
            cli,
            keys,
            registry: Arc::new(registry),
            clock,
            cooldown: DEFAULT_COOLDOWN,
        }
    }

    /// Keys and cool-down from the environment, built-in registry, system clock
    pub fn from_env(cli: Cli) -> Self {
        let cooldown = crate::env::cooldown_ms()
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_COOLDOWN);
        Self::new(
            cli,
            ProviderKeys::from_env(),
            ModelRegistry::builtin(),
            ClockHandle::system(),
        )
        .with_cooldown(cooldown)
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub async fn run<W: Write>(&self, out: &mut W) -> Result<(), AppError> {
        match Command::from_cli(&self.cli) {
            Command::HelpVerbose => write!(out, "{}", render_verbose_help())?,
            Command::ListProviders => writeln!(out, "{}", render_status(&self.keys))?,
            Command::ShowHistory => {
                let histories = self.history_store().load(&self.registry)?;
                write!(out, "{}", render_history(&histories))?;
            }
            Command::RunTests => self.run_tests(out).await?,
        }
        Ok(())
    }

    fn history_store(&self) -> HistoryStore {
        HistoryStore::in_dir(&self.cli.output_dir())
    }

    fn build_client(&self) -> Result<Arc<dyn CompletionClient>, AppError> {
        let client: Arc<dyn CompletionClient> = match &self.cli.script {
            Some(path) => {
                let script = Script::load(path)?;
                tracing::info!(script = %script.name(), path = %path.display(), "using scripted responses");
                Arc::new(ScriptedClient::new(script, self.clock.clone()))
            }
            None => Arc::new(HttpCompletionClient::new()),
        };

        match &self.cli.capture {
            Some(path) => Ok(Arc::new(Captured::new(client, CallLog::with_file(path)?))),
            None => Ok(client),
        }
    }

    /// Models to test, honoring `--failed-only`
    fn select_models(&self, keys: &ProviderKeys, histories: &HistoryMap) -> Vec<String> {
        let mut models = self.registry.select_models(&keys.available());
        if self.cli.failed_only {
            models.retain(|m| histories.get(m).is_some_and(|h| h.failure_count > 0));
        }
        models
    }

    async fn run_tests<W: Write>(&self, out: &mut W) -> Result<(), AppError> {
        let mut keys = self.keys.clone();
        if !self.cli.providers.is_empty() {
            keys.restrict_to(&self.cli.providers);
        }
        writeln!(out, "{}", render_status(&keys))?;
        if keys.is_empty() {
            return Err(AppError::NoKeys);
        }

        let output_dir = self.cli.output_dir();
        let store = HistoryStore::in_dir(&output_dir);
        let mut histories = store.load(&self.registry)?;

        let models = self.select_models(&keys, &histories);
        if models.is_empty() {
            return Err(AppError::NoModels);
        }

        writeln!(out, "Preparing to test {} models:", models.len())?;
        for model in &models {
            writeln!(out, "  • {}", model)?;
        }
        let descriptors: Vec<_> = models
            .iter()
            .filter_map(|m| self.registry.lookup(m).ok())
            .collect();
        writeln!(out, "\nModel Capabilities:")?;
        writeln!(out, "{}", report::capability_table(&descriptors))?;

        let cases: Vec<TestCase> = self.cli.scenario.test_cases();
        let runner = TestRunner::new(
            Arc::clone(&self.registry),
            self.build_client()?,
            keys,
            self.clock.clone(),
        )
        .with_cooldown(self.cooldown);

        tracing::info!(
            models = models.len(),
            scenario = %self.cli.scenario,
            concurrency = self.cli.effective_concurrency(),
            "starting test run"
        );
        let results = runner
            .run_models(
                &models,
                cases.clone().into(),
                &mut histories,
                self.cli.effective_concurrency(),
            )
            .await;

        for model in models.iter().filter(|m| !results.contains_key(*m)) {
            print_warning(format_args!("No results for {}; see log for details", model));
        }
        for (model, model_results) in &results {
            write_model_summary(out, model, model_results)?;
        }
        store.save(&histories)?;

        let finished = self.clock.now();
        let timestamp = report::file_timestamp(finished);
        self.write_model_files(&output_dir, &results, &timestamp)?;

        writeln!(out, "\n{}", "=".repeat(80))?;
        writeln!(out, "Testing completed. Detailed Metrics:\n")?;
        writeln!(out, "{}", report::metrics_table(&results, &cases))?;
        writeln!(out, "\nSpeed Performance Summary:")?;
        writeln!(out, "{}", report::speed_ranking(&results))?;

        let summary = report::write_summary(&output_dir, &results, &cases, finished)?;
        writeln!(out, "\nTest summary saved to: {}", summary.display())?;
        Ok(())
    }

    fn write_model_files(
        &self,
        output_dir: &Path,
        results: &ResultSet,
        timestamp: &str,
    ) -> Result<(), AppError> {
        for (model, model_results) in results {
            let path = report::write_results_json(output_dir, model, model_results, timestamp)?;
            tracing::debug!(model = %model, path = %path.display(), "wrote results");
            if let Some(path) =
                report::write_transcript(output_dir, model, model_results, timestamp)?
            {
                tracing::debug!(model = %model, path = %path.display(), "wrote transcript");
            }
        }
        Ok(())
    }
}

fn write_model_summary<W: Write>(
    out: &mut W,
    model: &str,
    results: &[TestResult],
) -> std::io::Result<()> {
    let passed = results.iter().filter(|r| r.success).count();
    let rate = if results.is_empty() {
        0.0
    } else {
        passed as f64 / results.len() as f64 * 100.0
    };
    writeln!(out, "\n{} summary:", model)?;
    for result in results {
        let mark = if result.success { "✓" } else { "✗" };
        writeln!(
            out,
            "  {} {} in {:.1}s",
            mark, result.test_case, result.duration
        )?;
        if let Some(error) = &result.error {
            writeln!(out, "    Error: {}", error)?;
        }
    }
    writeln!(out, "Tests passed: {}/{}", passed, results.len())?;
    writeln!(out, "Success rate: {:.1}%", rate)
}

#[cfg(test)]
#[path = "app_tests.rs"]
mod tests;

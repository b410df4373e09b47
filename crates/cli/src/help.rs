// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Long-form help page shown by `--help-verbose`.

use crate::catalog::TestScenario;
use crate::provider::{Provider, ProviderCategory};

/// Width descriptions wrap at
pub const WRAP_WIDTH: usize = 80;

/// A titled page of sections
pub struct HelpPage {
    pub title: String,
    pub sections: Vec<HelpSection>,
}

pub struct HelpSection {
    pub title: String,
    pub items: Vec<HelpItem>,
}

pub enum HelpItem {
    /// Term with an aligned, wrapped description
    Entry { term: String, description: String },
    /// Verbatim text, one or more lines
    Text(String),
}

impl HelpItem {
    fn entry(term: impl Into<String>, description: impl Into<String>) -> Self {
        Self::Entry {
            term: term.into(),
            description: description.into(),
        }
    }

    fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }
}

fn underline(out: &mut String, title: &str, ch: char) {
    out.push_str(title);
    out.push('\n');
    out.extend(std::iter::repeat(ch).take(title.chars().count()));
    out.push('\n');
}

/// Render a page; entry descriptions share one column per section
pub fn render_page(page: &HelpPage, width: usize) -> String {
    let mut out = String::new();
    underline(&mut out, &page.title, '=');

    for section in &page.sections {
        out.push('\n');
        underline(&mut out, &section.title, '-');
        let column = desc_column(&section.items);

        for item in &section.items {
            match item {
                HelpItem::Entry { term, description } => {
                    render_entry(&mut out, term, description, column, width)
                }
                HelpItem::Text(text) => {
                    out.push_str(text);
                    if !text.ends_with('\n') {
                        out.push('\n');
                    }
                }
            }
        }
    }
    out
}

/// Indent, longest term, then two spaces
fn desc_column(items: &[HelpItem]) -> usize {
    let longest = items
        .iter()
        .filter_map(|item| match item {
            HelpItem::Entry { term, .. } => Some(term.chars().count()),
            HelpItem::Text(_) => None,
        })
        .max()
        .unwrap_or(0);
    2 + longest + 2
}

fn render_entry(out: &mut String, term: &str, description: &str, column: usize, width: usize) {
    let room = width.saturating_sub(column).max(20);
    let lines = wrap(description, room);
    let pad = column - 2 - term.chars().count();

    let mut lines = lines.iter();
    match lines.next() {
        Some(first) => out.push_str(&format!("  {}{}{}\n", term, " ".repeat(pad), first)),
        None => out.push_str(&format!("  {}\n", term)),
    }
    for line in lines {
        out.push_str(&format!("{}{}\n", " ".repeat(column), line));
    }
}

/// Greedy word wrap; a word longer than `width` gets a line of its own
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.len()
        } else {
            current.len() + 1 + word.len()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn scenario_summary(scenario: TestScenario) -> &'static str {
    match scenario {
        TestScenario::Standard => {
            "Markdown formatting, step-by-step reasoning, code generation and arithmetic."
        }
        TestScenario::MultiFile => {
            "One prompt asking for an interface plus two implementations as separate files."
        }
    }
}

/// The `--help-verbose` page
pub fn verbose_help_page() -> HelpPage {
    let scenarios = [TestScenario::Standard, TestScenario::MultiFile]
        .into_iter()
        .map(|s| {
            let names: Vec<String> = s.test_cases().into_iter().map(|c| c.name).collect();
            HelpItem::entry(
                s.as_str(),
                format!("{} Cases: {}.", scenario_summary(s), names.join(", ")),
            )
        })
        .collect();

    let providers = ProviderCategory::ALL
        .into_iter()
        .map(|category| {
            let names: Vec<&str> = Provider::ALL
                .into_iter()
                .filter(|p| p.category() == category)
                .map(Provider::as_str)
                .collect();
            HelpItem::entry(category.title(), names.join(", "))
        })
        .collect();

    let mut environment: Vec<HelpItem> = Provider::ALL
        .into_iter()
        .filter(|p| *p != Provider::GoogleVertex)
        .map(|p| {
            let who = if p == Provider::GoogleGla {
                "google-gla and google-vertex".to_string()
            } else {
                p.as_str().to_string()
            };
            HelpItem::entry(p.api_key_env(), format!("API key for {}", who))
        })
        .collect();
    environment.extend([
        HelpItem::entry(
            crate::env::MODELTEST_OUTPUT_DIR,
            "Default for --output-dir",
        ),
        HelpItem::entry(
            crate::env::MODELTEST_COOLDOWN_MS,
            "Delay between test cases of one model in milliseconds (default 500)",
        ),
        HelpItem::entry(
            crate::env::MODELTEST_LOG,
            "Log filter directives, e.g. `modeltest=debug` (default info)",
        ),
    ]);

    HelpPage {
        title: "modeltest - Detailed Help".to_string(),
        sections: vec![
            HelpSection {
                title: "Description".to_string(),
                items: vec![HelpItem::text(
                    "Runs a fixed battery of prompts against every model whose provider has an\n\
                     API key configured, records success and timing, and tracks results over\n\
                     time.",
                )],
            },
            HelpSection {
                title: "Test Scenarios".to_string(),
                items: scenarios,
            },
            HelpSection {
                title: "Provider Support".to_string(),
                items: providers,
            },
            HelpSection {
                title: "Environment".to_string(),
                items: environment,
            },
            HelpSection {
                title: "Results".to_string(),
                items: vec![
                    HelpItem::entry("<out>/<model>_<ts>.json", "Raw results per model"),
                    HelpItem::entry(
                        "<out>/markdown/<model>.md",
                        "Latest successful response per model",
                    ),
                    HelpItem::entry(
                        "<out>/markdown/model_test_summary_<ts>.md",
                        "Metrics and speed rankings for the run",
                    ),
                    HelpItem::entry(
                        "<out>/test_history.json",
                        "Success and failure counts across runs",
                    ),
                ],
            },
            HelpSection {
                title: "Examples".to_string(),
                items: vec![HelpItem::text(
                    "  # Run standard tests with all available providers\n  \
                     modeltest --run-tests\n\n  \
                     # Test specific providers, three models at a time\n  \
                     modeltest --run-tests --providers anthropic openai --concurrent --max-concurrency 3\n\n  \
                     # Dry run against a response script\n  \
                     modeltest --run-tests --script responses.toml --output-dir /tmp/dry-run\n\n  \
                     # Show test history\n  \
                     modeltest --show-history",
                )],
            },
        ],
    }
}

pub fn render_verbose_help() -> String {
    render_page(&verbose_help_page(), WRAP_WIDTH)
}

#[cfg(test)]
#[path = "help_tests.rs"]
mod tests;

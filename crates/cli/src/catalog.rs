// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Test case catalogs, one per scenario.

use clap::ValueEnum;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

use crate::registry::Capability;

/// Default per-case timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Declared retry budget; carried for reporting, never consulted
pub const DEFAULT_RETRIES: u32 = 2;

/// A named catalog of test cases
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TestScenario {
    /// Markdown, reasoning and code generation prompts
    #[default]
    Standard,
    /// One prompt that asks for several source files at once
    MultiFile,
}

impl TestScenario {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::MultiFile => "multi-file",
        }
    }

    /// Test cases for this scenario, in execution order
    pub fn test_cases(self) -> Vec<TestCase> {
        match self {
            Self::Standard => standard_tests(),
            Self::MultiFile => multi_file_tests(),
        }
    }
}

impl fmt::Display for TestScenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single prompt with its expectations
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestCase {
    pub name: String,
    pub prompt: String,
    pub system_prompt: String,
    pub expected_type: String,
    pub validation_pattern: Option<String>,
    pub timeout: Duration,
    pub retries: u32,
    /// Capability names; kept as strings so unknown names survive to the gate
    pub required_capabilities: BTreeSet<String>,
}

impl TestCase {
    /// A markdown case requiring a system prompt, with default timeout and retries
    pub fn new(
        name: impl Into<String>,
        system_prompt: impl Into<String>,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            prompt: prompt.into(),
            system_prompt: system_prompt.into(),
            expected_type: "markdown".to_string(),
            validation_pattern: None,
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
            required_capabilities: BTreeSet::from([Capability::SystemPrompt.as_str().to_string()]),
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.validation_pattern = Some(pattern.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the required capability names
    pub fn requiring<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_capabilities = names.into_iter().map(Into::into).collect();
        self
    }

    /// Whether `response` matches the validation pattern.
    ///
    /// `None` when the case has no pattern or the pattern does not compile.
    pub fn matches_pattern(&self, response: &str) -> Option<bool> {
        let pattern = self.validation_pattern.as_deref()?;
        let re = Regex::new(pattern).ok()?;
        Some(re.is_match(response))
    }
}

fn standard_tests() -> Vec<TestCase> {
    vec![
        TestCase::new(
            "basic_response",
            "You are a helpful math tutor. Explain your work step by step in markdown format.",
            "What is 2+2? Show your work in markdown format.",
        )
        .with_pattern(r"^#.*2.*\+.*2.*=.*4"),
        TestCase::new(
            "markdown_structure",
            "You are a computer science teacher. Explain concepts using clear markdown \
             formatting with headers, lists, and code examples.",
            "Explain what a binary search tree is. Use proper markdown formatting with \
             headers, bullet points, and code examples.",
        )
        .with_pattern(r"#.*\n.*\*.*\n.*```"),
        TestCase::new(
            "code_generation",
            "You are a code instructor. Write clean, simple Python code with explanations \
             in markdown format. Include docstrings and type hints.",
            "Write a Python function that adds two numbers. Format your response in \
             markdown with explanation and code block.",
        )
        .with_pattern(r"#.*\n.*```python"),
        TestCase::new(
            "reasoning",
            "You are a physics teacher. Break down problems step by step using markdown \
             formatting with headers and bullet points.",
            "If a train travels 120 kilometers in 2 hours, what is its speed in kilometers \
             per hour? Format your response in markdown with clear steps.",
        )
        .with_pattern(r"#.*\n.*\*"),
    ]
}

const KV_STORE_SYSTEM: &str = "You are a senior Python developer creating a modular key-value store system.
Follow these guidelines:
1. Use abstract base classes for interfaces
2. Include comprehensive type hints
3. Add detailed docstrings for all classes and methods
4. Implement proper error handling
5. Format the response in markdown with clear headers and code blocks
6. Add brief explanations before each file
7. Ensure implementations properly inherit from the interface";

const KV_STORE_PROMPT: &str = "Create a Python implementation of a key-value store with the following requirements:

1. An abstract interface defining the basic operations
2. A local file-based implementation
3. A Redis implementation

Use proper Python type hints, docstrings, and error handling.
Format your response in markdown with separate code blocks for each file.
Include a brief explanation before each file.

Required files:
- src/store/interfaces/key_value_store.py
- src/store/implementations/local_store.py
- src/store/implementations/redis_store.py
";

fn multi_file_tests() -> Vec<TestCase> {
    vec![TestCase::new("key_value_store", KV_STORE_SYSTEM, KV_STORE_PROMPT).with_pattern(
        r"#.*\n.*```python.*class.*ABC.*\n.*```.*\n.*```python.*class.*Store.*\n.*```.*\n.*```python.*class.*Redis.*\n.*```",
    )]
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;

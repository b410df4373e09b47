// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

//! Shared helpers for binary integration tests.

#![allow(dead_code)]
#![allow(deprecated)] // Command::cargo_bin is deprecated but still functional

use assert_cmd::Command;
use std::io::Write;
use tempfile::NamedTempFile;

pub const KEY_VARS: [&str; 8] = [
    "ANTHROPIC_API_KEY",
    "OPENAI_API_KEY",
    "GEMINI_API_KEY",
    "MISTRAL_API_KEY",
    "FIREWORKS_API_KEY",
    "GROQ_API_KEY",
    "COHERE_API_KEY",
    "OPENROUTER_API_KEY",
];

/// A response script on disk; extension picked from the content
pub fn write_script(content: &str) -> NamedTempFile {
    let suffix = if content.trim_start().starts_with('{') {
        ".json"
    } else {
        ".toml"
    };
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// The binary with every provider key and modeltest variable cleared
pub fn modeltest() -> Command {
    let mut cmd = Command::cargo_bin("modeltest").unwrap();
    for var in KEY_VARS {
        cmd.env_remove(var);
    }
    cmd.env_remove("MODELTEST_OUTPUT_DIR")
        .env_remove("MODELTEST_LOG")
        .env("MODELTEST_COOLDOWN_MS", "0");
    cmd
}

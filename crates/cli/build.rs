// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Build scripts are expected to panic on failure.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::io::Write;

fn main() {
    let out_dir = std::env::var("OUT_DIR").unwrap();
    let path = std::path::Path::new(&out_dir).join("env_names.rs");
    let mut f = std::fs::File::create(path).unwrap();

    let vars = [
        ("ANTHROPIC_API_KEY", "ANTHROPIC_API_KEY"),
        ("OPENAI_API_KEY", "OPENAI_API_KEY"),
        ("GEMINI_API_KEY", "GEMINI_API_KEY"),
        ("MISTRAL_API_KEY", "MISTRAL_API_KEY"),
        ("FIREWORKS_API_KEY", "FIREWORKS_API_KEY"),
        ("GROQ_API_KEY", "GROQ_API_KEY"),
        ("COHERE_API_KEY", "COHERE_API_KEY"),
        ("OPENROUTER_API_KEY", "OPENROUTER_API_KEY"),
        ("MODELTEST_OUTPUT_DIR", "MODELTEST_OUTPUT_DIR"),
        ("MODELTEST_COOLDOWN_MS", "MODELTEST_COOLDOWN_MS"),
        ("MODELTEST_LOG", "MODELTEST_LOG"),
    ];

    for (const_name, env_name) in vars {
        writeln!(f, "pub const {const_name}: &str = \"{env_name}\";").unwrap();
    }
}

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Structured logging setup.

use tracing_subscriber::EnvFilter;

use crate::diagnostic::print_warning;

/// Filter used when `MODELTEST_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "info";

/// Parse a filter directive, falling back to [`DEFAULT_FILTER`]
pub fn filter_from(directive: Option<&str>) -> Result<EnvFilter, String> {
    match directive {
        None => Ok(EnvFilter::new(DEFAULT_FILTER)),
        Some(directive) => EnvFilter::try_new(directive).map_err(|e| e.to_string()),
    }
}

/// Install the stderr subscriber. Safe to call more than once.
pub fn init() {
    let directive = crate::env::log_filter();
    let filter = match filter_from(directive.as_deref()) {
        Ok(filter) => filter,
        Err(e) => {
            print_warning(format_args!(
                "ignoring invalid {}: {}",
                crate::env::MODELTEST_LOG,
                e
            ));
            EnvFilter::new(DEFAULT_FILTER)
        }
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;

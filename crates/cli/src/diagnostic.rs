// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! User-facing errors and warnings on stderr.
//!
//! Colored when stderr is a terminal. Structured logs go through `tracing`;
//! these are for messages the user must act on.

use std::fmt::Display;
use std::io::{self, IsTerminal, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Severity {
    Error,
    Warning,
}

impl Severity {
    fn label(self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
        }
    }

    fn color(self) -> &'static str {
        match self {
            Self::Error => "\x1b[31m",
            Self::Warning => "\x1b[33m",
        }
    }
}

fn write_diagnostic<W: Write>(writer: &mut W, severity: Severity, msg: impl Display, color: bool) {
    let _ = if color {
        writeln!(
            writer,
            "{}{}: {}\x1b[0m",
            severity.color(),
            severity.label(),
            msg
        )
    } else {
        writeln!(writer, "{}: {}", severity.label(), msg)
    };
}

fn emit(severity: Severity, msg: impl Display) {
    let stderr = io::stderr();
    let color = stderr.is_terminal();
    write_diagnostic(&mut stderr.lock(), severity, msg, color);
}

/// `Error: <msg>` on stderr
pub fn print_error(msg: impl Display) {
    emit(Severity::Error, msg);
}

/// `Warning: <msg>` on stderr
pub fn print_warning(msg: impl Display) {
    emit(Severity::Warning, msg);
}

#[cfg(test)]
#[path = "diagnostic_tests.rs"]
mod tests;

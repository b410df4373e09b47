// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! modeltest binary entry point.

use clap::Parser;

use modeltest::app::App;
use modeltest::cli::Cli;
use modeltest::diagnostic::print_error;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    modeltest::logging::init();

    let app = App::from_env(cli);
    let mut stdout = std::io::stdout();
    if let Err(e) = app.run(&mut stdout).await {
        print_error(e);
        std::process::exit(1);
    }
}

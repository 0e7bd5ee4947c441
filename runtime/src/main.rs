// Copyright 2026 Slant Contributors
// SPDX-License-Identifier: MIT

use anyhow::Result;
use clap::{Parser, Subcommand};
use slant_runtime::cli;

#[derive(Parser)]
#[command(
    name = "slant",
    about = "Slant — score article text as factual or opinionated",
    version,
    after_help = "Run 'slant <command> --help' for details on each command.\nRun 'slant' with no command to start the server."
)]
struct Cli {
    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Listen port (overrides PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Classify a single text or page and print the result as JSON
    Analyze {
        /// Text to classify
        #[arg(long, required_unless_present = "url")]
        text: Option<String>,
        /// Page to scrape and classify
        #[arg(long)]
        url: Option<String>,
    },
    /// Check environment and diagnose issues
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_tracing(cli.verbose);

    let result = match cli.command {
        None => cli::serve::run(None).await,
        Some(Commands::Serve { port }) => cli::serve::run(port).await,
        Some(Commands::Analyze { text, url }) => cli::analyze_cmd::run(text, url).await,
        Some(Commands::Doctor) => cli::doctor::run().await,
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        eprintln!("  Error: {e:#}");
        std::process::exit(1);
    }

    result
}

// SPDX-FileCopyrightText: 2026 Winback Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Winback - cart-abandonment recovery service for Cafe24 mall operators.
//!
//! This is the binary entry point for the winback service.

mod seed;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Winback - cart-abandonment recovery service.
#[derive(Parser, Debug)]
#[command(name = "winback", version, about, long_about = None)]
struct Cli {
    /// Path to a winback.toml config file. Defaults to the standard
    /// search locations (/etc, XDG config dir, working directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the winback gateway server.
    Serve,
    /// Populate the record store with demo data.
    Seed,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(path) => winback_config::load_and_validate_path(&path),
        None => winback_config::load_and_validate(),
    };
    let config = match config {
        Ok(config) => config,
        Err(errors) => {
            winback_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Seed) => seed::run_seed(config).await,
        None => {
            println!("winback: use --help for available commands");
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("winback: {err}");
        std::process::exit(1);
    }
}

// SPDX-FileCopyrightText: 2026 Cropsight Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cropsight - crop disease identification and treatment advisory.
//!
//! Binary entry point. Loads and validates configuration, then starts the
//! selected frontend: the web gateway or the Telegram bot.

mod bot;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use cropsight_config::{Frontend, validate_config};

/// Cropsight - crop disease identification and treatment advisory.
#[derive(Parser, Debug)]
#[command(name = "cropsight", version, about, long_about = None)]
struct Cli {
    /// Path to a config file, overriding the default search order.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the web gateway.
    Serve,
    /// Start the Telegram bot.
    Bot,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("cropsight: failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let frontend = match cli.command {
        Commands::Serve => Frontend::Gateway,
        Commands::Bot => Frontend::Bot,
    };

    if let Err(errors) = validate_config(&config, frontend) {
        eprintln!("cropsight: configuration invalid:");
        for error in &errors {
            eprintln!("  - {error}");
        }
        std::process::exit(1);
    }

    init_tracing(&config.agent.log_level);

    let result = match cli.command {
        Commands::Serve => serve::run_serve(config).await,
        Commands::Bot => bot::run_bot(config).await,
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "fatal error");
        std::process::exit(1);
    }
}

fn load(path: Option<&std::path::Path>) -> Result<cropsight_config::CropsightConfig, String> {
    let loaded = match path {
        Some(path) => cropsight_config::load_config_from_path(path),
        None => cropsight_config::load_config(),
    };
    loaded.map_err(|e| e.to_string())
}

/// Initializes the tracing subscriber with the configured log level.
///
/// `RUST_LOG` takes precedence when set; noisy HTTP internals stay at warn.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{log_level},hyper=warn,reqwest=warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod check;
mod config_cmd;
mod scrape;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use fd2ppv::config::{load_config_with_options, LoadOptions};

#[derive(Parser)]
#[command(name = "fd2ppv")]
#[command(about = "FC2 metadata scraper for fd2ppv.cc")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape metadata for an FC2 number and print it as JSON
    Scrape {
        /// FC2 number (e.g. FC2-PPV-4347402)
        number: String,
        /// Article URL to use instead of the canonical one
        #[arg(long)]
        url: Option<String>,
        /// Raw cookie string (overrides config)
        #[arg(long, env = "FD2PPV_COOKIE", hide_env_values = true)]
        cookie: Option<String>,
        /// Print progress lines to stderr after the result
        #[arg(long)]
        trace: bool,
        /// Fail with a non-zero exit code instead of printing the empty record
        #[arg(long)]
        strict: bool,
    },

    /// Check whether the configured cookie is still signed in
    CheckCookie {
        /// Raw cookie string (overrides config)
        #[arg(long, env = "FD2PPV_COOKIE", hide_env_values = true)]
        cookie: Option<String>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the resolved configuration (cookie hidden)
    Show,
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
    };
    let mut config = load_config_with_options(&options).await?;

    match cli.command {
        Commands::Scrape {
            number,
            url,
            cookie,
            trace,
            strict,
        } => {
            if cookie.is_some() {
                config.cookie = cookie;
            }
            scrape::cmd_scrape(config, &number, url.as_deref(), trace, strict).await
        }
        Commands::CheckCookie { cookie } => {
            if cookie.is_some() {
                config.cookie = cookie;
            }
            check::cmd_check_cookie(config).await
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => config_cmd::cmd_config_show(&config),
        },
    }
}

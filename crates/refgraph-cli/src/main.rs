//! refgraph CLI
//!
//! Command-line interface for refgraph - syncs a Zotero library into a
//! Logseq graph.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use refgraph_core::Config;

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "refgraph")]
#[command(about = "Sync a Zotero library into a Logseq graph")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync documents, render pages, and backfill journals (the default)
    Sync,
    /// Re-render pages and journals from the local cache, without
    /// touching the network
    Render,
    /// Backfill journal pages
    Journals {
        /// How many days to backfill (defaults to the configured value)
        #[arg(long)]
        days: Option<u32>,
    },
    /// Detect keyword candidates in the cached documents
    Keywords,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (user_id, api_key, graph_dir, ...)
        key: String,
        /// Configuration value
        value: String,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "refgraph=info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config management must work before anything else is configured
    if let Some(Commands::Config { command }) = &cli.command {
        return handle_config_command(command.clone(), &output);
    }

    let config = Config::load().context("Failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Sync) {
        Commands::Sync => commands::sync::run(&config, &output),
        Commands::Render => commands::render::run(&config, &output),
        Commands::Journals { days } => commands::journals::run(&config, days, &output),
        Commands::Keywords => commands::keywords::run(&config, &output),
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

fn handle_config_command(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(output),
        Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, output),
    }
}

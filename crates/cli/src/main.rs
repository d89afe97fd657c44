//! Databank CLI
//!
//! Main entry point for the `databank` command-line tool: serve the grounded
//! Q&A endpoint, ask one question, or inspect the topic corpus.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, ServeCommand, TopicsCommand};
use databank_core::{
    config::AppConfig,
    logging::{self, LogFormat},
};
use std::path::PathBuf;
use tracing::Instrument;

/// Databank - grounded answers from a topic corpus
#[derive(Parser, Debug)]
#[command(name = "databank")]
#[command(about = "Grounded answers from a topic corpus, with a daily quota", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true)]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log output format (pretty, json)
    #[arg(long, global = true, value_parser = parse_log_format)]
    log_format: Option<LogFormat>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// LLM provider (gemini, ollama)
    #[arg(short, long, global = true)]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Directory holding the topic documents
    #[arg(long, global = true)]
    materials: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP service
    Serve(ServeCommand),

    /// Ask one question grounded in the corpus
    Ask(AskCommand),

    /// List the topic documents
    Topics(TopicsCommand),
}

fn parse_log_format(s: &str) -> Result<LogFormat, String> {
    LogFormat::parse(s).ok_or_else(|| format!("unknown log format '{}' (pretty, json)", s))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Workspace and config file flags win over their environment variables
    let workspace = cli.workspace.clone();
    let config_file = cli.config.clone();
    let config = AppConfig::load_with(|key| match key {
        "DATABANK_WORKSPACE" if workspace.is_some() => {
            workspace.as_ref().map(|p| p.display().to_string())
        }
        "DATABANK_CONFIG" if config_file.is_some() => {
            config_file.as_ref().map(|p| p.display().to_string())
        }
        _ => std::env::var(key).ok(),
    })?;

    let config = config.with_overrides(
        cli.provider,
        cli.model,
        cli.materials,
        cli.log_level,
        cli.log_format,
        cli.verbose,
        cli.no_color,
    );

    logging::init_logging(config.log_level.as_deref(), config.log_format, config.no_color)?;

    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {}", config.provider);
    tracing::debug!("Model: {}", config.model);

    config.validate()?;

    let command_name = match &cli.command {
        Commands::Serve(_) => "serve",
        Commands::Ask(_) => "ask",
        Commands::Topics(_) => "topics",
    };
    let span = tracing::info_span!("command", name = command_name);

    let result = async {
        match cli.command {
            Commands::Serve(cmd) => cmd.execute(config).await,
            Commands::Ask(cmd) => cmd.execute(&config).await.map_err(Into::into),
            Commands::Topics(cmd) => cmd.execute(&config).await.map_err(Into::into),
        }
    }
    .instrument(span)
    .await;

    match &result {
        Ok(_) => tracing::debug!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}

//! Crawldex main entry point
//!
//! This is the command-line interface that starts the crawl and search service.

use anyhow::Context;
use clap::Parser;
use crawldex::config::{load_config_with_hash, validate, Config};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Crawldex: a domain crawler with full-text search
///
/// Serves an HTTP API that launches budgeted crawls of a domain, extracts the
/// text of every reachable document through Apache Tika, and answers
/// full-text queries over the indexed documents.
#[derive(Parser, Debug)]
#[command(name = "crawldex")]
#[command(version)]
#[command(about = "Domain crawler with full-text search", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Port to listen on
    #[arg(long, env = "APP_PORT")]
    port: Option<u16>,

    /// Base URL of the Tika server
    #[arg(long, env = "TIKA_URL")]
    tika_url: Option<String>,

    /// Path to the SQLite database file
    #[arg(long, env = "DATABASE_PATH")]
    database: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    apply_overrides(&mut config, &cli);
    validate(&config).context("Invalid configuration")?;

    crawldex::server::run(config)
        .await
        .context("Server failed")?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Command-line flags and environment variables take precedence over the file
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(url) = &cli.tika_url {
        config.extractor.url = url.clone();
    }
    if let Some(path) = &cli.database {
        config.storage.database_path = path.clone();
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("crawldex=info,tower_http=info,warn"),
            1 => EnvFilter::new("crawldex=debug,tower_http=debug,info"),
            2 => EnvFilter::new("crawldex=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

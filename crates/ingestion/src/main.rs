//! PaperNest Ingestion CLI
//!
//! Commands:
//! - `fetch`: run one fetch-and-store cycle and exit
//! - `migrate`: create the database schema and exit
//! - `schedule`: run the periodic scheduler until Ctrl+C

use clap::{Parser, Subcommand};
use papernest_common::config::{AppConfig, ObservabilityConfig};
use papernest_common::{DbPool, Repository, VERSION};
use papernest_ingestion::identity::canonical_id;
use papernest_ingestion::{Pipeline, Schedule, Scheduler};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ingestion", version, about = "arXiv feed ingestion for PaperNest")]
struct Cli {
    /// Load this configuration file instead of the layered config/ search
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch and store once
    Fetch {
        /// Re-fetch these arXiv ids (bare, versioned or abs URLs) instead of
        /// running the configured search
        #[arg(long = "id", value_name = "ARXIV_ID", value_parser = canonical_id)]
        ids: Vec<String>,
    },
    /// Create the database schema
    Migrate,
    /// Fetch periodically until interrupted
    Schedule,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::load()?,
    };

    init_tracing(&config.observability);

    info!("Starting PaperNest Ingestion v{}", VERSION);

    let db = DbPool::connect_and_migrate(&config.database).await?;

    match cli.command {
        Command::Migrate => {
            info!("Schema is up to date");
        }
        Command::Fetch { ids } => {
            let repository = Repository::new(db);
            let pipeline = Pipeline::from_config(&config.arxiv, Arc::new(repository))?;

            let report = if ids.is_empty() {
                pipeline.run_once().await?
            } else {
                pipeline.refresh(&ids).await?
            };

            println!(
                "Stored {} papers ({} fetched, {} skipped, {} failed)",
                report.stored, report.fetched, report.skipped, report.failed
            );
        }
        Command::Schedule => {
            let repository = Repository::new(db);
            let pipeline = Pipeline::from_config(&config.arxiv, Arc::new(repository))?;
            let handle = Scheduler::start(Arc::new(pipeline), Schedule::from_config(&config.arxiv));

            tokio::signal::ctrl_c().await?;

            info!("Shutdown signal received, waiting for the current cycle");
            handle.stop().await;
        }
    }

    info!("Ingestion finished");
    Ok(())
}

fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if config.json_logging {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_fetch_with_ids() {
        let cli = Cli::try_parse_from([
            "ingestion",
            "--config",
            "config/prod.toml",
            "fetch",
            "--id",
            "2301.12345v2",
            "--id",
            "http://arxiv.org/abs/2302.00001",
        ])
        .unwrap();

        assert_eq!(cli.config.as_deref(), Some("config/prod.toml"));
        match cli.command {
            Command::Fetch { ids } => assert_eq!(ids, vec!["2301.12345", "2302.00001"]),
            _ => panic!("expected fetch"),
        }
    }

    #[test]
    fn test_parse_fetch_rejects_malformed_id() {
        let result = Cli::try_parse_from(["ingestion", "fetch", "--id", "not-an-id"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_schedule() {
        let cli = Cli::try_parse_from(["ingestion", "schedule"]).unwrap();
        assert!(matches!(cli.command, Command::Schedule));
        assert!(cli.config.is_none());
    }
}

//! qa-console: ask the question-answering backend from a terminal.
//!
//! Configuration comes from `QA_*` environment variables (a `.env` file is
//! honoured), with `--base-url` taking precedence.

mod logging;
mod render;

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use qa_sdk::config::{CompositeConfigProvider, EnvConfigProvider, MemoryConfigProvider, DEFAULT_PROVIDER};
use qa_sdk::{ApiConfig, ConfigProvider, QueryApiClient};
use query_session::{GraphExplorer, QuerySession, SessionConfig, Transition};
use tracing::info;

use crate::logging::{init_logging, LoggingConfig};

#[derive(Debug, Parser)]
#[command(name = "qa-console", version, about = "Query the agent backend and inspect its knowledge graph")]
struct Cli {
    /// Backend base URL, overrides QA_API_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Ask a question and show the answer with its evaluation
    Ask {
        question: String,

        /// Retry once with the suggested adaptation patches when eligible
        #[arg(long)]
        retry: bool,
    },
    /// Show the knowledge graph, or the neighbourhood of some seed labels
    Graph {
        /// Seed label, repeatable
        #[arg(long = "seed")]
        seeds: Vec<String>,

        /// Neighbourhood radius around the seeds
        #[arg(long, default_value_t = 1)]
        hops: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    init_logging(LoggingConfig {
        level: cli.log_level.clone(),
        json_format: cli.json_logs,
        ..LoggingConfig::default()
    })?;

    let client = Arc::new(build_client(cli.base_url.as_deref())?);
    info!(base_url = %client.config().base_url, "Backend configured");

    match cli.command {
        Command::Ask { question, retry } => ask(client, &question, retry).await,
        Command::Graph { seeds, hops } => graph(client, &seeds, hops).await,
    }
}

fn build_client(base_url: Option<&str>) -> Result<QueryApiClient> {
    let config = api_config(base_url, EnvConfigProvider::clone(&DEFAULT_PROVIDER)).context("Invalid QA_* configuration")?;
    QueryApiClient::new(config).context("Failed to build backend client")
}

/// Resolve the backend settings, with `base_url` shadowing the configured one
/// before anything is validated
fn api_config(base_url: Option<&str>, configured: impl ConfigProvider + 'static) -> qa_sdk::Result<ApiConfig> {
    let mut overrides = MemoryConfigProvider::new();
    if let Some(url) = base_url {
        overrides.set("api_base_url", url);
    }

    let provider = CompositeConfigProvider::new()
        .with_provider(overrides)
        .with_provider(configured);

    ApiConfig::from_provider(&provider)
}

async fn ask(client: Arc<QueryApiClient>, question: &str, retry: bool) -> Result<()> {
    let config = SessionConfig::from_env().context("Invalid QA_SESSION_* configuration")?;
    let session = QuerySession::with_config(client, config);

    match session.submit(question).await {
        Transition::Completed => {}
        Transition::Failed(message) => bail!("Query failed: {}", message),
        Transition::Rejected(rejection) => bail!("{}", rejection),
        Transition::Discarded => bail!("Query was abandoned"),
    }

    if let Some(result) = session.state().result {
        println!("{}", render::render_response(&result));
    }

    if !retry {
        return Ok(());
    }

    if !session.retry_enabled() {
        let reason = session
            .retry_block()
            .map(|block| block.to_string())
            .unwrap_or_else(|| "request in flight".to_string());
        println!("Retry unavailable: {}", reason);
        return Ok(());
    }

    let transition = session.retry().await;

    if let Some(notification) = session.notifications().current() {
        println!("{}", render::render_notification(&notification));
    }

    match transition {
        Transition::Completed => {
            if let Some(result) = session.state().result {
                println!("\n{}", render::render_response(&result));
            }
            Ok(())
        }
        // the pre-retry answer above stays the one shown
        Transition::Failed(message) => bail!("Retry failed: {}", message),
        Transition::Rejected(rejection) => bail!("{}", rejection),
        Transition::Discarded => bail!("Retry was abandoned"),
    }
}

async fn graph(client: Arc<QueryApiClient>, seeds: &[String], hops: u32) -> Result<()> {
    let explorer = GraphExplorer::new(client);

    match explorer.load_subgraph(seeds, hops).await {
        Transition::Completed => {}
        Transition::Failed(message) => bail!("{}", message),
        Transition::Rejected(rejection) => bail!("{}", rejection),
        Transition::Discarded => bail!("Graph load was abandoned"),
    }

    match explorer.state().graph {
        Some(graph) if !graph.is_empty() || graph.has_data_quality_issues() => {
            print!("{}", render::render_graph(&graph));
        }
        _ => println!("Knowledge graph is empty."),
    }

    Ok(())
}

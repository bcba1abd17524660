//! Terminal chat with the operations assistant.
//!
//! Run with: cargo run -p assistant -- --session me
//!
//! Configuration via .env file or environment variables:
//!   ANTHROPIC_API_KEY  - Engine credential (required unless --mock)
//!   DATABASE_URL       - SQLite URL (default: sqlite:assistant.db?mode=rwc)
//!   RUST_LOG           - Log filter (default: info)

use std::sync::Arc;
use std::time::Duration;

use agent_tools::{default_registry, RegistryToolExecutor, ToolPolicy};
use anthropic_brain::AnthropicEngine;
use async_trait::async_trait;
use brain_core::{ActionStager, InboundMessage, OutboundMessage, ReasoningEngine, ReplyMode};
use chrono::Utc;
use clap::Parser;
use database::Database;
use mock_brain::EchoEngine;
use orchestrator::{MessageSender, Orchestrator, OrchestratorConfig, OrchestratorError, Stores};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// How often expired pending actions are swept from the store.
const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Parser)]
#[command(name = "assistant")]
#[command(about = "Chat with the operations assistant from the terminal")]
struct Args {
    /// SQLite database URL
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:assistant.db?mode=rwc")]
    database_url: String,

    /// Session key to chat as
    #[arg(long, default_value = "terminal")]
    session: String,

    /// Answer with the offline echo engine instead of the API
    #[arg(long)]
    mock: bool,
}

/// Prints replies to stdout.
struct StdoutSender;

#[async_trait]
impl MessageSender for StdoutSender {
    async fn send(&self, message: &OutboundMessage) -> Result<(), OrchestratorError> {
        let mut line = String::new();
        if message.reply_mode == ReplyMode::Voice {
            line.push_str("[voice] ");
        }
        line.push_str(&message.text);
        if message.awaiting_confirmation {
            line.push_str("\n  (reply yes / no / edit)");
        }
        line.push('\n');

        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(line.as_bytes())
            .await
            .map_err(|e| OrchestratorError::SendFailed(e.to_string()))?;
        stdout
            .flush()
            .await
            .map_err(|e| OrchestratorError::SendFailed(e.to_string()))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = OrchestratorConfig::from_env()?;

    let database = Database::connect(&args.database_url).await?;
    database.migrate().await?;
    let stores = Stores::with_database(database, &config);

    let stager: Arc<dyn ActionStager> = stores.pending.clone();
    let tools = Arc::new(
        RegistryToolExecutor::with_policy(default_registry(), ToolPolicy::from_env())
            .with_stager(stager),
    );

    let engine: Arc<dyn ReasoningEngine> = if args.mock {
        info!("Using offline echo engine");
        Arc::new(EchoEngine::with_prefix("(echo) "))
    } else {
        Arc::new(AnthropicEngine::from_env()?)
    };

    let pending = stores.pending.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PRUNE_INTERVAL);
        loop {
            interval.tick().await;
            pending.prune_expired(Utc::now()).await;
        }
    });

    let orchestrator = Orchestrator::new(
        config,
        stores,
        engine,
        tools.clone(),
        tools,
        StdoutSender,
    );

    println!("Operations assistant ready (session {}). Type /help for commands, Ctrl+D to quit.", args.session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut timestamp = 0u64;
    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        timestamp += 1;
        let message = InboundMessage::direct(args.session.as_str(), text, timestamp);
        if let Err(e) = orchestrator.handle(&message).await {
            error!("Failed to deliver reply: {}", e);
        }
    }

    info!("Input closed, shutting down");
    Ok(())
}

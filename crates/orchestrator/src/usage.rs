//! Per-run usage reporting.

use std::time::Duration;

use async_trait::async_trait;
use brain_core::{TierSet, Usage};
use database::usage as usage_store;
use database::Database;
use tracing::info;

use crate::error::OrchestratorError;

/// Usage accumulated over one agent-loop run.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageReport {
    pub session_key: String,
    /// Every tier used during the run.
    pub tiers: TierSet,
    pub usage: Usage,
    pub latency: Duration,
    pub tool_calls: usize,
    pub rounds: usize,
}

/// Destination for usage reports.
///
/// Called fire-and-forget at loop exit; a failing sink never affects the
/// reply.
#[async_trait]
pub trait UsageSink: Send + Sync {
    async fn record(&self, report: &UsageReport) -> Result<(), OrchestratorError>;
}

/// Writes usage as a structured log line.
#[derive(Debug, Clone, Default)]
pub struct LoggingUsageSink;

#[async_trait]
impl UsageSink for LoggingUsageSink {
    async fn record(&self, report: &UsageReport) -> Result<(), OrchestratorError> {
        info!(
            session = %report.session_key,
            models = %report.tiers.label(),
            input_tokens = report.usage.input_tokens,
            output_tokens = report.usage.output_tokens,
            latency_ms = report.latency.as_millis() as u64,
            tool_calls = report.tool_calls,
            rounds = report.rounds,
            "Agent run complete"
        );
        Ok(())
    }
}

/// Stores each report as a row in the usage table.
#[derive(Debug, Clone)]
pub struct DatabaseUsageSink {
    database: Database,
}

impl DatabaseUsageSink {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

#[async_trait]
impl UsageSink for DatabaseUsageSink {
    async fn record(&self, report: &UsageReport) -> Result<(), OrchestratorError> {
        usage_store::insert_usage(
            self.database.pool(),
            &report.session_key,
            &report.tiers.label(),
            report.usage.input_tokens as i64,
            report.usage.output_tokens as i64,
            report.latency.as_millis() as i64,
            report.tool_calls as i64,
        )
        .await?;
        Ok(())
    }
}

//! The keyed stores shared by the orchestrator and the tools.

use std::sync::Arc;

use database::Database;

use crate::config::OrchestratorConfig;
use crate::history::HistoryStore;
use crate::pending::PendingActionStore;
use crate::preferences::PreferenceStore;
use crate::usage::{DatabaseUsageSink, LoggingUsageSink, UsageSink};

/// History, pending-action, preference and usage storage for all sessions.
///
/// The pending-action store doubles as the [`brain_core::ActionStager`]
/// handed to the tool executor, so build this first.
#[derive(Clone)]
pub struct Stores {
    pub history: Arc<HistoryStore>,
    pub pending: Arc<PendingActionStore>,
    pub preferences: Arc<PreferenceStore>,
    pub usage: Arc<dyn UsageSink>,
}

impl Stores {
    /// Process-local stores; usage goes to the log.
    pub fn in_memory(config: &OrchestratorConfig) -> Self {
        Self {
            history: Arc::new(HistoryStore::new(
                config.history_max_turns,
                config.history_result_max_chars,
            )),
            pending: Arc::new(PendingActionStore::new(config.pending_action_ttl)),
            preferences: Arc::new(PreferenceStore::new()),
            usage: Arc::new(LoggingUsageSink),
        }
    }

    /// Stores backed by SQLite; usage is written to the usage table.
    pub fn with_database(database: Database, config: &OrchestratorConfig) -> Self {
        Self {
            history: Arc::new(HistoryStore::with_database(
                database.clone(),
                config.history_max_turns,
                config.history_result_max_chars,
            )),
            pending: Arc::new(PendingActionStore::with_database(
                database.clone(),
                config.pending_action_ttl,
            )),
            preferences: Arc::new(PreferenceStore::with_database(database.clone())),
            usage: Arc::new(DatabaseUsageSink::new(database)),
        }
    }

    /// Replace the usage sink.
    pub fn with_usage_sink(mut self, usage: Arc<dyn UsageSink>) -> Self {
        self.usage = usage;
        self
    }
}

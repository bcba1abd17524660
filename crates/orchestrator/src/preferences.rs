//! Per-session reply preferences.

use std::collections::HashMap;

use brain_core::ReplyMode;
use database::preference as preference_store;
use database::Database;
use tokio::sync::RwLock;
use tracing::warn;

const REPLY_MODE: &str = "reply_mode";

/// Reply-mode storage keyed by session.
///
/// Thread-safe cache in front of an optional SQLite table so voice mode
/// survives restarts.
pub struct PreferenceStore {
    reply_modes: RwLock<HashMap<String, ReplyMode>>,
    database: Option<Database>,
}

impl Default for PreferenceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PreferenceStore {
    /// Create a new empty preference store.
    pub fn new() -> Self {
        Self {
            reply_modes: RwLock::new(HashMap::new()),
            database: None,
        }
    }

    /// Create a preference store backed by a persistent database.
    pub fn with_database(database: Database) -> Self {
        Self {
            reply_modes: RwLock::new(HashMap::new()),
            database: Some(database),
        }
    }

    /// Get the reply mode for a session, or text if not set.
    pub async fn get(&self, session_key: &str) -> ReplyMode {
        if let Some(mode) = self.reply_modes.read().await.get(session_key).copied() {
            return mode;
        }

        if let Some(database) = &self.database {
            match preference_store::get_preference(database.pool(), session_key, REPLY_MODE).await {
                Ok(Some(record)) => {
                    let mode = ReplyMode::from_str(&record.value);
                    self.reply_modes
                        .write()
                        .await
                        .insert(session_key.to_string(), mode);
                    return mode;
                }
                Ok(None) => {}
                Err(err) => {
                    warn!("Failed to load reply mode for {}: {}", session_key, err);
                }
            }
        }

        ReplyMode::default()
    }

    /// Set the reply mode for a session.
    pub async fn set(&self, session_key: &str, mode: ReplyMode) {
        self.reply_modes
            .write()
            .await
            .insert(session_key.to_string(), mode);

        if let Some(database) = &self.database {
            if let Err(err) = preference_store::upsert_preference(
                database.pool(),
                session_key,
                REPLY_MODE,
                mode.as_str(),
            )
            .await
            {
                warn!("Failed to persist reply mode for {}: {}", session_key, err);
            }
        }
    }

    /// Clear all preferences for a session.
    pub async fn clear(&self, session_key: &str) {
        self.reply_modes.write().await.remove(session_key);

        if let Some(database) = &self.database {
            if let Err(err) = preference_store::clear_preferences(database.pool(), session_key).await {
                warn!("Failed to clear preferences for {}: {}", session_key, err);
            }
        }
    }
}

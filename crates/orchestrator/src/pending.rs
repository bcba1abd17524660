//! The single outstanding "awaiting confirmation" action per session.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use brain_core::{ActionKind, ActionStager, PendingAction, StagedAction};
use chrono::{DateTime, TimeZone, Utc};
use database::pending_action as pending_store;
use database::{Database, PendingActionRecord};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::OrchestratorError;

/// Pending action storage with lazy expiry.
///
/// Saving overwrites whatever was staged before for the session. Loading an
/// expired record deletes it and reports nothing.
pub struct PendingActionStore {
    actions: RwLock<HashMap<String, PendingAction>>,
    database: Option<Database>,
    ttl: chrono::Duration,
}

impl PendingActionStore {
    /// Create an in-memory pending action store.
    pub fn new(ttl: Duration) -> Self {
        Self {
            actions: RwLock::new(HashMap::new()),
            database: None,
            ttl: chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::minutes(5)),
        }
    }

    /// Create a pending action store backed by a persistent database.
    pub fn with_database(database: Database, ttl: Duration) -> Self {
        Self {
            database: Some(database),
            ..Self::new(ttl)
        }
    }

    /// Time-to-live given to newly staged actions.
    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }

    /// Load the live pending action for a session.
    pub async fn load(&self, session_key: &str) -> Option<PendingAction> {
        self.load_at(session_key, Utc::now()).await
    }

    /// Load the pending action as seen at `now`.
    pub async fn load_at(&self, session_key: &str, now: DateTime<Utc>) -> Option<PendingAction> {
        let action = match &self.database {
            None => self.actions.read().await.get(session_key).cloned(),
            Some(database) => {
                match pending_store::get_pending_action(database.pool(), session_key).await {
                    Ok(Some(record)) => match decode(record) {
                        Ok(action) => Some(action),
                        Err(reason) => {
                            warn!("Discarding unreadable pending action for {}: {}", session_key, reason);
                            self.clear(session_key).await;
                            return None;
                        }
                    },
                    Ok(None) => None,
                    Err(err) => {
                        warn!("Failed to load pending action for {}: {}", session_key, err);
                        None
                    }
                }
            }
        }?;

        if action.is_expired_at(now) {
            debug!("Pending {} for {} expired at {}", action.kind, session_key, action.expires_at);
            self.clear(session_key).await;
            return None;
        }

        Some(action)
    }

    /// Store a pending action, logging any failure.
    pub async fn save(&self, session_key: &str, action: PendingAction) {
        if let Err(err) = self.try_save(session_key, action).await {
            warn!("Failed to persist pending action for {}: {}", session_key, err);
        }
    }

    /// Store a pending action, replacing any existing one.
    pub async fn try_save(
        &self,
        session_key: &str,
        action: PendingAction,
    ) -> Result<(), OrchestratorError> {
        let Some(database) = &self.database else {
            self.actions
                .write()
                .await
                .insert(session_key.to_string(), action);
            return Ok(());
        };

        let params = action.params.to_string();
        pending_store::upsert_pending_action(
            database.pool(),
            session_key,
            action.kind.as_str(),
            &action.description,
            &params,
            action.expires_at.timestamp_millis(),
        )
        .await?;
        Ok(())
    }

    /// Remove the pending action for a session.
    pub async fn clear(&self, session_key: &str) {
        self.actions.write().await.remove(session_key);

        if let Some(database) = &self.database {
            if let Err(err) = pending_store::delete_pending_action(database.pool(), session_key).await {
                warn!("Failed to clear pending action for {}: {}", session_key, err);
            }
        }
    }

    /// Delete every action expired at `now`. Returns how many were removed.
    pub async fn prune_expired(&self, now: DateTime<Utc>) -> u64 {
        let mut actions = self.actions.write().await;
        let before = actions.len();
        actions.retain(|_, action| !action.is_expired_at(now));
        let mut removed = (before - actions.len()) as u64;
        drop(actions);

        if let Some(database) = &self.database {
            match pending_store::prune_expired(database.pool(), now.timestamp_millis()).await {
                Ok(count) => removed += count,
                Err(err) => warn!("Failed to prune pending actions: {}", err),
            }
        }

        if removed > 0 {
            info!("Pruned {} expired pending actions", removed);
        }
        removed
    }
}

#[async_trait]
impl ActionStager for PendingActionStore {
    async fn stage(&self, session_key: &str, action: StagedAction) -> Result<(), String> {
        let expires_at = Utc::now() + self.ttl;
        info!("Staging {} for {} until {}", action.kind, session_key, expires_at);
        self.try_save(session_key, PendingAction::from_staged(action, expires_at))
            .await
            .map_err(|err| err.to_string())
    }
}

fn decode(record: PendingActionRecord) -> Result<PendingAction, String> {
    let kind: ActionKind = record.kind.parse()?;
    let params = serde_json::from_str(&record.params).map_err(|err| err.to_string())?;
    let expires_at = Utc
        .timestamp_millis_opt(record.expires_at_ms)
        .single()
        .ok_or_else(|| format!("invalid expiry {}", record.expires_at_ms))?;

    Ok(PendingAction {
        kind,
        description: record.description,
        params,
        expires_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn action(description: &str, expires_at: DateTime<Utc>) -> PendingAction {
        PendingAction {
            kind: ActionKind::DraftEmail,
            description: description.to_string(),
            params: json!({"to": "ann@example.com"}),
            expires_at,
        }
    }

    async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_expiry_boundary() {
        let store = PendingActionStore::new(Duration::from_secs(300));
        let created = Utc::now();
        let expires = created + store.ttl();
        store.save("+1", action("Email Ann", expires)).await;

        let before = expires - chrono::Duration::milliseconds(1);
        assert_eq!(
            store.load_at("+1", before).await.unwrap().description,
            "Email Ann"
        );

        assert!(store.load_at("+1", expires).await.is_none());
        // Gone even when read as of an earlier instant
        assert!(store.load_at("+1", created).await.is_none());
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let store = PendingActionStore::new(Duration::from_secs(300));
        let expires = Utc::now() + chrono::Duration::minutes(5);
        store.save("+1", action("first", expires)).await;
        store.save("+1", action("second", expires)).await;

        assert_eq!(store.load("+1").await.unwrap().description, "second");
    }

    #[tokio::test]
    async fn test_stage_sets_expiry_from_ttl() {
        let store = PendingActionStore::new(Duration::from_secs(60));
        let before = Utc::now();
        store
            .stage(
                "+1",
                StagedAction::new(ActionKind::CreateEvent, "Standup", json!({"at": "9:00"})),
            )
            .await
            .unwrap();

        let pending = store.load("+1").await.unwrap();
        assert_eq!(pending.kind, ActionKind::CreateEvent);
        assert!(pending.expires_at >= before + chrono::Duration::seconds(60));
        assert!(pending.expires_at <= Utc::now() + chrono::Duration::seconds(60));
    }

    #[tokio::test]
    async fn test_database_round_trip_and_expiry() {
        let store = PendingActionStore::with_database(test_db().await, Duration::from_secs(300));
        let expires = Utc
            .timestamp_millis_opt(Utc::now().timestamp_millis() + 300_000)
            .unwrap();
        store.save("+1", action("Email Ann", expires)).await;

        let loaded = store.load("+1").await.unwrap();
        assert_eq!(loaded, action("Email Ann", expires));

        assert!(store.load_at("+1", expires).await.is_none());
        assert!(store.load("+1").await.is_none());
    }

    #[tokio::test]
    async fn test_prune_expired() {
        let store = PendingActionStore::with_database(test_db().await, Duration::from_secs(300));
        let now = Utc::now();
        store
            .save("+1", action("old", now - chrono::Duration::seconds(1)))
            .await;
        store
            .save("+2", action("new", now + chrono::Duration::minutes(5)))
            .await;

        assert_eq!(store.prune_expired(now).await, 1);
        assert!(store.load("+2").await.is_some());
    }

    #[tokio::test]
    async fn test_stage_reports_database_failure() {
        let db = test_db().await;
        let store = PendingActionStore::with_database(db.clone(), Duration::from_secs(300));
        db.close().await;

        let result = store
            .stage("+1", StagedAction::new(ActionKind::DraftEmail, "x", json!({})))
            .await;
        assert!(result.is_err());
        assert!(store.load("+1").await.is_none());
    }
}

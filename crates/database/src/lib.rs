//! SQLite persistence layer for the operations assistant.
//!
//! This crate provides async database operations for conversation history,
//! pending actions, session preferences and usage records using SQLx with
//! SQLite. Payloads are stored as JSON text; typed (de)serialization lives
//! in the adapters that own the domain types.
//!
//! # Example
//!
//! ```no_run
//! use database::{conversation, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:assistant.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     conversation::upsert_conversation(db.pool(), "+15551234567", "[]", 0).await?;
//!     Ok(())
//! }
//! ```

pub mod conversation;
pub mod error;
pub mod models;
pub mod pending_action;
pub mod preference;
pub mod usage;

pub use error::{DatabaseError, Result};
pub use models::{Conversation, PendingActionRecord, Preference, UsageRecord};

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    /// Set high enough to handle concurrent sessions.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/assistant.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing, one connection so all queries share it)
    /// let db = database::Database::connect_with_pool_size("sqlite::memory:", 1).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> Database {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_conversation_crud() {
        let db = test_db().await;

        assert!(conversation::get_conversation(db.pool(), "+1")
            .await
            .unwrap()
            .is_none());

        conversation::upsert_conversation(db.pool(), "+1", "[1]", 1)
            .await
            .unwrap();
        conversation::upsert_conversation(db.pool(), "+1", "[1,2]", 2)
            .await
            .unwrap();

        let fetched = conversation::get_conversation(db.pool(), "+1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.turns, "[1,2]");
        assert_eq!(fetched.turn_count, 2);

        conversation::delete_conversation(db.pool(), "+1").await.unwrap();
        assert!(conversation::get_conversation(db.pool(), "+1")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_pending_action_upsert_overwrites() {
        let db = test_db().await;

        pending_action::upsert_pending_action(db.pool(), "+1", "draft-email", "first", "{}", 100)
            .await
            .unwrap();
        pending_action::upsert_pending_action(db.pool(), "+1", "create-event", "second", "{}", 200)
            .await
            .unwrap();

        let record = pending_action::get_pending_action(db.pool(), "+1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.kind, "create-event");
        assert_eq!(record.description, "second");
        assert_eq!(record.expires_at_ms, 200);
    }

    #[tokio::test]
    async fn test_pending_action_prune_expired() {
        let db = test_db().await;

        pending_action::upsert_pending_action(db.pool(), "+1", "draft-email", "old", "{}", 100)
            .await
            .unwrap();
        pending_action::upsert_pending_action(db.pool(), "+2", "draft-email", "new", "{}", 500)
            .await
            .unwrap();

        let pruned = pending_action::prune_expired(db.pool(), 100).await.unwrap();
        assert_eq!(pruned, 1);
        assert!(pending_action::get_pending_action(db.pool(), "+1")
            .await
            .unwrap()
            .is_none());
        assert!(pending_action::get_pending_action(db.pool(), "+2")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_preferences_are_per_session() {
        let db = test_db().await;

        preference::upsert_preference(db.pool(), "+1", "reply_mode", "voice")
            .await
            .unwrap();
        preference::upsert_preference(db.pool(), "+2", "reply_mode", "text")
            .await
            .unwrap();
        preference::clear_preferences(db.pool(), "+2").await.unwrap();

        let first = preference::get_preference(db.pool(), "+1", "reply_mode")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(first.value, "voice");
        assert!(preference::get_preference(db.pool(), "+2", "reply_mode")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_usage_insert_and_list() {
        let db = test_db().await;

        usage::insert_usage(db.pool(), "+1", "fast", 100, 20, 350, 1)
            .await
            .unwrap();
        usage::insert_usage(db.pool(), "+1", "fast+capable", 900, 150, 4200, 6)
            .await
            .unwrap();

        let rows = usage::list_usage(db.pool(), "+1", 10).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].models, "fast+capable");
        assert_eq!(rows[0].tool_calls, 6);
    }
}

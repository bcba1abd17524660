//! Conversation history persistence.
//!
//! Rows are written with a plain upsert (last writer wins); callers that
//! need ordering must serialize saves per session themselves.

use sqlx::SqlitePool;

use crate::models::Conversation;
use crate::Result;

/// Create or replace the stored turns for a session.
pub async fn upsert_conversation(
    pool: &SqlitePool,
    session_key: &str,
    turns_json: &str,
    turn_count: i64,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO conversations (session_key, turns, turn_count)
        VALUES (?, ?, ?)
        ON CONFLICT(session_key) DO UPDATE SET
            turns = excluded.turns,
            turn_count = excluded.turn_count,
            updated_at = datetime('now')
        "#,
    )
    .bind(session_key)
    .bind(turns_json)
    .bind(turn_count)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get the stored conversation for a session.
pub async fn get_conversation(
    pool: &SqlitePool,
    session_key: &str,
) -> Result<Option<Conversation>> {
    let record = sqlx::query_as::<_, Conversation>(
        r#"
        SELECT session_key, turns, turn_count, updated_at
        FROM conversations
        WHERE session_key = ?
        "#,
    )
    .bind(session_key)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Remove the conversation row for a session entirely.
pub async fn delete_conversation(pool: &SqlitePool, session_key: &str) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM conversations
        WHERE session_key = ?
        "#,
    )
    .bind(session_key)
    .execute(pool)
    .await?;

    Ok(())
}

//! Pending action persistence.

use sqlx::SqlitePool;

use crate::models::PendingActionRecord;
use crate::Result;

/// Create or overwrite the pending action for a session.
pub async fn upsert_pending_action(
    pool: &SqlitePool,
    session_key: &str,
    kind: &str,
    description: &str,
    params_json: &str,
    expires_at_ms: i64,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO pending_actions (session_key, kind, description, params, expires_at_ms)
        VALUES (?, ?, ?, ?, ?)
        ON CONFLICT(session_key) DO UPDATE SET
            kind = excluded.kind,
            description = excluded.description,
            params = excluded.params,
            expires_at_ms = excluded.expires_at_ms,
            created_at = datetime('now')
        "#,
    )
    .bind(session_key)
    .bind(kind)
    .bind(description)
    .bind(params_json)
    .bind(expires_at_ms)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get the pending action for a session, expired or not.
pub async fn get_pending_action(
    pool: &SqlitePool,
    session_key: &str,
) -> Result<Option<PendingActionRecord>> {
    let record = sqlx::query_as::<_, PendingActionRecord>(
        r#"
        SELECT session_key, kind, description, params, expires_at_ms, created_at
        FROM pending_actions
        WHERE session_key = ?
        "#,
    )
    .bind(session_key)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Clear the pending action for a session.
pub async fn delete_pending_action(pool: &SqlitePool, session_key: &str) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM pending_actions
        WHERE session_key = ?
        "#,
    )
    .bind(session_key)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete every pending action that expired at or before `now_ms`.
pub async fn prune_expired(pool: &SqlitePool, now_ms: i64) -> Result<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM pending_actions
        WHERE expires_at_ms <= ?
        "#,
    )
    .bind(now_ms)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

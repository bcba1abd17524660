//! Usage record persistence.

use sqlx::SqlitePool;

use crate::models::UsageRecord;
use crate::Result;

/// Insert a usage record for one agent-loop run.
pub async fn insert_usage(
    pool: &SqlitePool,
    session_key: &str,
    models: &str,
    input_tokens: i64,
    output_tokens: i64,
    latency_ms: i64,
    tool_calls: i64,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO usage_records (session_key, models, input_tokens, output_tokens, latency_ms, tool_calls)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(session_key)
    .bind(models)
    .bind(input_tokens)
    .bind(output_tokens)
    .bind(latency_ms)
    .bind(tool_calls)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get recent usage records for a session, newest first.
pub async fn list_usage(
    pool: &SqlitePool,
    session_key: &str,
    limit: i64,
) -> Result<Vec<UsageRecord>> {
    let rows = sqlx::query_as::<_, UsageRecord>(
        r#"
        SELECT id, session_key, models, input_tokens, output_tokens, latency_ms, tool_calls, created_at
        FROM usage_records
        WHERE session_key = ?
        ORDER BY id DESC
        LIMIT ?
        "#,
    )
    .bind(session_key)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

//! Per-session preference storage.

use sqlx::SqlitePool;

use crate::models::Preference;
use crate::Result;

/// Create or update a preference entry.
pub async fn upsert_preference(
    pool: &SqlitePool,
    session_key: &str,
    name: &str,
    value: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO session_preferences (session_key, name, value)
        VALUES (?, ?, ?)
        ON CONFLICT(session_key, name) DO UPDATE SET
            value = excluded.value,
            updated_at = datetime('now')
        "#,
    )
    .bind(session_key)
    .bind(name)
    .bind(value)
    .execute(pool)
    .await?;

    Ok(())
}

/// Get a preference entry.
pub async fn get_preference(
    pool: &SqlitePool,
    session_key: &str,
    name: &str,
) -> Result<Option<Preference>> {
    let record = sqlx::query_as::<_, Preference>(
        r#"
        SELECT session_key, name, value, updated_at
        FROM session_preferences
        WHERE session_key = ? AND name = ?
        "#,
    )
    .bind(session_key)
    .bind(name)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// Clear every preference for a session.
pub async fn clear_preferences(pool: &SqlitePool, session_key: &str) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM session_preferences
        WHERE session_key = ?
        "#,
    )
    .bind(session_key)
    .execute(pool)
    .await?;

    Ok(())
}

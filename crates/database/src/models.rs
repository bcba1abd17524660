//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored conversation for one chat session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Conversation {
    /// Opaque session key (sender or `group:<id>`).
    pub session_key: String,
    /// JSON array of turns, oldest first.
    pub turns: String,
    /// Number of turns in `turns`.
    pub turn_count: i64,
    /// Last update timestamp.
    pub updated_at: String,
}

/// A staged action awaiting user confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PendingActionRecord {
    pub session_key: String,
    /// Action kind, e.g. "draft-email".
    pub kind: String,
    /// Human-readable description shown to the user.
    pub description: String,
    /// JSON parameter payload.
    pub params: String,
    /// Expiry as Unix milliseconds.
    pub expires_at_ms: i64,
    pub created_at: String,
}

/// A stored per-session preference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Preference {
    pub session_key: String,
    /// Preference name, e.g. "reply_mode".
    pub name: String,
    pub value: String,
    pub updated_at: String,
}

/// Usage for one agent-loop run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UsageRecord {
    pub id: i64,
    pub session_key: String,
    /// Tier label, e.g. "fast+capable".
    pub models: String,
    pub input_tokens: i64,
    pub output_tokens: i64,
    pub latency_ms: i64,
    pub tool_calls: i64,
    pub created_at: String,
}

//! Conversation history storage with a rolling window.

use std::collections::HashMap;

use brain_core::{ContentBlock, Turn};
use database::conversation as conversation_store;
use database::Database;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Marker appended to stored tool-result payloads that were cut.
pub const TRUNCATION_MARKER: &str = "…[truncated]";

/// Per-session conversation history.
///
/// Backed by SQLite when a database is given, otherwise held in memory.
/// Reads never fail: a missing or unreadable row is an empty history.
/// Write failures are logged and swallowed.
pub struct HistoryStore {
    memory: RwLock<HashMap<String, Vec<Turn>>>,
    database: Option<Database>,
    max_turns: usize,
    result_max_chars: usize,
}

impl HistoryStore {
    /// Create an in-memory history store.
    pub fn new(max_turns: usize, result_max_chars: usize) -> Self {
        Self {
            memory: RwLock::new(HashMap::new()),
            database: None,
            max_turns,
            result_max_chars,
        }
    }

    /// Create a history store backed by a persistent database.
    pub fn with_database(database: Database, max_turns: usize, result_max_chars: usize) -> Self {
        Self {
            database: Some(database),
            ..Self::new(max_turns, result_max_chars)
        }
    }

    /// Load the history for a session, oldest turn first.
    pub async fn load(&self, session_key: &str) -> Vec<Turn> {
        let Some(database) = &self.database else {
            return self
                .memory
                .read()
                .await
                .get(session_key)
                .cloned()
                .unwrap_or_default();
        };

        match conversation_store::get_conversation(database.pool(), session_key).await {
            Ok(Some(record)) => match serde_json::from_str::<Vec<Turn>>(&record.turns) {
                Ok(turns) => turns,
                Err(err) => {
                    warn!("Discarding unreadable history for {}: {}", session_key, err);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!("Failed to load history for {}: {}", session_key, err);
                Vec::new()
            }
        }
    }

    /// Trim, truncate and store the history for a session.
    pub async fn save(&self, session_key: &str, turns: &[Turn]) {
        let trimmed = prepare_for_storage(turns, self.max_turns, self.result_max_chars);
        debug!(
            "Saving {} of {} turns for {}",
            trimmed.len(),
            turns.len(),
            session_key
        );

        let Some(database) = &self.database else {
            self.memory
                .write()
                .await
                .insert(session_key.to_string(), trimmed);
            return;
        };

        let turns_json = match serde_json::to_string(&trimmed) {
            Ok(json) => json,
            Err(err) => {
                warn!("Failed to serialize history for {}: {}", session_key, err);
                return;
            }
        };

        if let Err(err) = conversation_store::upsert_conversation(
            database.pool(),
            session_key,
            &turns_json,
            trimmed.len() as i64,
        )
        .await
        {
            warn!("Failed to persist history for {}: {}", session_key, err);
        }
    }

    /// Remove the history for a session entirely.
    pub async fn clear(&self, session_key: &str) {
        self.memory.write().await.remove(session_key);

        if let Some(database) = &self.database {
            if let Err(err) = conversation_store::delete_conversation(database.pool(), session_key).await
            {
                warn!("Failed to clear history for {}: {}", session_key, err);
            }
        }
    }
}

/// Apply the rolling window, then cap tool-result payloads.
pub fn prepare_for_storage(turns: &[Turn], max_turns: usize, result_max_chars: usize) -> Vec<Turn> {
    let mut kept = trim_history(turns, max_turns);
    for turn in &mut kept {
        for block in &mut turn.content {
            if let ContentBlock::ToolResult { content, .. } = block {
                *content = truncate_payload(content, result_max_chars);
            }
        }
    }
    kept
}

/// Keep at most `max_turns` turns, opening on a user turn.
///
/// After dropping from the front, any leading assistant turn is dropped too,
/// and tool results left without their tool-use turn are stripped from the
/// leading user turn (which is dropped if nothing else remains).
pub fn trim_history(turns: &[Turn], max_turns: usize) -> Vec<Turn> {
    let start = turns.len().saturating_sub(max_turns);
    let mut kept: Vec<Turn> = turns[start..].to_vec();

    let mut skip = 0;
    while let Some(turn) = kept.get_mut(skip) {
        if turn.is_assistant() {
            skip += 1;
            continue;
        }
        turn.content
            .retain(|block| !matches!(block, ContentBlock::ToolResult { .. }));
        if turn.content.is_empty() {
            skip += 1;
            continue;
        }
        break;
    }

    kept.split_off(skip)
}

/// Cut `payload` to `max_chars` characters plus a marker.
///
/// Idempotent: an already-truncated payload comes back unchanged.
pub fn truncate_payload(payload: &str, max_chars: usize) -> String {
    match payload.char_indices().nth(max_chars) {
        None => payload.to_string(),
        Some((cut, _)) => {
            if payload[cut..] == *TRUNCATION_MARKER {
                return payload.to_string();
            }
            format!("{}{}", &payload[..cut], TRUNCATION_MARKER)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brain_core::{Role, ToolResult, ToolUseRequest};
    use serde_json::json;

    fn tool_round(id: &str) -> Vec<Turn> {
        vec![
            Turn::assistant(None, &[ToolUseRequest::new(id, "crm_lookup", json!({}))]),
            Turn::tool_results(&[ToolResult::success(id, "ok")]),
        ]
    }

    #[test]
    fn test_truncate_short_payload_unchanged() {
        assert_eq!(truncate_payload("hello", 10), "hello");
        assert_eq!(truncate_payload("0123456789", 10), "0123456789");
    }

    #[test]
    fn test_truncate_long_payload() {
        let truncated = truncate_payload(&"x".repeat(20), 10);
        assert_eq!(truncated, format!("{}{}", "x".repeat(10), TRUNCATION_MARKER));
    }

    #[test]
    fn test_truncate_is_idempotent() {
        let inputs = vec![
            String::new(),
            "short".to_string(),
            "y".repeat(5000),
            "z".repeat(12_000),
            "é".repeat(13),
        ];
        for input in &inputs {
            let once = truncate_payload(input, 10);
            assert_eq!(truncate_payload(&once, 10), once);
        }
    }

    #[test]
    fn test_trim_respects_cap_and_user_start() {
        let mut turns = vec![Turn::user("q1"), Turn::assistant(Some("a1"), &[])];
        for i in 0..10 {
            turns.push(Turn::user(format!("q{}", i + 2)));
            turns.extend(tool_round(&format!("t{}", i)));
            turns.push(Turn::assistant(Some("done"), &[]));
        }

        for cap in 1..turns.len() + 2 {
            let kept = trim_history(&turns, cap);
            assert!(kept.len() <= cap);
            if let Some(first) = kept.first() {
                assert_eq!(first.role, Role::User);
                assert!(!first
                    .content
                    .iter()
                    .any(|b| matches!(b, ContentBlock::ToolResult { .. })));
            }
        }
    }

    #[test]
    fn test_trim_skips_orphaned_tool_results() {
        let mut turns = vec![Turn::user("q")];
        turns.extend(tool_round("t1"));
        turns.push(Turn::assistant(Some("a"), &[]));
        turns.push(Turn::user("next"));

        // Window of 3 starts at the tool-results turn
        let kept = trim_history(&turns, 3);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].text(), "next");
    }

    #[test]
    fn test_trim_keeps_text_of_mixed_leading_turn() {
        let mut mixed = Turn::tool_results(&[ToolResult::success("t1", "ok")]);
        mixed.content.push(ContentBlock::Text {
            text: "and another thing".to_string(),
        });
        let turns = vec![
            Turn::assistant(None, &[ToolUseRequest::new("t1", "x", json!({}))]),
            mixed,
            Turn::assistant(Some("sure"), &[]),
        ];

        let kept = trim_history(&turns, 2);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].content.len(), 1);
        assert_eq!(kept[0].text(), "and another thing");
    }

    #[test]
    fn test_prepare_truncates_stored_results_only() {
        let turns = vec![
            Turn::user("q"),
            Turn::assistant(None, &[ToolUseRequest::new("t", "x", json!({}))]),
            Turn::tool_results(&[ToolResult::success("t", "r".repeat(50))]),
        ];
        let stored = prepare_for_storage(&turns, 40, 10);

        match &stored[2].content[0] {
            ContentBlock::ToolResult { content, .. } => {
                assert_eq!(content, &format!("{}{}", "r".repeat(10), TRUNCATION_MARKER));
            }
            other => panic!("unexpected block {:?}", other),
        }
        // The caller's copy is untouched
        assert!(matches!(&turns[2].content[0], ContentBlock::ToolResult { content, .. } if content.len() == 50));
    }

    #[tokio::test]
    async fn test_memory_store_round_trip() {
        let store = HistoryStore::new(4, 100);
        assert!(store.load("+1").await.is_empty());

        let turns = vec![
            Turn::user("a"),
            Turn::assistant(Some("b"), &[]),
            Turn::user("c"),
            Turn::assistant(Some("d"), &[]),
            Turn::user("e"),
            Turn::assistant(Some("f"), &[]),
        ];
        store.save("+1", &turns).await;

        let loaded = store.load("+1").await;
        assert_eq!(loaded.len(), 4);
        assert_eq!(loaded[0].text(), "c");

        store.clear("+1").await;
        assert!(store.load("+1").await.is_empty());
    }

    #[tokio::test]
    async fn test_database_store_round_trip() {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        let store = HistoryStore::with_database(db, 40, 5000);

        let turns = vec![Turn::user("hello"), Turn::assistant(Some("hi"), &[])];
        store.save("+1", &turns).await;
        assert_eq!(store.load("+1").await, turns);
        assert!(store.load("+2").await.is_empty());

        store.clear("+1").await;
        assert!(store.load("+1").await.is_empty());
    }

    #[tokio::test]
    async fn test_database_failure_is_swallowed() {
        let db = Database::connect_with_pool_size("sqlite::memory:", 1)
            .await
            .unwrap();
        db.migrate().await.unwrap();
        let store = HistoryStore::with_database(db.clone(), 40, 5000);
        db.close().await;

        store.save("+1", &[Turn::user("hello")]).await;
        assert!(store.load("+1").await.is_empty());
        store.clear("+1").await;
    }
}

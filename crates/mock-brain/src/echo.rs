//! Echo engine - answers with the latest user text.

use async_trait::async_trait;
use brain_core::{BrainError, Completion, ReasoningEngine, Role, ToolDefinition, Turn};

/// An engine that echoes the most recent user text back, never calling tools.
///
/// Useful for running the full message flow offline.
#[derive(Debug, Clone, Default)]
pub struct EchoEngine {
    /// Optional prefix to add before the echo.
    prefix: Option<String>,
}

impl EchoEngine {
    /// Create a new EchoEngine with no prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new EchoEngine with a custom prefix.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mock_brain::EchoEngine;
    ///
    /// let engine = EchoEngine::with_prefix("Echo: ");
    /// // Will respond with "Echo: <latest user text>"
    /// ```
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

#[async_trait]
impl ReasoningEngine for EchoEngine {
    async fn complete(
        &self,
        _model: &str,
        history: &[Turn],
        _tools: &[ToolDefinition],
    ) -> Result<Completion, BrainError> {
        let last_user = history
            .iter()
            .rev()
            .find(|turn| turn.role == Role::User && !turn.is_tool_results())
            .map(|turn| turn.text())
            .unwrap_or_default();

        let text = match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, last_user),
            None => last_user,
        };

        Ok(Completion::text(text))
    }

    fn name(&self) -> &str {
        "EchoEngine"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_no_prefix() {
        let engine = EchoEngine::new();
        let history = vec![Turn::user("first"), Turn::assistant(Some("ok"), &[]), Turn::user("Hello!")];

        let completion = engine.complete("m", &history, &[]).await.unwrap();
        assert_eq!(completion.text.as_deref(), Some("Hello!"));
        assert!(completion.done);
        assert!(completion.tool_uses.is_empty());
    }

    #[tokio::test]
    async fn test_echo_with_prefix() {
        let engine = EchoEngine::with_prefix("Echo: ");
        let completion = engine
            .complete("m", &[Turn::user("Hello!")], &[])
            .await
            .unwrap();
        assert_eq!(completion.text.as_deref(), Some("Echo: Hello!"));
    }

    #[tokio::test]
    async fn test_engine_name() {
        assert_eq!(EchoEngine::new().name(), "EchoEngine");
    }
}

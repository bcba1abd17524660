//! Scripted engine - replays a queue of completions.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use brain_core::{BrainError, Completion, ReasoningEngine, ToolDefinition, Turn};

/// One recorded call to a [`ScriptedEngine`].
#[derive(Debug, Clone)]
pub struct EngineCall {
    /// Model id the loop asked for.
    pub model: String,
    /// Full history sent with the call.
    pub history: Vec<Turn>,
    /// Names of the tools offered.
    pub tool_names: Vec<String>,
}

/// An engine that answers from a fixed script and records every call.
///
/// Once the script runs out it returns the repeat completion if one is set,
/// otherwise a `ProcessingFailed` error.
#[derive(Default)]
pub struct ScriptedEngine {
    script: Mutex<VecDeque<Result<Completion, BrainError>>>,
    repeat: Option<Completion>,
    calls: Mutex<Vec<EngineCall>>,
}

impl ScriptedEngine {
    /// Create an engine that returns the given completions in order.
    pub fn new(completions: impl IntoIterator<Item = Completion>) -> Self {
        Self {
            script: Mutex::new(completions.into_iter().map(Ok).collect()),
            ..Self::default()
        }
    }

    /// Create an engine that returns the same completion forever.
    pub fn repeating(completion: Completion) -> Self {
        Self::new([]).then_repeat(completion)
    }

    /// Create an engine whose first call fails.
    pub fn failing(error: BrainError) -> Self {
        let engine = Self::default();
        engine.push_error(error);
        engine
    }

    /// Completion returned after the script is exhausted.
    pub fn then_repeat(mut self, completion: Completion) -> Self {
        self.repeat = Some(completion);
        self
    }

    /// Append a completion to the script.
    pub fn push(&self, completion: Completion) {
        self.lock_script().push_back(Ok(completion));
    }

    /// Append an error to the script.
    pub fn push_error(&self, error: BrainError) {
        self.lock_script().push_back(Err(error));
    }

    /// All calls made so far.
    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    /// Models requested, in call order.
    pub fn models(&self) -> Vec<String> {
        self.calls().into_iter().map(|call| call.model).collect()
    }

    fn lock_script(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<Completion, BrainError>>> {
        self.script
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl ReasoningEngine for ScriptedEngine {
    async fn complete(
        &self,
        model: &str,
        history: &[Turn],
        tools: &[ToolDefinition],
    ) -> Result<Completion, BrainError> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(EngineCall {
                model: model.to_string(),
                history: history.to_vec(),
                tool_names: tools.iter().map(|tool| tool.name.clone()).collect(),
            });

        match self.lock_script().pop_front() {
            Some(next) => next,
            None => self.repeat.clone().ok_or_else(|| {
                BrainError::ProcessingFailed("script exhausted".to_string())
            }),
        }
    }

    fn name(&self) -> &str {
        "ScriptedEngine"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brain_core::ToolUseRequest;
    use serde_json::json;

    #[tokio::test]
    async fn test_replays_in_order_and_records() {
        let engine = ScriptedEngine::new([
            Completion::tool_uses(vec![ToolUseRequest::new("t1", "current_time", json!({}))]),
            Completion::text("done"),
        ]);

        let first = engine.complete("fast", &[Turn::user("hi")], &[]).await.unwrap();
        assert_eq!(first.tool_uses.len(), 1);
        let second = engine.complete("capable", &[Turn::user("hi")], &[]).await.unwrap();
        assert_eq!(second.text.as_deref(), Some("done"));

        assert_eq!(engine.models(), vec!["fast", "capable"]);
        assert_eq!(engine.calls()[0].history.len(), 1);
    }

    #[tokio::test]
    async fn test_exhausted_script_errors() {
        let engine = ScriptedEngine::new([]);
        let result = engine.complete("fast", &[], &[]).await;
        assert!(matches!(result, Err(BrainError::ProcessingFailed(_))));
        assert_eq!(engine.call_count(), 1);
    }

    #[tokio::test]
    async fn test_repeating() {
        let engine = ScriptedEngine::repeating(Completion::text("again"));
        for _ in 0..3 {
            let completion = engine.complete("fast", &[], &[]).await.unwrap();
            assert_eq!(completion.text.as_deref(), Some("again"));
        }
    }

    #[tokio::test]
    async fn test_failing_first_call() {
        let engine = ScriptedEngine::failing(BrainError::Network("down".to_string()));
        engine.push(Completion::text("recovered"));

        assert!(engine.complete("fast", &[], &[]).await.is_err());
        assert!(engine.complete("fast", &[], &[]).await.is_ok());
    }
}

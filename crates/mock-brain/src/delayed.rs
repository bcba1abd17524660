//! Delayed engine - wraps another engine with artificial delay.

use std::time::Duration;

use brain_core::{async_trait, BrainError, Completion, ReasoningEngine, ToolDefinition, Turn};
use tokio::time::sleep;

/// An engine that wraps another engine and adds artificial delay.
///
/// Useful for testing per-session serialization and simulating model latency.
pub struct DelayedEngine<E: ReasoningEngine> {
    inner: E,
    delay: Duration,
}

impl<E: ReasoningEngine> DelayedEngine<E> {
    /// Create a new DelayedEngine wrapping the given engine with the specified delay.
    pub fn new(inner: E, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Create an engine with a delay in milliseconds.
    pub fn with_millis(inner: E, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }
}

#[async_trait]
impl<E: ReasoningEngine> ReasoningEngine for DelayedEngine<E> {
    async fn complete(
        &self,
        model: &str,
        history: &[Turn],
        tools: &[ToolDefinition],
    ) -> Result<Completion, BrainError> {
        sleep(self.delay).await;
        self.inner.complete(model, history, tools).await
    }

    fn name(&self) -> &str {
        "DelayedEngine"
    }
}

//! Deterministic doubles for testing the agent loop.
//!
//! This crate provides stand-ins for every collaborator the orchestrator
//! drives:
//! - `EchoEngine` - Answers every message by echoing the latest user text
//! - `ScriptedEngine` - Replays a fixed queue of completions and records calls
//! - `DelayedEngine` - Wraps another engine with artificial latency
//! - `RecordingToolExecutor` - Tools with configurable kind, delay and
//!   failure that log when each call starts and ends
//! - `RecordingConfirmedExecutor` - Records confirmed actions
//!
//! For production use, see the `anthropic-brain` and `agent-tools` crates.
//!
//! # Example
//!
//! ```rust
//! use mock_brain::{Completion, EchoEngine, ReasoningEngine, Turn};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_brain::BrainError> {
//!     let engine = EchoEngine::new();
//!     let history = vec![Turn::user("Hello!")];
//!
//!     let completion = engine.complete("any-model", &history, &[]).await?;
//!     assert_eq!(completion.text.as_deref(), Some("Hello!"));
//!     Ok(())
//! }
//! ```

mod confirmed;
mod delayed;
mod echo;
mod scripted;
mod tools;

// Re-export brain-core types for convenience
pub use brain_core::{
    async_trait, BrainError, Completion, ReasoningEngine, ToolUseRequest, Turn,
};

pub use confirmed::RecordingConfirmedExecutor;
pub use delayed::DelayedEngine;
pub use echo::EchoEngine;
pub use scripted::{EngineCall, ScriptedEngine};
pub use tools::{MockTool, RecordingToolExecutor, ToolEvent};

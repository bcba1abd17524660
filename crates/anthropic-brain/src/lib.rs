//! Anthropic Messages API reasoning engine.
//!
//! This crate provides a [`ReasoningEngine`] that sends the conversation
//! history and tool catalogue to the Messages API and turns the reply into
//! a [`Completion`](brain_core::Completion): text, tool-use requests, a done
//! signal and token usage.
//!
//! # Usage
//!
//! ```rust,no_run
//! use anthropic_brain::AnthropicEngine;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let engine = AnthropicEngine::from_env()?;
//!     // Hand the engine to the orchestrator...
//!     Ok(())
//! }
//! ```

mod api_types;
mod config;
mod engine;

pub use config::{AnthropicConfig, AnthropicConfigBuilder, DEFAULT_PROMPT_FILE};
pub use engine::AnthropicEngine;

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, BrainError, Completion, ReasoningEngine};

//! Core conversation types and collaborator traits for the operations assistant.
//!
//! This crate provides the shared vocabulary used by every other crate in the
//! workspace. It defines:
//!
//! - [`Turn`] / [`ContentBlock`] - The persisted conversation format
//! - [`ReasoningEngine`] - The language-model collaborator the agent loop drives
//! - [`ToolExecutor`] - Executes tool-use requests proposed by the engine
//! - [`ConfirmedActionExecutor`] / [`ActionStager`] - The two halves of the
//!   confirm-before-execute protocol for side-effecting tools
//! - [`BrainError`] - Error types for engine operations
//!
//! # Example
//!
//! ```rust
//! use brain_core::{async_trait, BrainError, Completion, ReasoningEngine, ToolDefinition, Turn};
//!
//! struct HelloEngine;
//!
//! #[async_trait]
//! impl ReasoningEngine for HelloEngine {
//!     async fn complete(
//!         &self,
//!         _model: &str,
//!         _history: &[Turn],
//!         _tools: &[ToolDefinition],
//!     ) -> Result<Completion, BrainError> {
//!         Ok(Completion::text("Hello!"))
//!     }
//!
//!     fn name(&self) -> &str {
//!         "HelloEngine"
//!     }
//! }
//! ```

mod actions;
mod conversation;
mod engine;
mod error;
mod message;
mod tools;

pub use actions::{ActionKind, ActionStager, ConfirmedActionExecutor, PendingAction, StagedAction};
pub use conversation::{ContentBlock, Role, Turn};
pub use engine::{Completion, ModelTier, ReasoningEngine, TierSet, Usage};
pub use error::BrainError;
pub use message::{InboundMessage, OutboundMessage, ReplyMode};
pub use tools::{ToolDefinition, ToolExecutor, ToolKind, ToolResult, ToolUseRequest};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

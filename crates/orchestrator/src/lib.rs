//! Conversational tool-calling agent for the operations assistant.
//!
//! This crate provides the [`Orchestrator`] type which takes an inbound chat
//! message, lets a reasoning engine call tools round by round, and stages
//! side-effecting actions until the user confirms them.
//!
//! # Features
//!
//! - Two-tier model routing from message content, with one-way escalation
//! - Concurrent read rounds, strictly sequential write rounds
//! - Confirm-before-execute for write tools (yes / no / edit)
//! - Rolling, truncated conversation history in SQLite or memory
//! - Per-session serialization, typing indicators and chunked replies
//!
//! # Architecture
//!
//! ```text
//! Inbound message (from a transport)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      ORCHESTRATOR                           │
//! │                                                             │
//! │  1. Lock the session, start typing indicator                │
//! │         ↓                                                   │
//! │  2. Commands: /reset, /help, /voice on|off                  │
//! │         ↓                                                   │
//! │  3. Confirmation gate (pending action + yes/no/edit)        │
//! │         ↓                                                   │
//! │  4. Agent loop:                                             │
//! │     • model router picks fast or capable tier               │
//! │     • engine call with history + tool catalogue             │
//! │     • dispatcher runs the round's tools                     │
//! │     • repeat until final answer or round cap                │
//! │         ↓                                                   │
//! │  5. Persist history, report usage                           │
//! │         ↓                                                   │
//! │  6. Stop typing, send reply in chunks                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use brain_core::InboundMessage;
//! use orchestrator::{LoggingSender, Orchestrator, OrchestratorConfig, Stores};
//!
//! let config = OrchestratorConfig::from_env()?;
//! let stores = Stores::in_memory(&config);
//! let tools = Arc::new(my_tool_executor(stores.pending.clone()));
//!
//! let orchestrator = Orchestrator::new(
//!     config,
//!     stores,
//!     Arc::new(my_engine),
//!     tools.clone(),
//!     tools,
//!     LoggingSender,
//! );
//!
//! orchestrator
//!     .handle(&InboundMessage::direct("+15551234567", "What's on today?", 0))
//!     .await?;
//! ```

mod agent_loop;
mod confirmation;
mod dispatcher;
mod error;
mod orchestrator;
mod session;
mod stores;

pub mod config;
pub mod history;
pub mod model_selection;
pub mod pending;
pub mod preferences;
pub mod sender;
pub mod split;
pub mod usage;

pub use agent_loop::{AgentLoop, AgentReply, EMPTY_REPLY, FALLBACK_REPLY};
pub use config::OrchestratorConfig;
pub use confirmation::{
    ConfirmationGate, Directive, GateOutcome, CANCELLED_REPLY, CONFIRM_FAILED_REPLY,
};
pub use dispatcher::ToolDispatcher;
pub use error::OrchestratorError;
pub use history::HistoryStore;
pub use model_selection::ModelRouter;
pub use orchestrator::{
    engine_failure_reply, Command, Orchestrator, ENGINE_FAILED_REPLY, ENGINE_UNREACHABLE_REPLY,
    HELP_TEXT, RESET_REPLY,
};
pub use pending::PendingActionStore;
pub use preferences::PreferenceStore;
pub use sender::{LoggingSender, MessageSender, NoOpSender, RecordingSender};
pub use session::SessionLocks;
pub use split::split_message;
pub use stores::Stores;
pub use usage::{DatabaseUsageSink, LoggingUsageSink, UsageReport, UsageSink};

// Re-export brain-core types for convenience
pub use brain_core::{InboundMessage, OutboundMessage, ReplyMode};

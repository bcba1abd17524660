//! Error types for orchestrator operations.

use brain_core::BrainError;
use database::DatabaseError;
use thiserror::Error;

/// Errors that can occur during orchestration.
///
/// Most failures never reach the caller: engine errors become a reply,
/// persistence errors are logged inside the stores. What remains here is
/// what a transport or the binary has to act on.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Reasoning engine failed.
    #[error("brain error: {0}")]
    Brain(#[from] BrainError),

    /// Durable store failed.
    #[error("persistence error: {0}")]
    Persistence(#[from] DatabaseError),

    /// Message sending failed.
    #[error("send failed: {0}")]
    SendFailed(String),

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Configuration(String),
}

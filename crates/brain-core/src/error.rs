//! Error types for reasoning-engine operations.

use thiserror::Error;

/// Errors that can occur while talking to a reasoning engine.
#[derive(Debug, Error)]
pub enum BrainError {
    /// Missing or invalid configuration (e.g. an unset API key).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request could not reach the provider.
    #[error("network error: {0}")]
    Network(String),

    /// The provider rejected or failed the request.
    #[error("processing failed: {0}")]
    ProcessingFailed(String),

    /// The provider answered with something we could not interpret.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

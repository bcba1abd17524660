//! Error types for tool operations.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during tool execution.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Tool not found in registry.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// Missing required parameter.
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    /// Invalid parameter value.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// General execution error.
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// The tool did not finish within the policy timeout.
    #[error("Tool execution timed out after {0:?}")]
    Timeout(Duration),

    /// A confirmed action has no tool able to perform it.
    #[error("Action cannot be confirmed: {0}")]
    NotConfirmable(String),

    /// Recording a staged action failed.
    #[error("Could not stage action: {0}")]
    StagingFailed(String),
}

//! Tool-use support for the agent loop.
//!
//! The reasoning engine proposes [`ToolUseRequest`]s; a [`ToolExecutor`]
//! turns each one into a [`ToolResult`] carrying the same id. Every tool is
//! described by a [`ToolDefinition`] whose [`ToolKind`] decides how a round
//! containing it is scheduled.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::conversation::ContentBlock;

/// Whether a tool only reads, or causes an external side effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Read,
    Write,
}

/// A tool as advertised to the reasoning engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema of the tool's input object.
    pub input_schema: Value,
    /// Classification; never sent to the engine.
    #[serde(skip)]
    pub kind: ToolKind,
}

impl ToolDefinition {
    /// Create a read-only tool definition.
    pub fn read(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
            kind: ToolKind::Read,
        }
    }

    /// Create a side-effecting tool definition.
    pub fn write(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            kind: ToolKind::Write,
            ..Self::read(name, description, input_schema)
        }
    }
}

/// A tool invocation proposed by the reasoning engine within one round.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolUseRequest {
    /// Opaque id used to correlate the result.
    pub id: String,
    /// Name of the tool to execute.
    pub name: String,
    /// Structured input payload.
    pub input: Value,
}

impl ToolUseRequest {
    pub fn new(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            input,
        }
    }

    /// Get a string input field by name.
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.input.get(key).and_then(|v| v.as_str())
    }

    /// Get a required string input field, or return an error message.
    pub fn require_string(&self, key: &str) -> Result<&str, String> {
        self.get_string(key)
            .ok_or_else(|| format!("Missing required argument: {}", key))
    }
}

/// Result of a tool execution.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    /// The tool call ID this result corresponds to.
    pub tool_call_id: String,
    /// The result content (will be sent back to the model).
    pub content: String,
    /// Whether the tool execution succeeded.
    pub success: bool,
}

impl ToolResult {
    /// Create a successful tool result.
    pub fn success(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
            success: true,
        }
    }

    /// Create a failed tool result.
    pub fn error(tool_call_id: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            tool_call_id: tool_call_id.into(),
            content: error.into(),
            success: false,
        }
    }

    /// Convert into the content block stored in a tool-results turn.
    pub fn to_block(&self) -> ContentBlock {
        ContentBlock::ToolResult {
            tool_use_id: self.tool_call_id.clone(),
            content: self.content.clone(),
            is_error: !self.success,
        }
    }
}

/// Trait for executing tools proposed by the reasoning engine.
///
/// Failures are reported as [`ToolResult::error`] rather than as a Rust
/// error: a failed tool never aborts a round, the model decides how to react.
/// Implementations own any retry policy.
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Execute a tool on behalf of a session and return the result.
    async fn execute(&self, request: ToolUseRequest, session_key: &str) -> ToolResult;

    /// The tool catalogue offered to the engine, with classifications.
    fn definitions(&self) -> Vec<ToolDefinition>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_result_success() {
        let result = ToolResult::success("call-123", "Some data");
        assert!(result.success);
        assert_eq!(result.tool_call_id, "call-123");
        assert_eq!(result.content, "Some data");
    }

    #[test]
    fn test_tool_result_error_block() {
        let result = ToolResult::error("call-456", "Something went wrong");
        assert!(!result.success);
        assert_eq!(
            result.to_block(),
            ContentBlock::ToolResult {
                tool_use_id: "call-456".to_string(),
                content: "Something went wrong".to_string(),
                is_error: true,
            }
        );
    }

    #[test]
    fn test_require_string_missing() {
        let request = ToolUseRequest::new("id-1", "draft_email", json!({"to": "ann@example.com"}));
        assert_eq!(request.get_string("to"), Some("ann@example.com"));
        assert!(request.require_string("subject").is_err());
    }

    #[test]
    fn test_definition_kind_not_serialized() {
        let def = ToolDefinition::write("create_event", "Create a calendar event", json!({"type": "object"}));
        assert_eq!(def.kind, ToolKind::Write);

        let value = serde_json::to_value(&def).unwrap();
        assert!(value.get("kind").is_none());
        assert_eq!(value["name"], "create_event");
    }
}

//! Tool trait definition and types.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use brain_core::{ActionKind, ActionStager, StagedAction, ToolKind};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::ToolError;

/// Arguments passed to a tool for execution.
#[derive(Clone)]
pub struct ToolArgs {
    /// Parameters as key-value pairs.
    pub params: HashMap<String, Value>,
    /// Session the call is made for.
    pub session_key: String,
    /// Where write tools record actions awaiting confirmation.
    pub stager: Option<Arc<dyn ActionStager>>,
}

impl ToolArgs {
    /// Create new tool arguments with the given parameters.
    pub fn new(params: HashMap<String, Value>, session_key: impl Into<String>) -> Self {
        Self {
            params,
            session_key: session_key.into(),
            stager: None,
        }
    }

    /// Build arguments from a JSON object value.
    pub fn from_value(input: &Value, session_key: impl Into<String>) -> Result<Self, ToolError> {
        let params = match input {
            Value::Object(map) => map.clone().into_iter().collect(),
            Value::Null => HashMap::new(),
            _ => {
                return Err(ToolError::InvalidParameter {
                    name: "input".to_string(),
                    reason: "expected object".to_string(),
                })
            }
        };
        Ok(Self::new(params, session_key))
    }

    /// Attach a stager for write tools.
    pub fn with_stager(mut self, stager: Arc<dyn ActionStager>) -> Self {
        self.stager = Some(stager);
        self
    }

    /// The parameters as a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.params.clone().into_iter().collect())
    }

    /// Get a string parameter, returning an error if missing or not a string.
    pub fn get_string(&self, key: &str) -> Result<String, ToolError> {
        self.params
            .get(key)
            .ok_or_else(|| ToolError::MissingParameter(key.to_string()))?
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| ToolError::InvalidParameter {
                name: key.to_string(),
                reason: "expected string".to_string(),
            })
    }

    /// Get an optional string parameter.
    pub fn get_string_opt(&self, key: &str) -> Option<String> {
        self.params.get(key)?.as_str().map(|s| s.to_string())
    }

    /// Get an optional f64 parameter.
    pub fn get_number_opt(&self, key: &str) -> Result<Option<f64>, ToolError> {
        match self.params.get(key) {
            Some(v) => {
                let num = v.as_f64().ok_or_else(|| ToolError::InvalidParameter {
                    name: key.to_string(),
                    reason: "expected number".to_string(),
                })?;
                Ok(Some(num))
            }
            None => Ok(None),
        }
    }

    /// Stage an action for the user to confirm, replacing any earlier one.
    pub async fn stage(&self, action: StagedAction) -> Result<(), ToolError> {
        let stager = self
            .stager
            .as_ref()
            .ok_or_else(|| ToolError::StagingFailed("no action stager configured".to_string()))?;
        stager
            .stage(&self.session_key, action)
            .await
            .map_err(ToolError::StagingFailed)
    }
}

/// Output from a tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    /// The result content (text or JSON).
    pub content: String,
    /// Whether the execution was successful.
    pub success: bool,
}

impl ToolOutput {
    /// Create a successful output.
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            success: true,
        }
    }

    /// Create a failed output.
    pub fn failure(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            success: false,
        }
    }
}

/// A capability offered to the reasoning engine.
///
/// Read tools answer immediately. Write tools normally stage a
/// [`StagedAction`] from `execute` and perform the side effect in
/// `confirm` once the user says yes.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The tool's unique name (used for dispatch).
    fn name(&self) -> &str;

    /// Human-readable description of what the tool does.
    fn description(&self) -> &str;

    /// JSON schema of the input object.
    fn input_schema(&self) -> Value {
        json!({"type": "object", "properties": {}})
    }

    /// Read or write classification.
    fn kind(&self) -> ToolKind {
        ToolKind::Read
    }

    /// The staged action kind this tool performs on confirmation.
    fn action_kind(&self) -> Option<ActionKind> {
        None
    }

    /// Execute the tool with the given arguments.
    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError>;

    /// Perform a previously staged action with its recorded parameters.
    async fn confirm(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let _ = args;
        Err(ToolError::NotConfirmable(self.name().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_value_object() {
        let args = ToolArgs::from_value(&json!({"to": "ann", "count": 2}), "+1").unwrap();
        assert_eq!(args.get_string("to").unwrap(), "ann");
        assert_eq!(args.get_number_opt("count").unwrap(), Some(2.0));
        assert_eq!(args.session_key, "+1");
    }

    #[test]
    fn test_from_value_null_is_empty() {
        let args = ToolArgs::from_value(&Value::Null, "+1").unwrap();
        assert!(args.params.is_empty());
    }

    #[test]
    fn test_from_value_rejects_non_object() {
        let result = ToolArgs::from_value(&json!([1, 2]), "+1");
        assert!(matches!(result, Err(ToolError::InvalidParameter { .. })));
    }

    #[test]
    fn test_get_string_errors() {
        let args = ToolArgs::from_value(&json!({"n": 1}), "+1").unwrap();
        assert!(matches!(
            args.get_string("missing"),
            Err(ToolError::MissingParameter(_))
        ));
        assert!(matches!(
            args.get_string("n"),
            Err(ToolError::InvalidParameter { .. })
        ));
    }

    #[tokio::test]
    async fn test_stage_without_stager_fails() {
        let args = ToolArgs::from_value(&json!({}), "+1").unwrap();
        let result = args
            .stage(StagedAction::new(ActionKind::DraftEmail, "Email", json!({})))
            .await;
        assert!(matches!(result, Err(ToolError::StagingFailed(_))));
    }
}

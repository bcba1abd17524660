//! Recording tool executor with configurable tools.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use brain_core::{
    ActionKind, ActionStager, StagedAction, ToolDefinition, ToolExecutor, ToolKind, ToolResult,
    ToolUseRequest,
};
use serde_json::json;
use tokio::time::sleep;

/// A tool served by [`RecordingToolExecutor`].
#[derive(Debug, Clone)]
pub struct MockTool {
    pub name: String,
    pub kind: ToolKind,
    pub delay: Duration,
    pub output: Result<String, String>,
    /// Action staged when a write tool runs.
    pub stages: Option<ActionKind>,
}

impl MockTool {
    /// A read tool answering with `output`.
    pub fn read(name: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ToolKind::Read,
            delay: Duration::ZERO,
            output: Ok(output.into()),
            stages: None,
        }
    }

    /// A write tool that stages `action` and reports it is awaiting confirmation.
    pub fn write(name: impl Into<String>, action: ActionKind) -> Self {
        Self {
            kind: ToolKind::Write,
            stages: Some(action),
            output: Ok("Staged, awaiting confirmation".to_string()),
            ..Self::read(name, "")
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Make every call fail with `error`.
    pub fn failing(mut self, error: impl Into<String>) -> Self {
        self.output = Err(error.into());
        self
    }
}

/// Start and end of one tool call, by request id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolEvent {
    Started(String),
    Finished(String),
}

/// Executes [`MockTool`]s, logging when each call starts and finishes.
pub struct RecordingToolExecutor {
    tools: Vec<MockTool>,
    stager: Option<Arc<dyn ActionStager>>,
    events: Mutex<Vec<ToolEvent>>,
    requests: Mutex<Vec<ToolUseRequest>>,
}

impl RecordingToolExecutor {
    pub fn new(tools: impl IntoIterator<Item = MockTool>) -> Self {
        Self {
            tools: tools.into_iter().collect(),
            stager: None,
            events: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Give write tools somewhere to stage their pending actions.
    pub fn with_stager(mut self, stager: Arc<dyn ActionStager>) -> Self {
        self.stager = Some(stager);
        self
    }

    /// Start/finish log across all calls.
    pub fn events(&self) -> Vec<ToolEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Requests received, in arrival order.
    pub fn requests(&self) -> Vec<ToolUseRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn record(&self, event: ToolEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }
}

#[async_trait]
impl ToolExecutor for RecordingToolExecutor {
    async fn execute(&self, request: ToolUseRequest, session_key: &str) -> ToolResult {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        let Some(tool) = self.tools.iter().find(|tool| tool.name == request.name) else {
            return ToolResult::error(&request.id, format!("Unknown tool: {}", request.name));
        };

        self.record(ToolEvent::Started(request.id.clone()));
        if !tool.delay.is_zero() {
            sleep(tool.delay).await;
        }

        if let (Some(kind), Some(stager)) = (tool.stages, self.stager.as_ref()) {
            let action = StagedAction::new(
                kind,
                format!("{} {}", tool.name, request.input),
                request.input.clone(),
            );
            if let Err(error) = stager.stage(session_key, action).await {
                self.record(ToolEvent::Finished(request.id.clone()));
                return ToolResult::error(&request.id, error);
            }
        }

        self.record(ToolEvent::Finished(request.id.clone()));

        match &tool.output {
            Ok(content) => ToolResult::success(&request.id, content.clone()),
            Err(error) => ToolResult::error(&request.id, error.clone()),
        }
    }

    fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|tool| ToolDefinition {
                name: tool.name.clone(),
                description: format!("Mock {}", tool.name),
                input_schema: json!({"type": "object", "properties": {}}),
                kind: tool.kind,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingStager(Mutex<Vec<StagedAction>>);

    #[async_trait]
    impl ActionStager for CountingStager {
        async fn stage(&self, _session_key: &str, action: StagedAction) -> Result<(), String> {
            self.0.lock().unwrap().push(action);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_read_tool_records_events() {
        let executor = RecordingToolExecutor::new([MockTool::read("calendar_today", "2 meetings")]);
        let result = executor
            .execute(ToolUseRequest::new("a", "calendar_today", json!({})), "+1")
            .await;

        assert!(result.success);
        assert_eq!(result.content, "2 meetings");
        assert_eq!(
            executor.events(),
            vec![
                ToolEvent::Started("a".to_string()),
                ToolEvent::Finished("a".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_write_tool_stages() {
        let stager = Arc::new(CountingStager::default());
        let executor = RecordingToolExecutor::new([MockTool::write("draft_email", ActionKind::DraftEmail)])
            .with_stager(stager.clone());

        let result = executor
            .execute(ToolUseRequest::new("w", "draft_email", json!({"to": "ann"})), "+1")
            .await;
        assert!(result.success);

        let staged = stager.0.lock().unwrap().clone();
        assert_eq!(staged.len(), 1);
        assert_eq!(staged[0].kind, ActionKind::DraftEmail);
        assert_eq!(staged[0].params, json!({"to": "ann"}));
    }

    #[tokio::test]
    async fn test_failing_and_unknown_tools() {
        let executor = RecordingToolExecutor::new([MockTool::read("crm", "").failing("CRM down")]);

        let failed = executor
            .execute(ToolUseRequest::new("1", "crm", json!({})), "+1")
            .await;
        assert!(!failed.success);
        assert_eq!(failed.content, "CRM down");

        let unknown = executor
            .execute(ToolUseRequest::new("2", "nope", json!({})), "+1")
            .await;
        assert!(!unknown.success);
        assert_eq!(unknown.tool_call_id, "2");
    }

    #[test]
    fn test_definitions_carry_kind() {
        let executor = RecordingToolExecutor::new([
            MockTool::read("calendar_today", ""),
            MockTool::write("create_event", ActionKind::CreateEvent),
        ]);
        let defs = executor.definitions();
        assert_eq!(defs[0].kind, ToolKind::Read);
        assert_eq!(defs[1].kind, ToolKind::Write);
    }
}

//! Reminder scheduling, a write tool gated behind user confirmation.

use async_trait::async_trait;
use brain_core::{ActionKind, StagedAction, ToolKind};
use serde_json::{json, Value};
use tracing::info;

use crate::error::ToolError;
use crate::tool::{Tool, ToolArgs, ToolOutput};

/// Stages a reminder; the reminder is only recorded once the user confirms.
///
/// # Parameters
///
/// - `text` (required): what to be reminded about
/// - `when` (required): free-form time, e.g. "tomorrow 9am"
pub struct ScheduleReminder;

impl ScheduleReminder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ScheduleReminder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ScheduleReminder {
    fn name(&self) -> &str {
        "schedule_reminder"
    }

    fn description(&self) -> &str {
        "Schedule a reminder for the user. The user is asked to confirm before it is saved."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": {"type": "string", "description": "What to remind about"},
                "when": {"type": "string", "description": "When to send the reminder"}
            },
            "required": ["text", "when"]
        })
    }

    fn kind(&self) -> ToolKind {
        ToolKind::Write
    }

    fn action_kind(&self) -> Option<ActionKind> {
        Some(ActionKind::ScheduleReminder)
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let text = args.get_string("text")?;
        let when = args.get_string("when")?;
        let description = format!("Reminder \"{}\" at {}", text, when);

        args.stage(StagedAction::new(
            ActionKind::ScheduleReminder,
            description.clone(),
            json!({"text": text, "when": when}),
        ))
        .await?;

        Ok(ToolOutput::success(format!(
            "Staged: {}. Ask the user to reply yes to confirm or no to cancel.",
            description
        )))
    }

    async fn confirm(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let text = args.get_string("text")?;
        let when = args.get_string("when")?;
        info!("Reminder scheduled for {}: {} at {}", args.session_key, text, when);
        Ok(ToolOutput::success(format!(
            "Done. I'll remind you \"{}\" at {}.",
            text, when
        )))
    }
}

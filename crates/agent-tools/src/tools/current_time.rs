//! Current date and time tool.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use serde_json::{json, Value};

use crate::error::ToolError;
use crate::tool::{Tool, ToolArgs, ToolOutput};

/// Reports the current date and time.
///
/// # Parameters
///
/// - `utc_offset_hours` (optional): offset from UTC, e.g. `-5` or `5.5`.
pub struct CurrentTime;

impl CurrentTime {
    pub fn new() -> Self {
        Self
    }

    fn offset_from_hours(hours: f64) -> Result<FixedOffset, ToolError> {
        let seconds = (hours * 3600.0).round() as i32;
        FixedOffset::east_opt(seconds).ok_or_else(|| ToolError::InvalidParameter {
            name: "utc_offset_hours".to_string(),
            reason: format!("{} is not a valid UTC offset", hours),
        })
    }

    fn format(now: DateTime<Utc>, offset: FixedOffset) -> String {
        let local = now.with_timezone(&offset);
        format!(
            "{} (UTC{})",
            local.format("%A, %B %-d, %Y %H:%M"),
            local.format("%:z")
        )
    }
}

impl Default for CurrentTime {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for CurrentTime {
    fn name(&self) -> &str {
        "current_time"
    }

    fn description(&self) -> &str {
        "Get the current date and time, optionally shifted to a UTC offset in hours."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "utc_offset_hours": {
                    "type": "number",
                    "description": "Offset from UTC in hours, e.g. -5 for US Eastern standard time"
                }
            }
        })
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let offset = match args.get_number_opt("utc_offset_hours")? {
            Some(hours) => Self::offset_from_hours(hours)?,
            None => Self::offset_from_hours(0.0)?,
        };
        Ok(ToolOutput::success(Self::format(Utc::now(), offset)))
    }
}

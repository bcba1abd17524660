//! Recording confirmed-action executor.

use std::sync::Mutex;

use async_trait::async_trait;
use brain_core::{ConfirmedActionExecutor, PendingAction};

/// Records every confirmed action and answers with a fixed outcome.
pub struct RecordingConfirmedExecutor {
    outcome: Result<String, String>,
    executed: Mutex<Vec<(String, PendingAction)>>,
}

impl RecordingConfirmedExecutor {
    /// Succeeds with the given reply.
    pub fn succeeding(reply: impl Into<String>) -> Self {
        Self {
            outcome: Ok(reply.into()),
            executed: Mutex::new(Vec::new()),
        }
    }

    /// Fails with the given error message.
    pub fn failing(error: impl Into<String>) -> Self {
        Self {
            outcome: Err(error.into()),
            executed: Mutex::new(Vec::new()),
        }
    }

    /// Executed actions with their session keys, in order.
    pub fn executed(&self) -> Vec<(String, PendingAction)> {
        self.executed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Default for RecordingConfirmedExecutor {
    fn default() -> Self {
        Self::succeeding("Done.")
    }
}

#[async_trait]
impl ConfirmedActionExecutor for RecordingConfirmedExecutor {
    async fn execute_confirmed(
        &self,
        session_key: &str,
        action: &PendingAction,
    ) -> Result<String, String> {
        self.executed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((session_key.to_string(), action.clone()));
        self.outcome.clone()
    }
}

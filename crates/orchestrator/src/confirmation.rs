//! Yes/no/edit handling for a staged action, ahead of the agent loop.

use std::sync::Arc;

use brain_core::ConfirmedActionExecutor;
use tracing::{info, warn};

use crate::pending::PendingActionStore;

/// Reply after the user cancels a staged action.
pub const CANCELLED_REPLY: &str = "Cancelled. I won't go ahead with that.";

/// Reply when a confirmed action fails. The executor's error is logged only.
pub const CONFIRM_FAILED_REPLY: &str =
    "Sorry, I couldn't complete that. Ask me again if you'd like me to retry.";

/// How a reply to a staged action reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Confirm,
    Cancel,
    Edit,
    Other,
}

impl Directive {
    /// Classify raw message text, ignoring case and surrounding whitespace.
    pub fn parse(text: &str) -> Self {
        match text.trim().to_lowercase().as_str() {
            "yes" | "y" | "confirm" | "send" => Self::Confirm,
            "no" | "n" | "cancel" => Self::Cancel,
            "edit" => Self::Edit,
            _ => Self::Other,
        }
    }
}

/// What the gate did with a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// The gate answered; the agent loop must not run for this message.
    Handled(String),
    /// Not a directive for a pending action; run the agent loop.
    PassThrough,
}

/// Intercepts replies to a pending action.
pub struct ConfirmationGate {
    pending: Arc<PendingActionStore>,
    executor: Arc<dyn ConfirmedActionExecutor>,
}

impl ConfirmationGate {
    pub fn new(pending: Arc<PendingActionStore>, executor: Arc<dyn ConfirmedActionExecutor>) -> Self {
        Self { pending, executor }
    }

    /// Handle `text` if it answers the session's pending action.
    ///
    /// Anything that is not a directive leaves the pending action standing.
    pub async fn intercept(&self, session_key: &str, text: &str) -> GateOutcome {
        let Some(action) = self.pending.load(session_key).await else {
            return GateOutcome::PassThrough;
        };

        match Directive::parse(text) {
            Directive::Other => GateOutcome::PassThrough,
            Directive::Cancel => {
                self.pending.clear(session_key).await;
                info!("Cancelled {} for {}", action.kind, session_key);
                GateOutcome::Handled(CANCELLED_REPLY.to_string())
            }
            Directive::Edit => {
                self.pending.clear(session_key).await;
                info!("Editing {} for {}", action.kind, session_key);
                GateOutcome::Handled(format!(
                    "Okay, I've dropped that ({}). Tell me what you'd like instead and I'll set it up again.",
                    action.description
                ))
            }
            Directive::Confirm => {
                self.pending.clear(session_key).await;
                info!("Executing confirmed {} for {}", action.kind, session_key);
                match self.executor.execute_confirmed(session_key, &action).await {
                    Ok(reply) => GateOutcome::Handled(reply),
                    Err(err) => {
                        warn!("Confirmed {} failed for {}: {}", action.kind, session_key, err);
                        GateOutcome::Handled(CONFIRM_FAILED_REPLY.to_string())
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use brain_core::{ActionKind, ActionStager, StagedAction};
    use mock_brain::RecordingConfirmedExecutor;
    use serde_json::json;

    async fn gate_with_pending(
        executor: Arc<RecordingConfirmedExecutor>,
    ) -> (ConfirmationGate, Arc<PendingActionStore>) {
        let pending = Arc::new(PendingActionStore::new(Duration::from_secs(300)));
        pending
            .stage(
                "+1",
                StagedAction::new(ActionKind::DraftEmail, "Email to Ann", json!({"to": "ann"})),
            )
            .await
            .unwrap();
        (ConfirmationGate::new(pending.clone(), executor), pending)
    }

    #[test]
    fn test_directive_parse() {
        for text in ["yes", "Y", "  confirm ", "SEND"] {
            assert_eq!(Directive::parse(text), Directive::Confirm, "{}", text);
        }
        for text in ["no", "N", "Cancel"] {
            assert_eq!(Directive::parse(text), Directive::Cancel, "{}", text);
        }
        assert_eq!(Directive::parse(" Edit"), Directive::Edit);
        assert_eq!(Directive::parse("yes please"), Directive::Other);
        assert_eq!(Directive::parse(""), Directive::Other);
    }

    #[tokio::test]
    async fn test_no_pending_passes_through() {
        let pending = Arc::new(PendingActionStore::new(Duration::from_secs(300)));
        let executor = Arc::new(RecordingConfirmedExecutor::default());
        let gate = ConfirmationGate::new(pending, executor.clone());

        assert_eq!(gate.intercept("+1", "yes").await, GateOutcome::PassThrough);
        assert!(executor.executed().is_empty());
    }

    #[tokio::test]
    async fn test_confirm_executes_once() {
        let executor = Arc::new(RecordingConfirmedExecutor::succeeding("Email sent."));
        let (gate, pending) = gate_with_pending(executor.clone()).await;

        assert_eq!(
            gate.intercept("+1", "Yes").await,
            GateOutcome::Handled("Email sent.".to_string())
        );
        assert!(pending.load("+1").await.is_none());

        // A second yes has nothing left to confirm
        assert_eq!(gate.intercept("+1", "yes").await, GateOutcome::PassThrough);

        let executed = executor.executed();
        assert_eq!(executed.len(), 1);
        assert_eq!(executed[0].0, "+1");
        assert_eq!(executed[0].1.kind, ActionKind::DraftEmail);
    }

    #[tokio::test]
    async fn test_confirm_failure_is_reported() {
        let executor = Arc::new(RecordingConfirmedExecutor::failing("mail server down"));
        let (gate, pending) = gate_with_pending(executor).await;

        match gate.intercept("+1", "send").await {
            GateOutcome::Handled(reply) => {
                assert_eq!(reply, CONFIRM_FAILED_REPLY);
                assert!(!reply.contains("mail server down"));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(pending.load("+1").await.is_none());
    }

    #[tokio::test]
    async fn test_cancel_and_edit_clear() {
        let executor = Arc::new(RecordingConfirmedExecutor::default());

        let (gate, pending) = gate_with_pending(executor.clone()).await;
        assert_eq!(
            gate.intercept("+1", "no").await,
            GateOutcome::Handled(CANCELLED_REPLY.to_string())
        );
        assert!(pending.load("+1").await.is_none());

        let (gate, pending) = gate_with_pending(executor.clone()).await;
        match gate.intercept("+1", "edit").await {
            GateOutcome::Handled(reply) => assert!(reply.contains("Email to Ann")),
            other => panic!("unexpected outcome {:?}", other),
        }
        assert!(pending.load("+1").await.is_none());
        assert!(executor.executed().is_empty());
    }

    #[tokio::test]
    async fn test_other_text_leaves_pending() {
        let executor = Arc::new(RecordingConfirmedExecutor::default());
        let (gate, pending) = gate_with_pending(executor).await;

        assert_eq!(
            gate.intercept("+1", "actually, what time is it?").await,
            GateOutcome::PassThrough
        );
        assert!(pending.load("+1").await.is_some());
    }
}

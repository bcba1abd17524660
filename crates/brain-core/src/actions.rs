//! Staged side-effecting actions awaiting user confirmation.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The closed set of actions a write tool may stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    DraftEmail,
    CreateEvent,
    ScheduleReminder,
    LogReceipt,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DraftEmail => "draft-email",
            Self::CreateEvent => "create-event",
            Self::ScheduleReminder => "schedule-reminder",
            Self::LogReceipt => "log-receipt",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft-email" => Ok(Self::DraftEmail),
            "create-event" => Ok(Self::CreateEvent),
            "schedule-reminder" => Ok(Self::ScheduleReminder),
            "log-receipt" => Ok(Self::LogReceipt),
            other => Err(format!("unknown action kind: {}", other)),
        }
    }
}

/// An action a write tool wants performed once the user confirms it.
#[derive(Debug, Clone, PartialEq)]
pub struct StagedAction {
    pub kind: ActionKind,
    /// Human-readable summary shown to the user.
    pub description: String,
    /// Parameters needed to perform the action.
    pub params: Value,
}

impl StagedAction {
    pub fn new(kind: ActionKind, description: impl Into<String>, params: Value) -> Self {
        Self {
            kind,
            description: description.into(),
            params,
        }
    }
}

/// A staged action with its expiry. At most one exists per session.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAction {
    pub kind: ActionKind,
    pub description: String,
    pub params: Value,
    pub expires_at: DateTime<Utc>,
}

impl PendingAction {
    pub fn from_staged(action: StagedAction, expires_at: DateTime<Utc>) -> Self {
        Self {
            kind: action.kind,
            description: action.description,
            params: action.params,
            expires_at,
        }
    }

    /// Whether the action has expired at `now`. Expiry is inclusive.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Records a staged action for a session, replacing any previous one.
#[async_trait]
pub trait ActionStager: Send + Sync {
    async fn stage(&self, session_key: &str, action: StagedAction) -> Result<(), String>;
}

/// Performs an action the user has confirmed.
#[async_trait]
pub trait ConfirmedActionExecutor: Send + Sync {
    /// Execute the action, returning a user-facing result or an error message.
    async fn execute_confirmed(
        &self,
        session_key: &str,
        action: &PendingAction,
    ) -> Result<String, String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[test]
    fn test_action_kind_round_trip() {
        for kind in [
            ActionKind::DraftEmail,
            ActionKind::CreateEvent,
            ActionKind::ScheduleReminder,
            ActionKind::LogReceipt,
        ] {
            assert_eq!(kind.as_str().parse::<ActionKind>().unwrap(), kind);
        }
        assert!("send-fax".parse::<ActionKind>().is_err());
    }

    #[test]
    fn test_action_kind_serde_matches_as_str() {
        let value = serde_json::to_value(ActionKind::CreateEvent).unwrap();
        assert_eq!(value, json!("create-event"));
    }

    #[test]
    fn test_expiry_is_inclusive() {
        let now = Utc::now();
        let action = PendingAction::from_staged(
            StagedAction::new(ActionKind::DraftEmail, "Email Ann", json!({"to": "ann"})),
            now + Duration::minutes(5),
        );

        assert!(!action.is_expired_at(now));
        assert!(!action.is_expired_at(now + Duration::seconds(299)));
        assert!(action.is_expired_at(now + Duration::minutes(5)));
    }
}

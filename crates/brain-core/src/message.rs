//! Inbound and outbound chat messages.

use serde::{Deserialize, Serialize};

/// How replies for a session should be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyMode {
    #[default]
    Text,
    Voice,
}

impl ReplyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Voice => "voice",
        }
    }

    /// Parse a stored value, falling back to text for anything unknown.
    pub fn from_str(value: &str) -> Self {
        match value {
            "voice" => Self::Voice,
            _ => Self::Text,
        }
    }
}

/// A message received from the chat transport.
///
/// The caller identity is assumed to be pre-authorized by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    /// Sender identifier.
    pub sender: String,
    /// Message text (transcribed already for voice clips).
    pub text: String,
    /// Transport timestamp.
    pub timestamp: u64,
    /// Group identifier for group chats.
    pub group_id: Option<String>,
}

impl InboundMessage {
    /// Create a direct message.
    pub fn direct(sender: impl Into<String>, text: impl Into<String>, timestamp: u64) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
            timestamp,
            group_id: None,
        }
    }

    /// Create a group message.
    pub fn group(
        sender: impl Into<String>,
        text: impl Into<String>,
        timestamp: u64,
        group_id: impl Into<String>,
    ) -> Self {
        Self {
            group_id: Some(group_id.into()),
            ..Self::direct(sender, text, timestamp)
        }
    }

    /// The chat session this message belongs to.
    ///
    /// Uses the group id for group messages, the sender for direct messages.
    pub fn session_key(&self) -> String {
        self.group_id
            .as_ref()
            .map(|g| format!("group:{}", g))
            .unwrap_or_else(|| self.sender.clone())
    }

    /// Where a reply should be delivered.
    pub fn reply_target(&self) -> &str {
        self.group_id.as_deref().unwrap_or(&self.sender)
    }

    pub fn is_group(&self) -> bool {
        self.group_id.is_some()
    }
}

/// A reply to be delivered through the chat transport.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    /// Phone number, user id or group id.
    pub recipient: String,
    pub is_group: bool,
    pub text: String,
    pub reply_mode: ReplyMode,
    /// A staged action is waiting for yes/no; transports may show buttons.
    pub awaiting_confirmation: bool,
}

impl OutboundMessage {
    /// Create a plain text reply to an inbound message.
    pub fn reply_to(message: &InboundMessage, text: impl Into<String>) -> Self {
        Self {
            recipient: message.reply_target().to_string(),
            is_group: message.is_group(),
            text: text.into(),
            reply_mode: ReplyMode::Text,
            awaiting_confirmation: false,
        }
    }

    pub fn with_reply_mode(mut self, mode: ReplyMode) -> Self {
        self.reply_mode = mode;
        self
    }

    pub fn with_confirmation(mut self, awaiting: bool) -> Self {
        self.awaiting_confirmation = awaiting;
        self
    }
}

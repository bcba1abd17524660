//! Conversation turns as persisted and as sent to the reasoning engine.
//!
//! A [`Turn`] is one message-equivalent unit: user text, a set of tool
//! results (which the engine expects on the user side), or an assistant
//! reply with optional tool-use requests. The serialized shape is the one
//! stored in the conversation row.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tools::{ToolResult, ToolUseRequest};

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single block of turn content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Plain text.
    Text { text: String },

    /// A tool invocation proposed by the assistant.
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },

    /// The outcome of a tool invocation, correlated by id.
    ToolResult {
        tool_use_id: String,
        content: String,
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        is_error: bool,
    },
}

/// One turn of a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: Vec<ContentBlock>,
}

impl Turn {
    /// Create a plain-text user turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }

    /// Create a user turn carrying tool results, in the given order.
    pub fn tool_results(results: &[ToolResult]) -> Self {
        Self {
            role: Role::User,
            content: results.iter().map(ToolResult::to_block).collect(),
        }
    }

    /// Create an assistant turn from optional text and tool-use requests.
    ///
    /// Empty text is omitted so the stored turn never carries a blank block.
    pub fn assistant(text: Option<&str>, tool_uses: &[ToolUseRequest]) -> Self {
        let mut content = Vec::with_capacity(tool_uses.len() + 1);
        if let Some(text) = text.filter(|t| !t.is_empty()) {
            content.push(ContentBlock::Text {
                text: text.to_string(),
            });
        }
        content.extend(tool_uses.iter().map(|request| ContentBlock::ToolUse {
            id: request.id.clone(),
            name: request.name.clone(),
            input: request.input.clone(),
        }));
        Self {
            role: Role::Assistant,
            content,
        }
    }

    /// Whether this is an assistant turn.
    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }

    /// Whether this is a user turn made only of tool results.
    pub fn is_tool_results(&self) -> bool {
        self.role == Role::User
            && !self.content.is_empty()
            && self
                .content
                .iter()
                .all(|block| matches!(block, ContentBlock::ToolResult { .. }))
    }

    /// Concatenated text blocks of this turn.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

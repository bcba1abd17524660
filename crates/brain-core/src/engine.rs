//! The reasoning-engine contract.

use async_trait::async_trait;

use crate::conversation::Turn;
use crate::error::BrainError;
use crate::tools::{ToolDefinition, ToolUseRequest};

/// Reasoning tier. The router starts on one of these and may escalate
/// from [`ModelTier::Fast`] to [`ModelTier::Capable`] mid-loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelTier {
    Fast,
    Capable,
}

impl ModelTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Capable => "capable",
        }
    }

    fn bit(self) -> u8 {
        match self {
            Self::Fast => 0b01,
            Self::Capable => 0b10,
        }
    }
}

/// The set of tiers used during one agent-loop run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TierSet(u8);

impl TierSet {
    pub fn insert(&mut self, tier: ModelTier) {
        self.0 |= tier.bit();
    }

    pub fn contains(&self, tier: ModelTier) -> bool {
        self.0 & tier.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Usage-report label: `fast`, `capable` or `fast+capable`.
    pub fn label(&self) -> String {
        [ModelTier::Fast, ModelTier::Capable]
            .into_iter()
            .filter(|tier| self.contains(*tier))
            .map(|tier| tier.as_str())
            .collect::<Vec<_>>()
            .join("+")
    }
}

/// Token usage reported by the engine for one call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl std::ops::AddAssign for Usage {
    fn add_assign(&mut self, other: Self) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
    }
}

/// One engine response.
#[derive(Debug, Clone, Default)]
pub struct Completion {
    /// Text produced by the model, if any.
    pub text: Option<String>,
    /// Tool invocations the model wants run before continuing.
    pub tool_uses: Vec<ToolUseRequest>,
    /// The model explicitly signalled it has finished.
    pub done: bool,
    pub usage: Usage,
}

impl Completion {
    /// A final, text-only completion.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            done: true,
            ..Default::default()
        }
    }

    /// A completion that requests tool execution.
    pub fn tool_uses(tool_uses: Vec<ToolUseRequest>) -> Self {
        Self {
            tool_uses,
            ..Default::default()
        }
    }

    /// Attach token usage.
    pub fn with_usage(mut self, input_tokens: u64, output_tokens: u64) -> Self {
        self.usage = Usage {
            input_tokens,
            output_tokens,
        };
        self
    }

    /// Whether this completion ends the loop.
    pub fn is_final(&self) -> bool {
        self.done || self.tool_uses.is_empty()
    }
}

/// A language-model service that accepts a conversation plus a tool
/// catalogue and returns text and/or tool-use requests.
///
/// Implementations should bound their own request latency; the agent loop
/// applies no wall-clock timeout.
#[async_trait]
pub trait ReasoningEngine: Send + Sync {
    /// Run one completion against `model`.
    async fn complete(
        &self,
        model: &str,
        history: &[Turn],
        tools: &[ToolDefinition],
    ) -> Result<Completion, BrainError>;

    /// Get a human-readable name for this engine.
    fn name(&self) -> &str;
}

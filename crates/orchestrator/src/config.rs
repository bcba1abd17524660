//! Configuration for the agent loop and its stores.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::OrchestratorError;

/// Default fast tier model id.
pub const DEFAULT_FAST_MODEL: &str = "claude-3-5-haiku-latest";

/// Default capable tier model id.
pub const DEFAULT_CAPABLE_MODEL: &str = "claude-sonnet-4-20250514";

/// Configuration for the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorConfig {
    /// Agent loop round cap.
    pub max_rounds: usize,

    /// First round (0-based) at which a fast-tier run escalates.
    pub escalation_round: usize,

    /// Rolling history window, in turns.
    pub history_max_turns: usize,

    /// Stored tool-result payload cap, in characters.
    pub history_result_max_chars: usize,

    /// Lifetime of a staged action.
    pub pending_action_ttl: Duration,

    /// Outbound chunk size, in characters.
    pub message_max_length: usize,

    /// Model id for the fast tier.
    pub fast_model: String,

    /// Model id for the capable tier.
    pub capable_model: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_rounds: 10,
            escalation_round: 4,
            history_max_turns: 40,
            history_result_max_chars: 5000,
            pending_action_ttl: Duration::from_secs(300),
            message_max_length: 4000,
            fast_model: DEFAULT_FAST_MODEL.to_string(),
            capable_model: DEFAULT_CAPABLE_MODEL.to_string(),
        }
    }
}

impl OrchestratorConfig {
    /// Create configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `AGENT_MAX_ROUNDS` - Round cap (default: 10)
    /// - `AGENT_ESCALATION_ROUND` - Escalation threshold (default: 4)
    /// - `HISTORY_MAX_TURNS` - History window in turns (default: 40)
    /// - `HISTORY_RESULT_MAX_CHARS` - Stored tool-result cap (default: 5000)
    /// - `PENDING_ACTION_TTL_SECS` - Pending action TTL (default: 300)
    /// - `MESSAGE_MAX_LENGTH` - Outbound chunk size (default: 4000)
    /// - `ASSISTANT_FAST_MODEL` - Fast tier model id
    /// - `ASSISTANT_CAPABLE_MODEL` - Capable tier model id
    ///
    /// Unparseable numbers fall back to the default; zero rounds, an empty
    /// history window or a zero chunk size are configuration errors.
    pub fn from_env() -> Result<Self, OrchestratorError> {
        let defaults = Self::default();

        let config = Self {
            max_rounds: parse_env("AGENT_MAX_ROUNDS", defaults.max_rounds),
            escalation_round: parse_env("AGENT_ESCALATION_ROUND", defaults.escalation_round),
            history_max_turns: parse_env("HISTORY_MAX_TURNS", defaults.history_max_turns),
            history_result_max_chars: parse_env(
                "HISTORY_RESULT_MAX_CHARS",
                defaults.history_result_max_chars,
            ),
            pending_action_ttl: Duration::from_secs(parse_env(
                "PENDING_ACTION_TTL_SECS",
                defaults.pending_action_ttl.as_secs(),
            )),
            message_max_length: parse_env("MESSAGE_MAX_LENGTH", defaults.message_max_length),
            fast_model: env::var("ASSISTANT_FAST_MODEL").unwrap_or(defaults.fast_model),
            capable_model: env::var("ASSISTANT_CAPABLE_MODEL").unwrap_or(defaults.capable_model),
        };

        config.validate()?;
        Ok(config)
    }

    /// Create a new config builder.
    pub fn builder() -> OrchestratorConfigBuilder {
        OrchestratorConfigBuilder::default()
    }

    /// Reject values the loop cannot run with.
    pub fn validate(&self) -> Result<(), OrchestratorError> {
        if self.max_rounds == 0 {
            return Err(OrchestratorError::Configuration(
                "AGENT_MAX_ROUNDS must be at least 1".to_string(),
            ));
        }
        if self.history_max_turns == 0 {
            return Err(OrchestratorError::Configuration(
                "HISTORY_MAX_TURNS must be at least 1".to_string(),
            ));
        }
        if self.message_max_length == 0 {
            return Err(OrchestratorError::Configuration(
                "MESSAGE_MAX_LENGTH must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_env<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Builder for OrchestratorConfig.
#[derive(Debug, Default)]
pub struct OrchestratorConfigBuilder {
    config: OrchestratorConfig,
}

impl OrchestratorConfigBuilder {
    pub fn max_rounds(mut self, rounds: usize) -> Self {
        self.config.max_rounds = rounds;
        self
    }

    pub fn escalation_round(mut self, round: usize) -> Self {
        self.config.escalation_round = round;
        self
    }

    pub fn history_max_turns(mut self, turns: usize) -> Self {
        self.config.history_max_turns = turns;
        self
    }

    pub fn history_result_max_chars(mut self, chars: usize) -> Self {
        self.config.history_result_max_chars = chars;
        self
    }

    pub fn pending_action_ttl(mut self, ttl: Duration) -> Self {
        self.config.pending_action_ttl = ttl;
        self
    }

    pub fn message_max_length(mut self, length: usize) -> Self {
        self.config.message_max_length = length;
        self
    }

    pub fn fast_model(mut self, model: impl Into<String>) -> Self {
        self.config.fast_model = model.into();
        self
    }

    pub fn capable_model(mut self, model: impl Into<String>) -> Self {
        self.config.capable_model = model.into();
        self
    }

    pub fn build(self) -> OrchestratorConfig {
        self.config
    }
}

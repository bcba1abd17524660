//! Main orchestrator that coordinates message processing.

use std::sync::Arc;

use brain_core::{
    BrainError, ConfirmedActionExecutor, InboundMessage, OutboundMessage, ReasoningEngine, ReplyMode,
    ToolExecutor,
};
use tracing::{debug, info, warn};

use crate::agent_loop::AgentLoop;
use crate::config::OrchestratorConfig;
use crate::confirmation::{ConfirmationGate, GateOutcome};
use crate::error::OrchestratorError;
use crate::model_selection::ModelRouter;
use crate::sender::MessageSender;
use crate::session::SessionLocks;
use crate::split::split_message;
use crate::stores::Stores;

/// Help text shown when user asks for help.
pub const HELP_TEXT: &str = r#"I'm your operations assistant. Ask me about your calendar, contacts, finances or documents, or ask me to draft emails, create events and set reminders.

Anything that changes something is staged first. Reply:
• "yes" to go ahead
• "no" to cancel
• "edit" to change it

Commands:
• /voice on - Reply with voice messages
• /voice off - Reply with text
• /reset - Forget our conversation and any staged action
• /help - Show this message"#;

/// Reply after the conversation has been reset.
pub const RESET_REPLY: &str = "Done, I've cleared our conversation. What can I help with?";

/// Reply when the reasoning engine cannot be reached.
pub const ENGINE_UNREACHABLE_REPLY: &str =
    "Sorry, I couldn't reach the assistant service. Please try again in a moment.";

/// Reply when the reasoning engine rejects or garbles a request.
pub const ENGINE_FAILED_REPLY: &str =
    "Sorry, the assistant service couldn't handle that request. Please try again.";

/// Plain reply for an engine failure; the error itself only goes to the log.
pub fn engine_failure_reply(error: &BrainError) -> &'static str {
    match error {
        BrainError::Network(_) => ENGINE_UNREACHABLE_REPLY,
        _ => ENGINE_FAILED_REPLY,
    }
}

/// Built-in commands handled before the confirmation gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Reset,
    Help,
    SetReplyMode(ReplyMode),
}

impl Command {
    /// Recognise a command, ignoring case and surrounding whitespace.
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "/reset" | "reset" | "forget our chat" => Some(Self::Reset),
            "/help" => Some(Self::Help),
            "/voice on" => Some(Self::SetReplyMode(ReplyMode::Voice)),
            "/voice off" => Some(Self::SetReplyMode(ReplyMode::Text)),
            _ => None,
        }
    }
}

/// Main orchestrator that coordinates message processing.
///
/// For each inbound message the orchestrator:
/// - Serializes work per session
/// - Handles built-in commands
/// - Lets the confirmation gate answer replies to a staged action
/// - Otherwise runs the agent loop
/// - Delivers the reply in transport-sized chunks with typing indicators
pub struct Orchestrator<S: MessageSender> {
    config: OrchestratorConfig,
    stores: Stores,
    agent: AgentLoop,
    gate: ConfirmationGate,
    locks: SessionLocks,
    sender: S,
}

impl<S: MessageSender> Orchestrator<S> {
    /// Create a new orchestrator with the given components.
    ///
    /// `tools` should stage write actions into `stores.pending`;
    /// `confirmed` performs them once the user says yes.
    pub fn new(
        config: OrchestratorConfig,
        stores: Stores,
        engine: Arc<dyn ReasoningEngine>,
        tools: Arc<dyn ToolExecutor>,
        confirmed: Arc<dyn ConfirmedActionExecutor>,
        sender: S,
    ) -> Self {
        let agent = AgentLoop::new(
            engine,
            tools,
            stores.history.clone(),
            stores.usage.clone(),
            &config,
        );
        let gate = ConfirmationGate::new(stores.pending.clone(), confirmed);

        Self {
            config,
            stores,
            agent,
            gate,
            locks: SessionLocks::new(),
            sender,
        }
    }

    /// Replace the model router.
    pub fn with_router(mut self, router: ModelRouter) -> Self {
        self.agent = self.agent.with_router(router);
        self
    }

    /// Produce the reply for a message without delivering it.
    ///
    /// Never fails: engine errors become a plain apology and storage errors
    /// are logged by the stores.
    pub async fn process(&self, message: &InboundMessage) -> OutboundMessage {
        let session_key = message.session_key();
        let _guard = self.locks.acquire(&session_key).await;

        info!(
            "Processing message from {} (group: {}, session: {})",
            message.sender,
            message.is_group(),
            session_key
        );

        let text = match Command::parse(&message.text) {
            Some(command) => self.run_command(&session_key, command).await,
            None => self.answer(&session_key, &message.text).await,
        };

        let awaiting = self.stores.pending.load(&session_key).await.is_some();
        let reply_mode = self.stores.preferences.get(&session_key).await;

        OutboundMessage::reply_to(message, text)
            .with_reply_mode(reply_mode)
            .with_confirmation(awaiting)
    }

    /// Process a message and deliver the reply through the sender.
    pub async fn handle(&self, message: &InboundMessage) -> Result<(), OrchestratorError> {
        let recipient = message.reply_target();
        let is_group = message.is_group();

        if let Err(e) = self.sender.set_typing(recipient, is_group, true).await {
            warn!("Failed to start typing indicator: {}", e);
        }

        let reply = self.process(message).await;

        // Always stop typing, even if delivery fails below
        if let Err(e) = self.sender.set_typing(recipient, is_group, false).await {
            warn!("Failed to stop typing indicator: {}", e);
        }

        let chunks = split_message(&reply.text, self.config.message_max_length);
        let last = chunks.len().saturating_sub(1);
        debug!("Sending reply to {} in {} chunks", recipient, chunks.len());

        for (index, chunk) in chunks.into_iter().enumerate() {
            let outbound = OutboundMessage {
                text: chunk,
                awaiting_confirmation: reply.awaiting_confirmation && index == last,
                ..reply.clone()
            };
            self.sender.send(&outbound).await?;
        }

        Ok(())
    }

    async fn run_command(&self, session_key: &str, command: Command) -> String {
        match command {
            Command::Reset => {
                info!("Resetting conversation for {}", session_key);
                self.stores.history.clear(session_key).await;
                self.stores.pending.clear(session_key).await;
                RESET_REPLY.to_string()
            }
            Command::Help => HELP_TEXT.to_string(),
            Command::SetReplyMode(mode) => {
                info!("Setting reply mode for {} to {}", session_key, mode.as_str());
                self.stores.preferences.set(session_key, mode).await;
                match mode {
                    ReplyMode::Voice => "Voice replies are on.".to_string(),
                    ReplyMode::Text => "Voice replies are off.".to_string(),
                }
            }
        }
    }

    async fn answer(&self, session_key: &str, text: &str) -> String {
        if let GateOutcome::Handled(reply) = self.gate.intercept(session_key, text).await {
            return reply;
        }

        match self.agent.run(session_key, text).await {
            Ok(reply) => {
                info!(
                    "Answered {} with {} chars ({} tools over {} rounds, tiers {})",
                    session_key,
                    reply.text.len(),
                    reply.tool_calls,
                    reply.rounds,
                    reply.tiers.label()
                );
                reply.text
            }
            Err(e) => {
                warn!("Engine failed for {}: {}", session_key, e);
                engine_failure_reply(&e).to_string()
            }
        }
    }

    /// Get a reference to the sender.
    pub fn sender(&self) -> &S {
        &self.sender
    }

    /// Get a reference to the stores.
    pub fn stores(&self) -> &Stores {
        &self.stores
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_failure_reply_hides_details() {
        let network = BrainError::Network("Failed to send request: dns error".to_string());
        assert_eq!(engine_failure_reply(&network), ENGINE_UNREACHABLE_REPLY);

        let upstream = BrainError::ProcessingFailed(
            "API error (502): <html><title>502 Bad Gateway</title></html>".to_string(),
        );
        assert_eq!(engine_failure_reply(&upstream), ENGINE_FAILED_REPLY);
        assert!(!ENGINE_FAILED_REPLY.contains('<'));
    }

    #[test]
    fn test_command_parse() {
        assert_eq!(Command::parse("/reset"), Some(Command::Reset));
        assert_eq!(Command::parse(" Reset "), Some(Command::Reset));
        assert_eq!(Command::parse("Forget our chat"), Some(Command::Reset));
        assert_eq!(Command::parse("/help"), Some(Command::Help));
        assert_eq!(
            Command::parse("/voice ON"),
            Some(Command::SetReplyMode(ReplyMode::Voice))
        );
        assert_eq!(
            Command::parse("/voice off"),
            Some(Command::SetReplyMode(ReplyMode::Text))
        );
        assert_eq!(Command::parse("reset my password"), None);
        assert_eq!(Command::parse("yes"), None);
    }

    #[test]
    fn test_help_text_not_empty() {
        assert!(!HELP_TEXT.is_empty());
        assert!(HELP_TEXT.contains("/reset"));
    }
}

//! Message sender trait and implementations.

use std::sync::Mutex;

use async_trait::async_trait;
use brain_core::OutboundMessage;

use crate::error::OrchestratorError;

/// Trait for delivering replies and typing indicators.
///
/// Abstracted to support different transports (Signal, a terminal, tests).
#[async_trait]
pub trait MessageSender: Send + Sync {
    /// Deliver one outbound message.
    async fn send(&self, message: &OutboundMessage) -> Result<(), OrchestratorError>;

    /// Set typing indicator state.
    ///
    /// # Arguments
    /// * `recipient` - Phone number or group ID
    /// * `is_group` - Whether this is a group
    /// * `started` - true to start typing, false to stop
    ///
    /// Default implementation does nothing.
    async fn set_typing(
        &self,
        recipient: &str,
        is_group: bool,
        started: bool,
    ) -> Result<(), OrchestratorError> {
        let _ = (recipient, is_group, started);
        Ok(())
    }
}

/// A no-op message sender that discards all messages.
#[derive(Debug, Clone, Default)]
pub struct NoOpSender;

#[async_trait]
impl MessageSender for NoOpSender {
    async fn send(&self, _message: &OutboundMessage) -> Result<(), OrchestratorError> {
        Ok(())
    }
}

/// A logging message sender for debugging that logs all operations.
#[derive(Debug, Clone, Default)]
pub struct LoggingSender;

#[async_trait]
impl MessageSender for LoggingSender {
    async fn send(&self, message: &OutboundMessage) -> Result<(), OrchestratorError> {
        let msg_type = if message.is_group { "group" } else { "direct" };
        tracing::info!(
            "[{}] Sending {} reply to {} (awaiting_confirmation={}): {}",
            msg_type,
            message.reply_mode.as_str(),
            message.recipient,
            message.awaiting_confirmation,
            message.text
        );
        Ok(())
    }

    async fn set_typing(
        &self,
        recipient: &str,
        is_group: bool,
        started: bool,
    ) -> Result<(), OrchestratorError> {
        let msg_type = if is_group { "group" } else { "direct" };
        let state = if started { "started" } else { "stopped" };
        tracing::info!("[{}] Typing {} for {}", msg_type, state, recipient);
        Ok(())
    }
}

/// A sender that keeps every message, for tests and transcripts.
#[derive(Debug, Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<OutboundMessage>>,
    typing: Mutex<Vec<bool>>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages delivered so far, in order.
    pub fn sent(&self) -> Vec<OutboundMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Typing indicator transitions, in order.
    pub fn typing(&self) -> Vec<bool> {
        self.typing.lock().map(|t| t.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl MessageSender for RecordingSender {
    async fn send(&self, message: &OutboundMessage) -> Result<(), OrchestratorError> {
        self.sent
            .lock()
            .map_err(|_| OrchestratorError::SendFailed("recording poisoned".to_string()))?
            .push(message.clone());
        Ok(())
    }

    async fn set_typing(
        &self,
        _recipient: &str,
        _is_group: bool,
        started: bool,
    ) -> Result<(), OrchestratorError> {
        self.typing
            .lock()
            .map_err(|_| OrchestratorError::SendFailed("recording poisoned".to_string()))?
            .push(started);
        Ok(())
    }
}

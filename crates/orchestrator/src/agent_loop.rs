//! The round-by-round conversation with the reasoning engine.

use std::sync::Arc;
use std::time::Instant;

use brain_core::{
    BrainError, ContentBlock, ModelTier, ReasoningEngine, Role, TierSet, ToolExecutor, Turn, Usage,
};
use tracing::{debug, info, warn};

use crate::config::OrchestratorConfig;
use crate::dispatcher::ToolDispatcher;
use crate::history::HistoryStore;
use crate::model_selection::ModelRouter;
use crate::usage::{UsageReport, UsageSink};

/// Reply when the round cap is reached without a final answer.
pub const FALLBACK_REPLY: &str =
    "I ran into some complexity working on that and couldn't finish. Could you try breaking it into smaller steps?";

/// Reply stored and returned when the engine finishes with no text.
pub const EMPTY_REPLY: &str = "Done.";

/// Outcome of one agent-loop run.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentReply {
    pub text: String,
    /// Tiers used, in no particular order.
    pub tiers: TierSet,
    /// Rounds that ran tools.
    pub rounds: usize,
    pub tool_calls: usize,
    pub usage: Usage,
    /// The round cap was hit and `text` is the fallback.
    pub exhausted: bool,
}

/// Drives the engine and the tool dispatcher until a final answer.
pub struct AgentLoop {
    engine: Arc<dyn ReasoningEngine>,
    dispatcher: ToolDispatcher,
    router: ModelRouter,
    history: Arc<HistoryStore>,
    usage_sink: Arc<dyn UsageSink>,
    max_rounds: usize,
}

/// Counters carried through a run.
struct RunState {
    started: Instant,
    tier: ModelTier,
    tiers: TierSet,
    usage: Usage,
    rounds: usize,
    tool_calls: usize,
}

impl AgentLoop {
    pub fn new(
        engine: Arc<dyn ReasoningEngine>,
        executor: Arc<dyn ToolExecutor>,
        history: Arc<HistoryStore>,
        usage_sink: Arc<dyn UsageSink>,
        config: &OrchestratorConfig,
    ) -> Self {
        Self {
            engine,
            dispatcher: ToolDispatcher::new(executor),
            router: ModelRouter::new(config),
            history,
            usage_sink,
            max_rounds: config.max_rounds,
        }
    }

    /// Replace the model router.
    pub fn with_router(mut self, router: ModelRouter) -> Self {
        self.router = router;
        self
    }

    pub fn router(&self) -> &ModelRouter {
        &self.router
    }

    /// Answer one user message.
    ///
    /// Engine errors end the run and are returned as-is. History is saved
    /// after each tool round and at exit; save failures never reach the caller.
    pub async fn run(&self, session_key: &str, text: &str) -> Result<AgentReply, BrainError> {
        let mut turns = self.history.load(session_key).await;
        append_user_text(&mut turns, text);

        let tier = self.router.select_initial_model(text);
        let mut state = RunState {
            started: Instant::now(),
            tier,
            tiers: TierSet::default(),
            usage: Usage::default(),
            rounds: 0,
            tool_calls: 0,
        };
        state.tiers.insert(tier);
        info!(
            "Agent run for {} starting on {} tier ({} prior turns)",
            session_key,
            tier.as_str(),
            turns.len() - 1
        );

        for round in 0..self.max_rounds {
            if self.router.should_escalate(round, state.tier) {
                info!("Escalating {} to capable tier at round {}", session_key, round);
                state.tier = ModelTier::Capable;
                state.tiers.insert(ModelTier::Capable);
            }

            let model = self.router.model_id(state.tier);
            let completion = match self
                .engine
                .complete(model, &turns, self.dispatcher.definitions())
                .await
            {
                Ok(completion) => completion,
                Err(err) => {
                    warn!("Engine call failed for {} in round {}: {}", session_key, round, err);
                    self.report(session_key, &state);
                    return Err(err);
                }
            };
            state.usage += completion.usage;

            if completion.is_final() {
                let text = completion
                    .text
                    .filter(|text| !text.trim().is_empty())
                    .unwrap_or_else(|| EMPTY_REPLY.to_string());
                turns.push(Turn::assistant(Some(text.as_str()), &[]));
                self.history.save(session_key, &turns).await;
                self.report(session_key, &state);

                debug!("Agent run for {} finished after {} tool rounds", session_key, state.rounds);
                return Ok(self.reply(text, &state, false));
            }

            turns.push(Turn::assistant(
                completion.text.as_deref(),
                &completion.tool_uses,
            ));
            let results = self
                .dispatcher
                .dispatch(&completion.tool_uses, session_key)
                .await;
            state.tool_calls += results.len();
            state.rounds += 1;
            turns.push(Turn::tool_results(&results));
            self.history.save(session_key, &turns).await;
        }

        warn!(
            "Agent run for {} hit the {} round cap",
            session_key, self.max_rounds
        );
        self.report(session_key, &state);
        Ok(self.reply(FALLBACK_REPLY.to_string(), &state, true))
    }

    fn reply(&self, text: String, state: &RunState, exhausted: bool) -> AgentReply {
        AgentReply {
            text,
            tiers: state.tiers,
            rounds: state.rounds,
            tool_calls: state.tool_calls,
            usage: state.usage,
            exhausted,
        }
    }

    /// Hand the run's usage to the sink without waiting on it.
    fn report(&self, session_key: &str, state: &RunState) {
        let report = UsageReport {
            session_key: session_key.to_string(),
            tiers: state.tiers,
            usage: state.usage,
            latency: state.started.elapsed(),
            tool_calls: state.tool_calls,
            rounds: state.rounds,
        };
        let sink = Arc::clone(&self.usage_sink);
        tokio::spawn(async move {
            if let Err(err) = sink.record(&report).await {
                warn!("Failed to record usage for {}: {}", report.session_key, err);
            }
        });
    }
}

/// Add the user's text, keeping user and assistant turns alternating.
///
/// A run cut short by the round cap leaves a tool-results turn last; the new
/// text joins that turn instead of starting a second user turn.
fn append_user_text(turns: &mut Vec<Turn>, text: &str) {
    match turns.last_mut() {
        Some(last) if last.role == Role::User => last.content.push(ContentBlock::Text {
            text: text.to_string(),
        }),
        _ => turns.push(Turn::user(text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brain_core::{ToolResult, ToolUseRequest};
    use serde_json::json;

    #[test]
    fn test_append_user_text_starts_new_turn() {
        let mut turns = vec![Turn::user("hi"), Turn::assistant(Some("hello"), &[])];
        append_user_text(&mut turns, "next");
        assert_eq!(turns.len(), 3);
        assert_eq!(turns[2], Turn::user("next"));
    }

    #[test]
    fn test_append_user_text_joins_trailing_results() {
        let mut turns = vec![
            Turn::user("hi"),
            Turn::assistant(None, &[ToolUseRequest::new("t", "x", json!({}))]),
            Turn::tool_results(&[ToolResult::success("t", "ok")]),
        ];
        append_user_text(&mut turns, "still there?");

        assert_eq!(turns.len(), 3);
        assert_eq!(turns[2].content.len(), 2);
        assert_eq!(turns[2].text(), "still there?");
    }

    #[test]
    fn test_append_to_empty_history() {
        let mut turns = Vec::new();
        append_user_text(&mut turns, "first");
        assert_eq!(turns, vec![Turn::user("first")]);
    }
}

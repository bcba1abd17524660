//! Model tier selection from message content, plus mid-loop escalation.
//!
//! The patterns are a best-effort content classifier: the first match picks
//! the capable tier, no match picks the fast tier. The agent loop asks
//! [`ModelRouter::should_escalate`] each round and switches tiers itself.

use brain_core::ModelTier;
use regex::Regex;
use tracing::{debug, warn};

use crate::config::OrchestratorConfig;

/// Default escalation patterns, checked in order. All case-insensitive.
pub const DEFAULT_CAPABLE_PATTERNS: &[&str] = &[
    // Analytical and comparative language
    r"(?i)\b(compare|comparison|analy[sz]e|analysis|trend|forecast|projection|breakdown|versus|vs\.?)\b",
    r"(?i)\b(why did|what caused|how come|explain why)\b",
    // Compound multi-clause requests
    r"(?i)\b(and then|after that|as well as|followed by)\b",
    r"\?.*\S.*\?",
    // Periodic reports
    r"(?i)\b(weekly|monthly|quarterly|annual|year[- ]to[- ]date|ytd|month[- ]end|eofy)\b.{0,40}\b(report|summary|review|recap|overview)\b",
    // Domain triggers
    r"(?i)\b(cash ?flow|p ?& ?l|profit and loss|balance sheet|reconcil\w*|budget variance|runway|burn rate|bas|gst)\b",
];

/// Chooses the reasoning tier for an agent-loop run.
#[derive(Debug, Clone)]
pub struct ModelRouter {
    patterns: Vec<Regex>,
    escalation_round: usize,
    fast_model: String,
    capable_model: String,
}

impl ModelRouter {
    /// Create a router with the default patterns.
    pub fn new(config: &OrchestratorConfig) -> Self {
        let patterns = DEFAULT_CAPABLE_PATTERNS
            .iter()
            .filter_map(|pattern| match Regex::new(pattern) {
                Ok(re) => Some(re),
                Err(err) => {
                    warn!("Invalid routing pattern '{}': {}", pattern, err);
                    None
                }
            })
            .collect();

        Self {
            patterns,
            escalation_round: config.escalation_round,
            fast_model: config.fast_model.clone(),
            capable_model: config.capable_model.clone(),
        }
    }

    /// Replace the routing patterns.
    pub fn with_patterns<I, S>(mut self, patterns: I) -> Result<Self, regex::Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.patterns = patterns
            .into_iter()
            .map(|pattern| Regex::new(pattern.as_ref()))
            .collect::<Result<_, _>>()?;
        Ok(self)
    }

    /// Pick the starting tier for a message.
    pub fn select_initial_model(&self, text: &str) -> ModelTier {
        match self.patterns.iter().position(|re| re.is_match(text)) {
            Some(index) => {
                debug!("Routing pattern {} matched, starting on capable tier", index);
                ModelTier::Capable
            }
            None => ModelTier::Fast,
        }
    }

    /// Whether a run on `current` should switch to the capable tier at `round`.
    ///
    /// Once the loop has switched, `current` is capable and this stays false.
    pub fn should_escalate(&self, round: usize, current: ModelTier) -> bool {
        round >= self.escalation_round && current == ModelTier::Fast
    }

    /// Provider model id for a tier.
    pub fn model_id(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Fast => &self.fast_model,
            ModelTier::Capable => &self.capable_model,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn router() -> ModelRouter {
        ModelRouter::new(&OrchestratorConfig::default())
    }

    #[test]
    fn test_default_patterns_compile() {
        for pattern in DEFAULT_CAPABLE_PATTERNS {
            assert!(Regex::new(pattern).is_ok(), "bad pattern: {}", pattern);
        }
        assert_eq!(router().patterns.len(), DEFAULT_CAPABLE_PATTERNS.len());
    }

    #[test]
    fn test_simple_questions_stay_fast() {
        let router = router();
        for text in [
            "What's on my calendar today?",
            "hi",
            "Remind me to call Sam at 3",
            "Who is the contact at Acme?",
        ] {
            assert_eq!(router.select_initial_model(text), ModelTier::Fast, "{}", text);
        }
    }

    #[test]
    fn test_capable_triggers() {
        let router = router();
        for text in [
            "Compare this month's revenue with last month",
            "Can you ANALYZE our spending?",
            "Find the invoice and then email it to Jo",
            "Where is the file? Who sent it?",
            "Give me the monthly sales report",
            "What's our cash flow looking like",
            "Please reconcile the Xero account",
        ] {
            assert_eq!(
                router.select_initial_model(text),
                ModelTier::Capable,
                "{}",
                text
            );
        }
    }

    #[test]
    fn test_escalation_fires_once() {
        let router = router();
        let mut tier = ModelTier::Fast;
        let mut fired = Vec::new();

        for round in 0..10 {
            if router.should_escalate(round, tier) {
                fired.push(round);
                tier = ModelTier::Capable;
            }
        }

        assert_eq!(fired, vec![4]);
        assert!(!router.should_escalate(4, ModelTier::Capable));
        assert!(!router.should_escalate(3, ModelTier::Fast));
    }

    #[test]
    fn test_custom_patterns() {
        let router = router().with_patterns(["(?i)urgent"]).unwrap();
        assert_eq!(router.select_initial_model("URGENT: call"), ModelTier::Capable);
        assert_eq!(router.select_initial_model("compare"), ModelTier::Fast);

        assert!(ModelRouter::new(&OrchestratorConfig::default())
            .with_patterns(["("])
            .is_err());
    }

    #[test]
    fn test_model_ids() {
        let config = OrchestratorConfig::default();
        let router = ModelRouter::new(&config);
        assert_eq!(router.model_id(ModelTier::Fast), config.fast_model);
        assert_eq!(router.model_id(ModelTier::Capable), config.capable_model);
    }
}

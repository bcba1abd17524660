//! ToolExecutor implementation backed by ToolRegistry.

use std::collections::HashSet;
use std::env;
use std::sync::Arc;
use std::time::Duration;

use brain_core::{
    ActionStager, ConfirmedActionExecutor, PendingAction, ToolDefinition, ToolExecutor, ToolResult,
    ToolUseRequest,
};
use tokio::time::timeout;
use tracing::{info, warn};

use crate::{ToolArgs, ToolError, ToolOutput, ToolRegistry};

/// Default per-tool timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct ToolPolicy {
    pub allowlist: Option<HashSet<String>>,
    pub timeout: Option<Duration>,
}

impl Default for ToolPolicy {
    fn default() -> Self {
        Self {
            allowlist: None,
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
        }
    }
}

impl ToolPolicy {
    /// Load the policy from environment variables.
    ///
    /// Optional: `TOOL_TIMEOUT_SECS` (default 30, `0` disables the timeout).
    pub fn from_env() -> Self {
        let secs = env::var("TOOL_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            timeout: (secs > 0).then(|| Duration::from_secs(secs)),
            ..Self::default()
        }
    }

    pub fn allow_tools<I, S>(mut self, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowlist = self.allowlist.get_or_insert_with(HashSet::new);
        for tool in tools {
            allowlist.insert(tool.into());
        }
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }
}

/// Exposes a [`ToolRegistry`] to the agent loop.
///
/// Implements [`ToolExecutor`] for engine-proposed calls and
/// [`ConfirmedActionExecutor`] for actions the user has said yes to.
pub struct RegistryToolExecutor {
    registry: Arc<ToolRegistry>,
    policy: ToolPolicy,
    stager: Option<Arc<dyn ActionStager>>,
}

impl RegistryToolExecutor {
    pub fn new(registry: ToolRegistry) -> Self {
        Self::with_policy(registry, ToolPolicy::default())
    }

    pub fn with_policy(registry: ToolRegistry, policy: ToolPolicy) -> Self {
        Self::from_shared(Arc::new(registry), policy)
    }

    pub fn from_shared(registry: Arc<ToolRegistry>, policy: ToolPolicy) -> Self {
        Self {
            registry,
            policy,
            stager: None,
        }
    }

    /// Give write tools somewhere to stage their pending actions.
    pub fn with_stager(mut self, stager: Arc<dyn ActionStager>) -> Self {
        self.stager = Some(stager);
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        self.registry.as_ref()
    }

    pub fn policy(&self) -> &ToolPolicy {
        &self.policy
    }

    fn is_allowed(&self, tool: &str) -> bool {
        match self.policy.allowlist {
            Some(ref allowlist) => allowlist.contains(tool),
            None => true,
        }
    }

    fn args_for(&self, input: &serde_json::Value, session_key: &str) -> Result<ToolArgs, ToolError> {
        let args = ToolArgs::from_value(input, session_key)?;
        Ok(match self.stager {
            Some(ref stager) => args.with_stager(stager.clone()),
            None => args,
        })
    }

    async fn run_bounded<F>(&self, future: F) -> Result<ToolOutput, ToolError>
    where
        F: std::future::Future<Output = Result<ToolOutput, ToolError>>,
    {
        match self.policy.timeout {
            Some(limit) => timeout(limit, future)
                .await
                .map_err(|_| ToolError::Timeout(limit))?,
            None => future.await,
        }
    }
}

#[async_trait::async_trait]
impl ToolExecutor for RegistryToolExecutor {
    async fn execute(&self, request: ToolUseRequest, session_key: &str) -> ToolResult {
        if !self.is_allowed(&request.name) {
            warn!("Tool '{}' not allowed for {}", request.name, session_key);
            return ToolResult::error(&request.id, "Tool not allowed");
        }

        let args = match self.args_for(&request.input, session_key) {
            Ok(args) => args,
            Err(error) => return ToolResult::error(&request.id, error.to_string()),
        };

        let output = match self
            .run_bounded(self.registry.execute(&request.name, args))
            .await
        {
            Ok(output) => output,
            Err(error) => {
                warn!("Tool '{}' failed for {}: {}", request.name, session_key, error);
                return ToolResult::error(&request.id, error.to_string());
            }
        };

        if output.success {
            ToolResult::success(&request.id, output.content)
        } else {
            ToolResult::error(&request.id, output.content)
        }
    }

    fn definitions(&self) -> Vec<ToolDefinition> {
        self.registry
            .definitions()
            .into_iter()
            .filter(|def| self.is_allowed(&def.name))
            .collect()
    }
}

#[async_trait::async_trait]
impl ConfirmedActionExecutor for RegistryToolExecutor {
    async fn execute_confirmed(
        &self,
        session_key: &str,
        action: &PendingAction,
    ) -> Result<String, String> {
        let tool = self
            .registry
            .find_by_action(action.kind)
            .ok_or_else(|| format!("No tool can perform {}", action.kind))?;

        info!(
            "Executing confirmed {} via '{}' for {}",
            action.kind,
            tool.name(),
            session_key
        );

        let args = ToolArgs::from_value(&action.params, session_key).map_err(|e| e.to_string())?;
        let output = self
            .run_bounded(tool.confirm(args))
            .await
            .map_err(|e| e.to_string())?;

        if output.success {
            Ok(output.content)
        } else {
            Err(output.content)
        }
    }
}

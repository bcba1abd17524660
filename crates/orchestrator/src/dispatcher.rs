//! Read/write-aware execution of one round's tool-use requests.

use std::collections::HashSet;
use std::sync::Arc;

use brain_core::{ToolDefinition, ToolExecutor, ToolKind, ToolResult, ToolUseRequest};
use futures::future::join_all;
use tracing::{debug, warn};

/// Executes a round of tool-use requests.
///
/// A round naming any write tool runs every request sequentially in emitted
/// order. Any other round fans out concurrently. Either way results come
/// back in request order with ids matching their requests.
pub struct ToolDispatcher {
    executor: Arc<dyn ToolExecutor>,
    catalogue: Vec<ToolDefinition>,
    write_tools: HashSet<String>,
}

impl ToolDispatcher {
    /// Build a dispatcher, taking the catalogue and classifications from
    /// the executor.
    pub fn new(executor: Arc<dyn ToolExecutor>) -> Self {
        let catalogue = executor.definitions();
        let write_tools = catalogue
            .iter()
            .filter(|definition| definition.kind == ToolKind::Write)
            .map(|definition| definition.name.clone())
            .collect();

        Self {
            executor,
            catalogue,
            write_tools,
        }
    }

    /// The tool catalogue offered to the engine.
    pub fn definitions(&self) -> &[ToolDefinition] {
        &self.catalogue
    }

    /// Whether a tool is write-classified.
    pub fn is_write_tool(&self, name: &str) -> bool {
        self.write_tools.contains(name)
    }

    /// Whether any request in the round names a write tool.
    pub fn is_write_round(&self, requests: &[ToolUseRequest]) -> bool {
        requests.iter().any(|request| self.is_write_tool(&request.name))
    }

    /// Execute every request in the round.
    pub async fn dispatch(&self, requests: &[ToolUseRequest], session_key: &str) -> Vec<ToolResult> {
        let results = if self.is_write_round(requests) {
            debug!(
                "Write round for {}: running {} tools sequentially",
                session_key,
                requests.len()
            );
            let mut results = Vec::with_capacity(requests.len());
            for request in requests {
                results.push(self.executor.execute(request.clone(), session_key).await);
            }
            results
        } else {
            debug!(
                "Read round for {}: running {} tools concurrently",
                session_key,
                requests.len()
            );
            join_all(
                requests
                    .iter()
                    .map(|request| self.executor.execute(request.clone(), session_key)),
            )
            .await
        };

        requests
            .iter()
            .zip(results)
            .map(|(request, mut result)| {
                if result.tool_call_id != request.id {
                    warn!(
                        "Tool {} answered with id {} for request {}",
                        request.name, result.tool_call_id, request.id
                    );
                    result.tool_call_id = request.id.clone();
                }
                result
            })
            .collect()
    }
}

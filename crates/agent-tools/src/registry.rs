//! Tool registry: the catalogue offered to the engine and the read/write
//! classification table the dispatcher schedules by.

use std::sync::Arc;

use brain_core::{ActionKind, ToolDefinition, ToolKind};
use indexmap::IndexMap;
use tracing::{debug, info};

use crate::error::ToolError;
use crate::tool::{Tool, ToolArgs, ToolOutput};

/// Registry for managing tools.
///
/// Adding a tool is an entry, not a code change: its [`Tool::kind`] is the
/// only thing the dispatcher consults. Registration order is preserved so
/// the catalogue sent to the engine is stable.
pub struct ToolRegistry {
    tools: IndexMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            tools: IndexMap::new(),
        }
    }

    /// Register a tool.
    ///
    /// If a tool with the same name already exists, it will be replaced.
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        self.register_boxed(Arc::new(tool));
    }

    /// Register a shared tool.
    pub fn register_boxed(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        info!("Registering {:?} tool: {}", tool.kind(), name);
        self.tools.insert(name, tool);
    }

    /// Get a list of registered tool names.
    pub fn list_tools(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    /// Get a tool by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// Check if a tool is registered.
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Classification of a tool; unknown names are treated as read-only.
    pub fn kind_of(&self, name: &str) -> ToolKind {
        self.tools
            .get(name)
            .map(|tool| tool.kind())
            .unwrap_or_default()
    }

    /// The tool that performs a confirmed action of the given kind.
    pub fn find_by_action(&self, kind: ActionKind) -> Option<&Arc<dyn Tool>> {
        self.tools
            .values()
            .find(|tool| tool.action_kind() == Some(kind))
    }

    /// Tool definitions for the engine's catalogue.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .values()
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.input_schema(),
                kind: tool.kind(),
            })
            .collect()
    }

    /// Execute a tool by name.
    pub async fn execute(&self, name: &str, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        debug!("Executing tool '{}' with {} params", name, args.params.len());

        let result = tool.execute(args).await?;

        debug!(
            "Tool '{}' completed: success={}, content_len={}",
            name,
            result.success,
            result.content.len()
        );

        Ok(result)
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

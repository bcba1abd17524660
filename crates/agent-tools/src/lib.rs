//! Tool registry and built-in tools for the operations assistant.
//!
//! A [`Tool`] is a capability the reasoning engine may call. Each tool carries
//! its [`ToolKind`](brain_core::ToolKind): read tools run straight away, write
//! tools stage a pending action that the user confirms before the side effect
//! happens. The [`ToolRegistry`] is the data-driven catalogue the agent loop
//! schedules by, and [`RegistryToolExecutor`] exposes it through the
//! `brain_core` executor traits.
//!
//! # Built-in Tools
//!
//! - [`CurrentTime`] - Current date and time at a UTC offset (read).
//! - [`ScheduleReminder`] - Reminder staged for confirmation (write).
//!
//! # Example
//!
//! ```rust,ignore
//! use agent_tools::{default_registry, RegistryToolExecutor, ToolPolicy};
//!
//! let executor = RegistryToolExecutor::with_policy(default_registry(), ToolPolicy::from_env())
//!     .with_stager(pending_store.clone());
//! ```

mod error;
mod executor;
mod registry;
mod tool;
pub mod tools;

pub use error::ToolError;
pub use executor::{RegistryToolExecutor, ToolPolicy};
pub use registry::ToolRegistry;
pub use tool::{Tool, ToolArgs, ToolOutput};
pub use tools::{CurrentTime, ScheduleReminder};

// Re-export async_trait for convenience
pub use async_trait::async_trait;

/// Create a new registry with all built-in tools registered.
pub fn default_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(CurrentTime::new());
    registry.register(ScheduleReminder::new());

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use brain_core::ToolKind;

    #[test]
    fn test_default_registry_classification() {
        let registry = default_registry();
        assert_eq!(registry.list_tools(), vec!["current_time", "schedule_reminder"]);
        assert_eq!(registry.kind_of("current_time"), ToolKind::Read);
        assert_eq!(registry.kind_of("schedule_reminder"), ToolKind::Write);
    }
}

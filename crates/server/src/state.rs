//! Application State
//!
//! Shared state across all handlers.

use std::sync::Arc;

use bank_agent_config::Settings;
use bank_agent_tools::{create_banking_registry, BankApiError, ToolRegistry, ToolServices};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    /// Tool registry
    pub tools: Arc<ToolRegistry>,
}

impl AppState {
    /// Build state around an already wired registry
    pub fn new(config: Settings, tools: ToolRegistry) -> Self {
        Self {
            config: Arc::new(config),
            tools: Arc::new(tools),
        }
    }

    /// Wire the banking tools against the HTTP bank API
    pub fn from_settings(config: Settings) -> Result<Self, BankApiError> {
        let services = ToolServices::from_settings(&config)?;
        let tools = create_banking_registry(services);
        Ok(Self::new(config, tools))
    }
}

//! Tool Registry
//!
//! Manages tool registration, discovery, and execution.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bank_agent_config::Settings;
use bank_agent_core::{Tool, ToolError, ToolOutput, ToolSchema};

use crate::bank_api::{BankApi, BankApiError, HttpBankApi};
use crate::banking_tools::{
    BlockAtmCardTool, CloseComplaintCaseTool, CreateComplaintCaseTool, EscalateComplaintCaseTool,
    GenerateOtpTool, GetAccountBalanceTool, GetAccountDetailsTool, GetCardStatusTool,
    GetChequeStatusTool, GetComplaintCaseTool, GetRecentTransactionsTool, ListComplaintCasesTool,
    UnlockAtmCardTool, VerifyOtpTool,
};
use crate::cards::CardActionGate;
use crate::cases::CaseStore;
use crate::otp::{OtpService, OtpStore};

/// Slack added to the bank API timeout for remote-backed tools
const REMOTE_TOOL_SLACK_SECS: u64 = 5;

/// Tool executor trait
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Execute a tool by name
    async fn execute(&self, name: &str, arguments: Value) -> Result<ToolOutput, ToolError>;

    /// List available tools
    fn list_tools(&self) -> Vec<ToolSchema>;

    /// Get tool schema by name
    fn get_tool(&self, name: &str) -> Option<ToolSchema>;
}

/// Tool registry
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        self.tools.insert(name, Arc::new(tool));
    }

    /// Register a shared tool
    pub fn register_boxed(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    /// Get tool by name
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    /// Check if tool exists
    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// All tool names, sorted
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Execute and always produce output: errors become an error text block
    pub async fn call(&self, name: &str, arguments: Value) -> ToolOutput {
        match self.execute(name, arguments).await {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(tool = name, code = ?e.code, error = %e, "Tool call failed");
                ToolOutput::error(e.message)
            },
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolExecutor for ToolRegistry {
    /// Execute a tool, bounded by the tool's own timeout
    async fn execute(&self, name: &str, arguments: Value) -> Result<ToolOutput, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::not_found(format!("Tool not found: {}", name)))?;

        tool.validate(&arguments)?;

        let timeout_secs = tool.timeout_secs();
        let timeout_duration = Duration::from_secs(timeout_secs);

        tracing::trace!(
            tool = name,
            timeout_secs = timeout_secs,
            "Executing tool with timeout"
        );

        match tokio::time::timeout(timeout_duration, tool.execute(arguments)).await {
            Ok(result) => result,
            Err(_elapsed) => Err(ToolError::timeout(name, timeout_secs)),
        }
    }

    fn list_tools(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<ToolSchema> = self.tools.values().map(|t| t.schema()).collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    fn get_tool(&self, name: &str) -> Option<ToolSchema> {
        self.tools.get(name).map(|t| t.schema())
    }
}

/// Shared services the banking tools are built from
#[derive(Clone)]
pub struct ToolServices {
    pub bank_api: Arc<dyn BankApi>,
    pub otp: Arc<OtpService>,
    pub cards: Arc<CardActionGate>,
    pub cases: Arc<CaseStore>,
    /// Timeout for tools that call the bank API
    pub remote_timeout_secs: u64,
}

impl ToolServices {
    /// Wire services around an existing bank API handle
    pub fn with_api(bank_api: Arc<dyn BankApi>, settings: &Settings) -> Self {
        let otp = Arc::new(OtpService::new(
            bank_api.clone(),
            Arc::new(OtpStore::new()),
            &settings.otp,
        ));
        let cards = Arc::new(CardActionGate::new(bank_api.clone()));
        let cases = Arc::new(CaseStore::new(&settings.cases));

        Self {
            bank_api,
            otp,
            cards,
            cases,
            remote_timeout_secs: settings.bank_api.timeout_secs + REMOTE_TOOL_SLACK_SECS,
        }
    }

    /// Wire services around the HTTP bank API client
    pub fn from_settings(settings: &Settings) -> Result<Self, BankApiError> {
        let api = HttpBankApi::new(&settings.bank_api)?;
        tracing::info!(base_url = %api.base_url(), "Bank API client ready");
        Ok(Self::with_api(Arc::new(api), settings))
    }
}

/// Create the registry of all banking tools
pub fn create_banking_registry(services: ToolServices) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    let timeout = services.remote_timeout_secs;

    // Account lookups
    registry.register(GetAccountBalanceTool::new(services.bank_api.clone()).with_timeout_secs(timeout));
    registry.register(
        GetRecentTransactionsTool::new(services.bank_api.clone()).with_timeout_secs(timeout),
    );
    registry.register(GetAccountDetailsTool::new(services.bank_api.clone()).with_timeout_secs(timeout));
    registry.register(GetChequeStatusTool::new(services.bank_api.clone()).with_timeout_secs(timeout));

    // OTP
    registry.register(GenerateOtpTool::new(services.otp.clone()).with_timeout_secs(timeout));
    registry.register(VerifyOtpTool::new(services.otp.clone()));

    // Cards
    registry.register(GetCardStatusTool::new(services.cards.clone()).with_timeout_secs(timeout));
    registry.register(UnlockAtmCardTool::new(services.cards.clone()).with_timeout_secs(timeout));
    registry.register(BlockAtmCardTool::new(services.cards.clone()));

    // Complaint cases
    registry.register(CreateComplaintCaseTool::new(services.cases.clone()));
    registry.register(GetComplaintCaseTool::new(services.cases.clone()));
    registry.register(CloseComplaintCaseTool::new(services.cases.clone()));
    registry.register(EscalateComplaintCaseTool::new(services.cases.clone()));
    registry.register(ListComplaintCasesTool::new(services.cases));

    tracing::info!(
        tool_count = registry.len(),
        remote_timeout_secs = timeout,
        "Created banking tool registry"
    );

    registry
}

//! Account Balance Tool

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use bank_agent_core::{InputSchema, Tool, ToolError, ToolOutput, ToolSchema};

use crate::bank_api::{Balance, BalanceAmount, BankApi};
use crate::banking_tools::utils::{customer_id, customer_id_property, describe_failure, format_currency};

use super::DEFAULT_REMOTE_TIMEOUT_SECS;

/// Current balance of the customer's account
pub struct GetAccountBalanceTool {
    api: Arc<dyn BankApi>,
    timeout_secs: u64,
}

impl GetAccountBalanceTool {
    pub fn new(api: Arc<dyn BankApi>) -> Self {
        Self {
            api,
            timeout_secs: DEFAULT_REMOTE_TIMEOUT_SECS,
        }
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    fn render(balance: &Balance) -> String {
        match &balance.amount {
            BalanceAmount::Numeric(amount) => format!(
                "Account balance for {}: ₹{}",
                balance.account_number.as_deref().unwrap_or("your account"),
                format_currency(*amount)
            ),
            BalanceAmount::Text(text) => format!("Balance: {}", text),
            BalanceAmount::Unavailable => "Balance: N/A".to_string(),
        }
    }
}

#[async_trait]
impl Tool for GetAccountBalanceTool {
    fn name(&self) -> &str {
        "get_account_balance"
    }

    fn description(&self) -> &str {
        "Retrieve the current account balance for the authenticated customer"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: InputSchema::object().property("customer_id", customer_id_property(), true),
        }
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput, ToolError> {
        let customer = customer_id(&input)?;

        let text = match self.api.balance(&customer).await {
            Ok(balance) => Self::render(&balance),
            Err(e) => describe_failure("balance", &e, true),
        };

        Ok(ToolOutput::text(text))
    }

    fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }
}

//! Account Details Tool

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use bank_agent_core::{InputSchema, Tool, ToolError, ToolOutput, ToolSchema};

use crate::bank_api::{AccountDetails, BankApi};
use crate::banking_tools::utils::{customer_id, customer_id_property, describe_failure};

use super::DEFAULT_REMOTE_TIMEOUT_SECS;

pub struct GetAccountDetailsTool {
    api: Arc<dyn BankApi>,
    timeout_secs: u64,
}

impl GetAccountDetailsTool {
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

    fn render(account: &AccountDetails) -> String {
        format!(
            "Account Details:\n\
             • Account Number: {}\n\
             • Account Type:   {}\n\
             • Branch:         {}\n\
             • IFSC:           {}\n\
             • Status:         {}",
            account.account_number.as_deref().unwrap_or("N/A"),
            account.account_type.as_deref().unwrap_or("N/A"),
            account.branch.as_deref().unwrap_or("N/A"),
            account.ifsc.as_deref().unwrap_or("N/A"),
            account.status
        )
    }
}

#[async_trait]
impl Tool for GetAccountDetailsTool {
    fn name(&self) -> &str {
        "get_account_details"
    }

    fn description(&self) -> &str {
        "Retrieve account number, type, branch, IFSC code and status for the authenticated customer"
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

        let text = match self.api.account(&customer).await {
            Ok(account) => Self::render(&account),
            Err(e) => describe_failure("account details", &e, false),
        };

        Ok(ToolOutput::text(text))
    }

    fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stub::StubBankApi;
    use serde_json::json;

    #[tokio::test]
    async fn test_renders_all_fields() {
        let tool = GetAccountDetailsTool::new(Arc::new(StubBankApi::new()));
        let text = tool
            .execute(json!({"customer_id": "CUST001"}))
            .await
            .unwrap()
            .as_text();

        assert_eq!(
            text,
            "Account Details:\n\
             • Account Number: XXXX4521\n\
             • Account Type:   Savings\n\
             • Branch:         MG Road, Bengaluru\n\
             • IFSC:           SWFT0001234\n\
             • Status:         Active"
        );
    }

    #[tokio::test]
    async fn test_missing_fields() {
        let api = StubBankApi::new().with_account(json!({"accountNumber": "XX99"}));
        let tool = GetAccountDetailsTool::new(Arc::new(api));
        let text = tool
            .execute(json!({"customer_id": "CUST001"}))
            .await
            .unwrap()
            .as_text();
        assert!(text.contains("• Branch:         N/A"));
        assert!(text.ends_with("• Status:         Active"));
    }
}

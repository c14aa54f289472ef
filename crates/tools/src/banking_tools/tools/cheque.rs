//! Cheque Status Tool

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use bank_agent_core::{InputSchema, PropertySchema, Tool, ToolError, ToolOutput, ToolSchema};

use crate::bank_api::{BankApi, ChequeStatus};
use crate::banking_tools::utils::{customer_id, customer_id_property, describe_failure, required_str};

use super::DEFAULT_REMOTE_TIMEOUT_SECS;

/// Clearing status of a deposited cheque
pub struct GetChequeStatusTool {
    api: Arc<dyn BankApi>,
    timeout_secs: u64,
}

impl GetChequeStatusTool {
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

    fn render(cheque_number: &str, cheque: &ChequeStatus) -> String {
        format!(
            "Cheque #{} Status:\n\
             • Amount:             ₹{}\n\
             • Status:             {}\n\
             • Expected Clearance: {}",
            cheque_number,
            cheque.amount.as_deref().unwrap_or("N/A"),
            cheque.status.as_deref().unwrap_or("N/A"),
            cheque.expected_clearance_date.as_deref().unwrap_or("N/A")
        )
    }
}

#[async_trait]
impl Tool for GetChequeStatusTool {
    fn name(&self) -> &str {
        "get_cheque_status"
    }

    fn description(&self) -> &str {
        "Retrieve the clearing status of a deposited cheque"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: InputSchema::object()
                .property("customer_id", customer_id_property(), true)
                .property(
                    "cheque_number",
                    PropertySchema::string("The cheque number to look up (6 or more digits)"),
                    true,
                ),
        }
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput, ToolError> {
        let customer = customer_id(&input)?;
        let cheque_number = required_str(&input, "cheque_number")?.trim();

        // Interpolated into the request path
        if !cheque_number.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ToolError::invalid_params(
                "cheque_number must contain only letters and digits",
            ));
        }

        let text = match self.api.cheque(&customer, cheque_number).await {
            Ok(cheque) => Self::render(cheque_number, &cheque),
            Err(e) if e.is_not_found() => {
                tracing::info!(customer_id = %customer, cheque_number, "Cheque not found");
                format!(
                    "Cheque #{} was not found. Please verify the cheque number.",
                    cheque_number
                )
            },
            Err(e) => describe_failure("cheque status", &e, false),
        };

        Ok(ToolOutput::text(text))
    }

    fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }
}

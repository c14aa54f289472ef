//! Recent Transactions Tool

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

use bank_agent_config::constants::transactions::{DEFAULT_LIMIT, MAX_LIMIT, MIN_LIMIT};
use bank_agent_core::{InputSchema, PropertySchema, Tool, ToolError, ToolOutput, ToolSchema};

use crate::bank_api::{BankApi, Transaction};
use crate::banking_tools::utils::{
    clamp_limit, customer_id, customer_id_property, describe_failure, format_amount,
};

use super::DEFAULT_REMOTE_TIMEOUT_SECS;

/// Most recent account transactions, newest first as returned by the bank
pub struct GetRecentTransactionsTool {
    api: Arc<dyn BankApi>,
    timeout_secs: u64,
}

impl GetRecentTransactionsTool {
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

    /// `1. [CREDIT] +₹1,500 | Salary | 2024-03-01`
    fn render_line(index: usize, txn: &Transaction) -> String {
        let sign = if txn.is_credit() { "+" } else { "-" };
        let label = txn
            .description
            .as_deref()
            .or(txn.transaction_id.as_deref())
            .unwrap_or("N/A");

        format!(
            "{}. [{}] {}₹{} | {} | {}",
            index,
            txn.kind.as_deref().unwrap_or("?"),
            sign,
            format_amount(txn.amount.abs()),
            label,
            txn.date()
        )
    }

    fn render(transactions: &[Transaction], limit: u32) -> String {
        if transactions.is_empty() {
            return "No transactions found.".to_string();
        }

        let lines: Vec<String> = transactions
            .iter()
            .take(limit as usize)
            .enumerate()
            .map(|(i, txn)| Self::render_line(i + 1, txn))
            .collect();

        format!("Recent transactions:\n{}", lines.join("\n"))
    }
}

#[async_trait]
impl Tool for GetRecentTransactionsTool {
    fn name(&self) -> &str {
        "get_recent_transactions"
    }

    fn description(&self) -> &str {
        "Retrieve the most recent transactions on the customer's account"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: InputSchema::object()
                .property("customer_id", customer_id_property(), true)
                .property(
                    "limit",
                    PropertySchema::integer("Number of transactions to return")
                        .with_default(json!(DEFAULT_LIMIT))
                        .with_range(MIN_LIMIT as f64, MAX_LIMIT as f64),
                    false,
                ),
        }
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput, ToolError> {
        let customer = customer_id(&input)?;
        let requested = input
            .get("limit")
            .and_then(|v| {
                v.as_i64()
                    .or_else(|| v.as_u64().map(|n| i64::try_from(n).unwrap_or(i64::MAX)))
            })
            .unwrap_or(DEFAULT_LIMIT as i64);
        let limit = clamp_limit(requested);

        tracing::debug!(customer_id = %customer, requested, limit, "Listing transactions");

        let text = match self.api.transactions(&customer, limit).await {
            Ok(transactions) => Self::render(&transactions, limit),
            Err(e) => describe_failure("transactions", &e, false),
        };

        Ok(ToolOutput::text(text))
    }

    fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }
}

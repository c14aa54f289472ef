//! ATM Card Tools

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use bank_agent_core::{InputSchema, PropertySchema, Tool, ToolError, ToolOutput, ToolSchema};

use crate::banking_tools::utils::{customer_id, customer_id_property, describe_failure};
use crate::cards::{CardAction, CardActionGate, CardActionOutcome, CardStatusReport};

use super::DEFAULT_REMOTE_TIMEOUT_SECS;

fn otp_confirmation_property() -> PropertySchema {
    PropertySchema::boolean(
        "Must be true, and only after verify_otp returned OTP_VERIFIED:SUCCESS for this customer",
    )
}

fn otp_confirmation(input: &Value) -> Result<bool, ToolError> {
    input
        .get("confirmed_otp_verified")
        .and_then(|v| v.as_bool())
        .ok_or_else(|| ToolError::invalid_params("confirmed_otp_verified is required"))
}

fn card_action_schema(tool: &dyn Tool) -> ToolSchema {
    ToolSchema {
        name: tool.name().to_string(),
        description: tool.description().to_string(),
        input_schema: InputSchema::object()
            .property("customer_id", customer_id_property(), true)
            .property("confirmed_otp_verified", otp_confirmation_property(), true),
    }
}

/// Render a gated card action for the customer
pub fn render_card_outcome(outcome: CardActionOutcome) -> String {
    match outcome {
        CardActionOutcome::Refused(action) => format!(
            "Cannot {} card: OTP verification is required first. Please have the customer enter the OTP.",
            action
        ),
        CardActionOutcome::Completed {
            action: CardAction::Unlock,
            simulated: false,
        } => "✅ ATM card has been successfully UNLOCKED.\n\
              Your card is now ACTIVE and ready for use.\n\
              If you experience any issues, please contact support."
            .to_string(),
        CardActionOutcome::Completed {
            action: CardAction::Unlock,
            simulated: true,
        } => "✅ ATM card has been successfully UNLOCKED (simulated).\n\
              Your card is now ACTIVE and ready for use."
            .to_string(),
        CardActionOutcome::Completed {
            action: CardAction::Block,
            ..
        } => "🔒 ATM card has been successfully BLOCKED.\n\
              No transactions can be made with this card until it is unlocked.\n\
              If you believe your card was lost or stolen, a replacement can be requested."
            .to_string(),
    }
}

/// Card status derived from the account status
pub struct GetCardStatusTool {
    gate: Arc<CardActionGate>,
    timeout_secs: u64,
}

impl GetCardStatusTool {
    pub fn new(gate: Arc<CardActionGate>) -> Self {
        Self {
            gate,
            timeout_secs: DEFAULT_REMOTE_TIMEOUT_SECS,
        }
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    fn render(report: &CardStatusReport) -> String {
        format!(
            "Card Information:\n\
             • Current Status: {}\n\
             • Account Number: {}\n\
             • Account Type:   {}",
            report.status.as_str(),
            report.account.account_number.as_deref().unwrap_or("N/A"),
            report.account.account_type.as_deref().unwrap_or("N/A")
        )
    }
}

#[async_trait]
impl Tool for GetCardStatusTool {
    fn name(&self) -> &str {
        "get_card_status"
    }

    fn description(&self) -> &str {
        "Check whether the customer's ATM card is active or blocked"
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

        let text = match self.gate.status(&customer).await {
            Ok(report) => Self::render(&report),
            Err(e) => describe_failure("card status", &e, false),
        };

        Ok(ToolOutput::text(text))
    }

    fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }
}

/// Unlock the ATM card once OTP verification has been confirmed
pub struct UnlockAtmCardTool {
    gate: Arc<CardActionGate>,
    timeout_secs: u64,
}

impl UnlockAtmCardTool {
    pub fn new(gate: Arc<CardActionGate>) -> Self {
        Self {
            gate,
            timeout_secs: DEFAULT_REMOTE_TIMEOUT_SECS,
        }
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[async_trait]
impl Tool for UnlockAtmCardTool {
    fn name(&self) -> &str {
        "unlock_atm_card"
    }

    fn description(&self) -> &str {
        "Unlock (unblock) the customer's ATM card. Call only after the OTP has been verified"
    }

    fn schema(&self) -> ToolSchema {
        card_action_schema(self)
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput, ToolError> {
        let customer = customer_id(&input)?;
        let verified = otp_confirmation(&input)?;

        let outcome = self.gate.unlock(&customer, verified).await;
        Ok(ToolOutput::text(render_card_outcome(outcome)))
    }

    fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }
}

/// Block the ATM card once OTP verification has been confirmed
pub struct BlockAtmCardTool {
    gate: Arc<CardActionGate>,
}

impl BlockAtmCardTool {
    pub fn new(gate: Arc<CardActionGate>) -> Self {
        Self { gate }
    }
}

#[async_trait]
impl Tool for BlockAtmCardTool {
    fn name(&self) -> &str {
        "block_atm_card"
    }

    fn description(&self) -> &str {
        "Block (freeze) the customer's ATM card. Call only after the OTP has been verified"
    }

    fn schema(&self) -> ToolSchema {
        card_action_schema(self)
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput, ToolError> {
        let customer = customer_id(&input)?;
        let verified = otp_confirmation(&input)?;

        let outcome = self.gate.block(&customer, verified).await;
        Ok(ToolOutput::text(render_card_outcome(outcome)))
    }
}

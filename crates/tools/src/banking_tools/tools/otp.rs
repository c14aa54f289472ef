//! OTP Tools
//!
//! `generate_otp` issues a code (disclosed in the reply, demo mode) and
//! `verify_otp` checks the customer's entry. Verification replies start with
//! a sentinel the orchestrator branches on.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::Arc;

use bank_agent_config::constants::otp::DEFAULT_PURPOSE;
use bank_agent_core::{InputSchema, PropertySchema, Tool, ToolError, ToolOutput, ToolSchema};

use crate::banking_tools::utils::{customer_id, customer_id_property, optional_str};
use crate::otp::{OtpError, OtpService};

use super::DEFAULT_REMOTE_TIMEOUT_SECS;

/// Prefix of a successful verification reply
pub const OTP_VERIFIED_SUCCESS: &str = "OTP_VERIFIED:SUCCESS";

/// Prefix of every failed verification reply
pub const OTP_VERIFIED_FAIL: &str = "OTP_VERIFIED:FAIL";

pub struct GenerateOtpTool {
    otp: Arc<OtpService>,
    timeout_secs: u64,
}

impl GenerateOtpTool {
    pub fn new(otp: Arc<OtpService>) -> Self {
        Self {
            otp,
            timeout_secs: DEFAULT_REMOTE_TIMEOUT_SECS,
        }
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

#[async_trait]
impl Tool for GenerateOtpTool {
    fn name(&self) -> &str {
        "generate_otp"
    }

    fn description(&self) -> &str {
        "Generate and send a one-time password to the customer's registered mobile number"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: InputSchema::object()
                .property("customer_id", customer_id_property(), true)
                .property(
                    "purpose",
                    PropertySchema::string("What the OTP authorises, e.g. CARD_ACTION")
                        .with_default(json!(DEFAULT_PURPOSE)),
                    false,
                ),
        }
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput, ToolError> {
        let customer = customer_id(&input)?;
        let purpose = optional_str(&input, "purpose").unwrap_or(DEFAULT_PURPOSE);

        let otp = self.otp.generate(&customer, purpose).await;

        Ok(ToolOutput::text(format!(
            "✅ OTP sent to your registered mobile number.\n\
             [DEMO MODE] Your OTP is: **{}**\n\
             The OTP expires in {}.\n\n\
             Please ask the customer to enter the {}-digit OTP to proceed.",
            otp.code,
            otp.expires_in,
            otp.code.len()
        )))
    }

    fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }
}

pub struct VerifyOtpTool {
    otp: Arc<OtpService>,
}

impl VerifyOtpTool {
    pub fn new(otp: Arc<OtpService>) -> Self {
        Self { otp }
    }

    fn render(result: Result<(), OtpError>) -> String {
        match result {
            Ok(()) => format!(
                "{} – Identity verified. You may now proceed with the card action.",
                OTP_VERIFIED_SUCCESS
            ),
            Err(e) => {
                let reason = match e {
                    OtpError::NoOtpPending => "No OTP found. Please generate a new OTP first.",
                    OtpError::AlreadyUsed => {
                        "This OTP has already been used. Please generate a new OTP."
                    },
                    OtpError::Expired => "The OTP has expired. Please generate a new OTP.",
                    OtpError::Mismatch => {
                        "Incorrect OTP. Please check and try again, or generate a new OTP."
                    },
                };
                format!("{} – {}", OTP_VERIFIED_FAIL, reason)
            },
        }
    }
}

#[async_trait]
impl Tool for VerifyOtpTool {
    fn name(&self) -> &str {
        "verify_otp"
    }

    fn description(&self) -> &str {
        "Verify the OTP entered by the customer. Only proceed with the secure action if this returns OTP_VERIFIED:SUCCESS"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: InputSchema::object()
                .property("customer_id", customer_id_property(), true)
                .property(
                    "submitted_otp",
                    PropertySchema::string("The OTP entered by the customer"),
                    true,
                ),
        }
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput, ToolError> {
        let customer = customer_id(&input)?;
        // A blank entry is a failed verification, not a malformed call
        let submitted = input
            .get("submitted_otp")
            .and_then(Value::as_str)
            .unwrap_or("");

        Ok(ToolOutput::text(Self::render(
            self.otp.verify(&customer, submitted),
        )))
    }
}

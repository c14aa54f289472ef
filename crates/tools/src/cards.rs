//! Card Action Gate
//!
//! Block and unlock require the caller to assert that OTP verification already
//! succeeded; the gate itself does not consult the OTP store. Outcomes are
//! simulated: unlock makes a best-effort call to the bank and reports success
//! whatever happens, block never calls out. No card state is stored.

use std::fmt;
use std::sync::Arc;

use bank_agent_core::CustomerId;

use crate::bank_api::{AccountDetails, BankApi, BankApiError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    Block,
    Unlock,
}

impl fmt::Display for CardAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Block => f.write_str("block"),
            Self::Unlock => f.write_str("unlock"),
        }
    }
}

/// Result of a gated card action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardActionOutcome {
    /// OTP verification was not asserted; nothing happened
    Refused(CardAction),
    /// Reported as done. `simulated` is set when the bank call failed and
    /// success was assumed anyway.
    Completed { action: CardAction, simulated: bool },
}

/// Narrative card status derived from the account status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardStatus {
    Active,
    Blocked,
}

impl CardStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Blocked => "BLOCKED",
        }
    }
}

#[derive(Debug, Clone)]
pub struct CardStatusReport {
    pub status: CardStatus,
    pub account: AccountDetails,
}

pub struct CardActionGate {
    api: Arc<dyn BankApi>,
}

impl CardActionGate {
    pub fn new(api: Arc<dyn BankApi>) -> Self {
        Self { api }
    }

    pub async fn unlock(&self, customer: &CustomerId, otp_verified: bool) -> CardActionOutcome {
        if !otp_verified {
            tracing::warn!(customer_id = %customer, "Card unlock refused without OTP verification");
            return CardActionOutcome::Refused(CardAction::Unlock);
        }

        let simulated = match self.api.unlock_card(customer).await {
            Ok(()) => false,
            Err(e) => {
                tracing::warn!(
                    customer_id = %customer,
                    error = %e,
                    "Card unlock call failed, reporting simulated success"
                );
                true
            },
        };

        tracing::info!(customer_id = %customer, simulated, "ATM card unlocked");

        CardActionOutcome::Completed {
            action: CardAction::Unlock,
            simulated,
        }
    }

    pub async fn block(&self, customer: &CustomerId, otp_verified: bool) -> CardActionOutcome {
        if !otp_verified {
            tracing::warn!(customer_id = %customer, "Card block refused without OTP verification");
            return CardActionOutcome::Refused(CardAction::Block);
        }

        tracing::info!(customer_id = %customer, "ATM card blocked");

        CardActionOutcome::Completed {
            action: CardAction::Block,
            simulated: false,
        }
    }

    /// Card status mirrors the account status: active accounts have active cards
    pub async fn status(&self, customer: &CustomerId) -> Result<CardStatusReport, BankApiError> {
        let account = self.api.account(customer).await?;
        let status = if account.is_active() {
            CardStatus::Active
        } else {
            CardStatus::Blocked
        };
        Ok(CardStatusReport { status, account })
    }
}

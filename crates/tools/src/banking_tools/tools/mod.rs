//! Banking Tool Implementations
//!
//! MCP-compatible tools exposed to the orchestrating agent. Each tool returns
//! a single text block; domain failures are rendered as text, and only bad
//! arguments surface as `ToolError`.

mod account_details;
mod balance;
mod card;
mod case;
mod cheque;
mod otp;
mod transactions;

/// Timeout for tools that call the bank API, overridden from settings
pub(crate) const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 15;

pub use account_details::GetAccountDetailsTool;
pub use balance::GetAccountBalanceTool;
pub use card::{render_card_outcome, BlockAtmCardTool, GetCardStatusTool, UnlockAtmCardTool};
pub use case::{
    CloseComplaintCaseTool, CreateComplaintCaseTool, EscalateComplaintCaseTool,
    GetComplaintCaseTool, ListComplaintCasesTool, DEFAULT_ESCALATION_REASON,
    DEFAULT_RESOLUTION_NOTE,
};
pub use cheque::GetChequeStatusTool;
pub use otp::{GenerateOtpTool, VerifyOtpTool, OTP_VERIFIED_FAIL, OTP_VERIFIED_SUCCESS};
pub use transactions::GetRecentTransactionsTool;

//! Banking Tools
//!
//! - `utils`: argument extraction and amount/date formatting
//! - `tools`: one MCP tool per banking operation

mod tools;
pub(crate) mod utils;

pub use utils::{clamp_limit, format_amount, format_currency};

pub use tools::{
    render_card_outcome, BlockAtmCardTool, CloseComplaintCaseTool, CreateComplaintCaseTool,
    EscalateComplaintCaseTool, GenerateOtpTool, GetAccountBalanceTool, GetAccountDetailsTool,
    GetCardStatusTool, GetChequeStatusTool, GetComplaintCaseTool, GetRecentTransactionsTool,
    ListComplaintCasesTool, UnlockAtmCardTool, VerifyOtpTool, DEFAULT_ESCALATION_REASON,
    DEFAULT_RESOLUTION_NOTE, OTP_VERIFIED_FAIL, OTP_VERIFIED_SUCCESS,
};

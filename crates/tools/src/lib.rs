//! Banking Tools
//!
//! MCP-compatible tools a conversational agent calls to look up accounts,
//! issue and verify OTPs, block or unlock ATM cards, and manage complaint
//! cases.

pub mod bank_api;
pub mod banking_tools;
pub mod cards;
pub mod cases;
pub mod otp;
pub mod registry;
pub mod stub;

pub use bank_api::{
    AccountDetails, Balance, BalanceAmount, BankApi, BankApiError, ChequeStatus, HttpBankApi,
    IssuedOtp, Transaction,
};
pub use banking_tools::{
    BlockAtmCardTool, CloseComplaintCaseTool, CreateComplaintCaseTool, EscalateComplaintCaseTool,
    GenerateOtpTool, GetAccountBalanceTool, GetAccountDetailsTool, GetCardStatusTool,
    GetChequeStatusTool, GetComplaintCaseTool, GetRecentTransactionsTool, ListComplaintCasesTool,
    UnlockAtmCardTool, VerifyOtpTool, OTP_VERIFIED_FAIL, OTP_VERIFIED_SUCCESS,
};
pub use cards::{CardAction, CardActionGate, CardActionOutcome, CardStatus, CardStatusReport};
pub use cases::{
    CaseError, CaseStatus, CaseStore, ComplaintCase, ComplaintType, Escalation, NewCase,
};
pub use otp::{GeneratedOtp, OtpError, OtpRecord, OtpService, OtpSource, OtpStore};
pub use registry::{create_banking_registry, ToolExecutor, ToolRegistry, ToolServices};
pub use stub::StubBankApi;

// Tool types live in the core crate
pub use bank_agent_core::{
    ContentBlock, ErrorCode, InputSchema, PropertySchema, Tool, ToolError, ToolInput, ToolOutput,
    ToolSchema,
};

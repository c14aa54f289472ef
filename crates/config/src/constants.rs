//! Centralized constants for the banking agent
//!
//! Single source of truth for defaults shared by the config, tools and server
//! crates.

/// Remote bank API
pub mod bank_api {
    /// Default base URL of the mock bank API
    pub const DEFAULT_BASE_URL: &str = "https://bankmock-theta.vercel.app/api/v1";

    /// Request timeout for every outbound call (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

    /// Header carrying the caller's customer identifier
    pub const CUSTOMER_ID_HEADER: &str = "X-Customer-ID";
}

/// One-time passwords
pub mod otp {
    /// Lifetime of an issued code (5 minutes)
    pub const DEFAULT_TTL_SECS: u64 = 300;

    /// Digits in a locally generated code
    pub const DEFAULT_CODE_LENGTH: usize = 6;

    /// Purpose tag used when the caller gives none
    pub const DEFAULT_PURPOSE: &str = "CARD_ACTION";
}

/// Transactions lookup
pub mod transactions {
    pub const DEFAULT_LIMIT: u32 = 5;
    pub const MIN_LIMIT: u32 = 1;
    pub const MAX_LIMIT: u32 = 20;
}

/// Complaint cases
pub mod cases {
    /// Prefix of generated case identifiers
    pub const DEFAULT_ID_PREFIX: &str = "CASE";

    /// Senior agents a case can be escalated to
    pub const DEFAULT_ESCALATION_AGENTS: [&str; 4] =
        ["Priya Verma", "Rohit Sharma", "Anita Desai", "Karan Mehta"];
}

/// HTTP server
pub mod server {
    pub const DEFAULT_HOST: &str = "0.0.0.0";
    pub const DEFAULT_PORT: u16 = 8080;
}

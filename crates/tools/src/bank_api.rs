//! Remote Account Service client
//!
//! Read-only lookups plus OTP issuance and the best-effort card unlock call
//! against the mock bank API. Every request carries the caller's customer
//! identifier in the `X-Customer-ID` header. Responses are JSON objects that
//! may or may not be wrapped in a `data` envelope.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

use bank_agent_config::constants::bank_api::CUSTOMER_ID_HEADER;
use bank_agent_config::BankApiConfig;
use bank_agent_core::CustomerId;

/// Bank API errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BankApiError {
    /// Transport failure, including timeouts
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Body was not the JSON shape we expected
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl BankApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

impl From<reqwest::Error> for BankApiError {
    fn from(err: reqwest::Error) -> Self {
        BankApiError::Network(err.to_string())
    }
}

// ============================================================================
// Response models
// ============================================================================

/// Balance as reported by the bank
#[derive(Debug, Clone, PartialEq)]
pub enum BalanceAmount {
    Numeric(f64),
    Text(String),
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Balance {
    pub account_number: Option<String>,
    pub amount: BalanceAmount,
}

impl Balance {
    /// Balance may appear under `balance`, `availableBalance` or `currentBalance`
    pub fn from_payload(payload: &Value) -> Self {
        let amount = ["balance", "availableBalance", "currentBalance"]
            .iter()
            .filter_map(|key| payload.get(*key))
            .find(|v| !v.is_null())
            .map(|v| match v {
                Value::Number(n) => n
                    .as_f64()
                    .map(BalanceAmount::Numeric)
                    .unwrap_or(BalanceAmount::Unavailable),
                Value::String(s) if !s.is_empty() => BalanceAmount::Text(s.clone()),
                _ => BalanceAmount::Unavailable,
            })
            .unwrap_or(BalanceAmount::Unavailable);

        Self {
            account_number: str_field(payload, "accountNumber"),
            amount,
        }
    }
}

/// One account transaction
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub transaction_id: Option<String>,
    /// `CREDIT`, `DEBIT`, ...
    pub kind: Option<String>,
    pub amount: f64,
    pub description: Option<String>,
    pub timestamp: Option<String>,
}

impl Transaction {
    pub fn from_payload(payload: &Value) -> Self {
        Self {
            transaction_id: str_field(payload, "transactionId"),
            kind: str_field(payload, "type"),
            amount: payload.get("amount").and_then(Value::as_f64).unwrap_or(0.0),
            description: str_field(payload, "description"),
            timestamp: str_field(payload, "timestamp"),
        }
    }

    pub fn is_credit(&self) -> bool {
        self.kind
            .as_deref()
            .map(|k| k.eq_ignore_ascii_case("CREDIT"))
            .unwrap_or(false)
    }

    /// Calendar date part of the timestamp
    pub fn date(&self) -> &str {
        self.timestamp
            .as_deref()
            .map(|ts| match ts.char_indices().nth(10) {
                Some((idx, _)) => &ts[..idx],
                None => ts,
            })
            .unwrap_or("")
    }
}

/// Parse a transactions payload: either `{transactions: [...]}` or a bare array
pub fn transactions_from_payload(payload: &Value) -> Result<Vec<Transaction>, BankApiError> {
    let list = match payload {
        Value::Object(map) => map.get("transactions").unwrap_or(payload),
        other => other,
    };

    match list {
        Value::Array(items) => Ok(items.iter().map(Transaction::from_payload).collect()),
        Value::Null => Ok(Vec::new()),
        Value::Object(map) if map.is_empty() => Ok(Vec::new()),
        other => Err(BankApiError::InvalidResponse(format!(
            "expected a transaction list, got {}",
            type_name(other)
        ))),
    }
}

/// Account details
#[derive(Debug, Clone, PartialEq)]
pub struct AccountDetails {
    pub account_number: Option<String>,
    pub account_type: Option<String>,
    pub branch: Option<String>,
    pub ifsc: Option<String>,
    /// `accountStatus`, else `status`, else `Active`
    pub status: String,
}

impl AccountDetails {
    pub fn from_payload(payload: &Value) -> Self {
        Self {
            account_number: str_field(payload, "accountNumber"),
            account_type: str_field(payload, "accountType"),
            branch: str_field(payload, "branch"),
            ifsc: str_field(payload, "ifsc"),
            status: str_field(payload, "accountStatus")
                .or_else(|| str_field(payload, "status"))
                .unwrap_or_else(|| "Active".to_string()),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active")
    }
}

/// Clearing status of a deposited cheque
#[derive(Debug, Clone, PartialEq)]
pub struct ChequeStatus {
    pub amount: Option<String>,
    pub status: Option<String>,
    pub expected_clearance_date: Option<String>,
}

impl ChequeStatus {
    pub fn from_payload(payload: &Value) -> Self {
        Self {
            amount: str_field(payload, "amount"),
            status: str_field(payload, "status"),
            expected_clearance_date: str_field(payload, "expectedClearanceDate"),
        }
    }
}

/// Result of asking the bank to issue an OTP
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssuedOtp {
    /// Present only when the bank runs in demo mode
    pub code: Option<String>,
    /// Human readable lifetime, e.g. "5 minutes"
    pub expires_in: Option<String>,
}

impl IssuedOtp {
    /// The code may sit at `otp` or one level deeper at `data.otp`
    pub fn from_payload(payload: &Value) -> Self {
        let code = str_field(payload, "otp").or_else(|| {
            payload
                .get("data")
                .and_then(|inner| str_field(inner, "otp"))
        });

        Self {
            code,
            expires_in: str_field(payload, "expiresIn"),
        }
    }
}

/// Strip the optional `data` envelope
pub fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) => match map.remove("data") {
            Some(inner) if !inner.is_null() => inner,
            Some(_) | None => Value::Object(map),
        },
        other => other,
    }
}

fn str_field(payload: &Value, key: &str) -> Option<String> {
    match payload.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// Client trait
// ============================================================================

/// Remote account service
///
/// Implemented over HTTP by [`HttpBankApi`]; tests substitute an in-memory
/// implementation.
#[async_trait]
pub trait BankApi: Send + Sync {
    /// `GET /balance`
    async fn balance(&self, customer: &CustomerId) -> Result<Balance, BankApiError>;

    /// `GET /transactions?limit=<n>`; `limit` is sent as given
    async fn transactions(
        &self,
        customer: &CustomerId,
        limit: u32,
    ) -> Result<Vec<Transaction>, BankApiError>;

    /// `GET /account`
    async fn account(&self, customer: &CustomerId) -> Result<AccountDetails, BankApiError>;

    /// `GET /cheque/<number>`
    async fn cheque(
        &self,
        customer: &CustomerId,
        cheque_number: &str,
    ) -> Result<ChequeStatus, BankApiError>;

    /// `POST /generate-otp`
    async fn generate_otp(
        &self,
        customer: &CustomerId,
        purpose: &str,
    ) -> Result<IssuedOtp, BankApiError>;

    /// `POST /transfer` with `{amount: 0, action: "UNLOCK_CARD"}`; the body is ignored
    async fn unlock_card(&self, customer: &CustomerId) -> Result<(), BankApiError>;
}

/// HTTP implementation backed by reqwest
pub struct HttpBankApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBankApi {
    pub fn new(config: &BankApiConfig) -> Result<Self, BankApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BankApiError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(
        &self,
        method: reqwest::Method,
        path: &str,
        customer: &CustomerId,
    ) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(CUSTOMER_ID_HEADER, customer.as_str())
    }

    /// Send, reject non-2xx, and return the body with its envelope removed
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value, BankApiError> {
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BankApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text)
            .map_err(|e| BankApiError::InvalidResponse(e.to_string()))?;

        Ok(unwrap_envelope(body))
    }

    fn expect_object(payload: Value, what: &str) -> Result<Value, BankApiError> {
        if payload.is_object() {
            Ok(payload)
        } else {
            Err(BankApiError::InvalidResponse(format!(
                "expected {} object, got {}",
                what,
                type_name(&payload)
            )))
        }
    }
}

#[async_trait]
impl BankApi for HttpBankApi {
    async fn balance(&self, customer: &CustomerId) -> Result<Balance, BankApiError> {
        tracing::debug!(customer_id = %customer, "Fetching balance");
        let payload = self
            .send(self.request(reqwest::Method::GET, "/balance", customer))
            .await?;
        let payload = Self::expect_object(payload, "balance")?;
        Ok(Balance::from_payload(&payload))
    }

    async fn transactions(
        &self,
        customer: &CustomerId,
        limit: u32,
    ) -> Result<Vec<Transaction>, BankApiError> {
        tracing::debug!(customer_id = %customer, limit, "Fetching transactions");
        let payload = self
            .send(
                self.request(
                    reqwest::Method::GET,
                    &format!("/transactions?limit={}", limit),
                    customer,
                ),
            )
            .await?;
        transactions_from_payload(&payload)
    }

    async fn account(&self, customer: &CustomerId) -> Result<AccountDetails, BankApiError> {
        tracing::debug!(customer_id = %customer, "Fetching account details");
        let payload = self
            .send(self.request(reqwest::Method::GET, "/account", customer))
            .await?;
        let payload = Self::expect_object(payload, "account")?;
        Ok(AccountDetails::from_payload(&payload))
    }

    async fn cheque(
        &self,
        customer: &CustomerId,
        cheque_number: &str,
    ) -> Result<ChequeStatus, BankApiError> {
        tracing::debug!(customer_id = %customer, cheque_number, "Fetching cheque status");
        let payload = self
            .send(self.request(
                reqwest::Method::GET,
                &format!("/cheque/{}", cheque_number),
                customer,
            ))
            .await?;
        let payload = Self::expect_object(payload, "cheque")?;
        Ok(ChequeStatus::from_payload(&payload))
    }

    async fn generate_otp(
        &self,
        customer: &CustomerId,
        purpose: &str,
    ) -> Result<IssuedOtp, BankApiError> {
        tracing::debug!(customer_id = %customer, purpose, "Requesting OTP issuance");
        let payload = self
            .send(
                self.request(reqwest::Method::POST, "/generate-otp", customer)
                    .json(&json!({ "purpose": purpose })),
            )
            .await?;
        Ok(IssuedOtp::from_payload(&payload))
    }

    async fn unlock_card(&self, customer: &CustomerId) -> Result<(), BankApiError> {
        tracing::debug!(customer_id = %customer, "Requesting card unlock");
        let response = self
            .request(reqwest::Method::POST, "/transfer", customer)
            .json(&json!({ "amount": 0, "action": "UNLOCK_CARD" }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BankApiError::Status {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        Ok(())
    }
}

//! In-memory bank API
//!
//! Canned responses plus a log of every call made, for development and tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::collections::HashMap;

use bank_agent_core::CustomerId;

use crate::bank_api::{
    transactions_from_payload, AccountDetails, Balance, BankApi, BankApiError, ChequeStatus,
    IssuedOtp, Transaction,
};

/// Stub bank API with canned payloads
pub struct StubBankApi {
    balance: Value,
    account: Value,
    transactions: Vec<Value>,
    cheques: HashMap<String, Value>,
    otp: IssuedOtp,
    error: Option<BankApiError>,
    calls: Mutex<Vec<String>>,
}

impl StubBankApi {
    pub fn new() -> Self {
        Self {
            balance: json!({ "accountNumber": "XXXX4521", "balance": 125000.5 }),
            account: json!({
                "accountNumber": "XXXX4521",
                "accountType": "Savings",
                "branch": "MG Road, Bengaluru",
                "ifsc": "SWFT0001234",
                "accountStatus": "Active"
            }),
            transactions: Vec::new(),
            cheques: HashMap::new(),
            otp: IssuedOtp::default(),
            error: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_balance(mut self, payload: Value) -> Self {
        self.balance = payload;
        self
    }

    pub fn with_account(mut self, payload: Value) -> Self {
        self.account = payload;
        self
    }

    /// Returned in full regardless of the requested limit
    pub fn with_transactions(mut self, payload: Vec<Value>) -> Self {
        self.transactions = payload;
        self
    }

    pub fn with_cheque(mut self, number: &str, payload: Value) -> Self {
        self.cheques.insert(number.to_string(), payload);
        self
    }

    pub fn with_otp(mut self, code: Option<&str>, expires_in: Option<&str>) -> Self {
        self.otp = IssuedOtp {
            code: code.map(str::to_string),
            expires_in: expires_in.map(str::to_string),
        };
        self
    }

    /// Every call fails with this error
    pub fn with_error(mut self, error: BankApiError) -> Self {
        self.error = Some(error);
        self
    }

    /// Every call fails as if the bank were unreachable
    pub fn failing(self) -> Self {
        self.with_error(BankApiError::Network("connection refused".to_string()))
    }

    /// Calls made so far, e.g. `transactions:20`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn record(&self, call: String) -> Result<(), BankApiError> {
        self.calls.lock().push(call);
        match &self.error {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

impl Default for StubBankApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BankApi for StubBankApi {
    async fn balance(&self, _customer: &CustomerId) -> Result<Balance, BankApiError> {
        self.record("balance".to_string())?;
        Ok(Balance::from_payload(&self.balance))
    }

    async fn transactions(
        &self,
        _customer: &CustomerId,
        limit: u32,
    ) -> Result<Vec<Transaction>, BankApiError> {
        self.record(format!("transactions:{}", limit))?;
        transactions_from_payload(&Value::Array(self.transactions.clone()))
    }

    async fn account(&self, _customer: &CustomerId) -> Result<AccountDetails, BankApiError> {
        self.record("account".to_string())?;
        Ok(AccountDetails::from_payload(&self.account))
    }

    async fn cheque(
        &self,
        _customer: &CustomerId,
        cheque_number: &str,
    ) -> Result<ChequeStatus, BankApiError> {
        self.record(format!("cheque:{}", cheque_number))?;
        self.cheques
            .get(cheque_number)
            .map(ChequeStatus::from_payload)
            .ok_or_else(|| BankApiError::Status {
                status: 404,
                body: r#"{"error":"Cheque not found"}"#.to_string(),
            })
    }

    async fn generate_otp(
        &self,
        _customer: &CustomerId,
        purpose: &str,
    ) -> Result<IssuedOtp, BankApiError> {
        self.record(format!("generate_otp:{}", purpose))?;
        Ok(self.otp.clone())
    }

    async fn unlock_card(&self, _customer: &CustomerId) -> Result<(), BankApiError> {
        self.record("unlock_card".to_string())
    }
}

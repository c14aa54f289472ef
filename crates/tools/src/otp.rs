//! OTP Tracker
//!
//! One pending one-time password per customer. Codes are issued through the
//! bank API when it returns one (demo mode) and generated locally otherwise,
//! so issuance never fails. Verification is single-use and time-limited.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use rand::Rng;
use std::sync::Arc;
use thiserror::Error;

use bank_agent_config::OtpConfig;
use bank_agent_core::CustomerId;

use crate::bank_api::BankApi;

/// Why a submitted code was rejected
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpError {
    #[error("no OTP pending")]
    NoOtpPending,

    #[error("OTP already used")]
    AlreadyUsed,

    #[error("OTP expired")]
    Expired,

    #[error("OTP mismatch")]
    Mismatch,
}

/// Pending code for one customer
#[derive(Debug, Clone)]
pub struct OtpRecord {
    pub code: String,
    pub expires_at: DateTime<Utc>,
    pub used: bool,
    pub purpose: String,
}

impl OtpRecord {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

/// Process-wide OTP records keyed by customer
///
/// Each operation holds the entry's shard guard for its whole
/// check-then-update sequence.
#[derive(Debug, Default)]
pub struct OtpStore {
    records: DashMap<CustomerId, OtpRecord>,
}

impl OtpStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a fresh record, replacing any previous one outright
    pub fn issue(&self, customer: &CustomerId, record: OtpRecord) {
        self.records.insert(customer.clone(), record);
    }

    pub fn verify(&self, customer: &CustomerId, submitted: &str) -> Result<(), OtpError> {
        self.verify_at(customer, submitted, Utc::now())
    }

    /// Verify against an explicit instant
    pub fn verify_at(
        &self,
        customer: &CustomerId,
        submitted: &str,
        now: DateTime<Utc>,
    ) -> Result<(), OtpError> {
        let mut record = self
            .records
            .get_mut(customer)
            .ok_or(OtpError::NoOtpPending)?;

        if record.used {
            return Err(OtpError::AlreadyUsed);
        }
        if record.is_expired_at(now) {
            return Err(OtpError::Expired);
        }
        if record.code != submitted.trim() {
            return Err(OtpError::Mismatch);
        }

        record.used = true;
        Ok(())
    }

    pub fn get(&self, customer: &CustomerId) -> Option<OtpRecord> {
        self.records.get(customer).map(|r| r.clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Where an issued code came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpSource {
    BankApi,
    Local,
}

/// Code handed back to the caller after issuance
#[derive(Debug, Clone)]
pub struct GeneratedOtp {
    pub code: String,
    pub expires_in: String,
    pub source: OtpSource,
}

/// Issues and verifies OTPs
pub struct OtpService {
    api: Arc<dyn BankApi>,
    store: Arc<OtpStore>,
    ttl: Duration,
    code_length: u32,
}

impl OtpService {
    pub fn new(api: Arc<dyn BankApi>, store: Arc<OtpStore>, config: &OtpConfig) -> Self {
        Self {
            api,
            store,
            ttl: Duration::seconds(config.ttl_secs as i64),
            code_length: config.code_length as u32,
        }
    }

    pub fn store(&self) -> &Arc<OtpStore> {
        &self.store
    }

    /// Issue a code, overwriting any pending one for this customer
    pub async fn generate(&self, customer: &CustomerId, purpose: &str) -> GeneratedOtp {
        let remote = match self.api.generate_otp(customer, purpose).await {
            Ok(issued) => Some(issued),
            Err(e) => {
                tracing::warn!(
                    customer_id = %customer,
                    error = %e,
                    "OTP issuance via bank API failed, generating locally"
                );
                None
            },
        };

        let remote_expiry = remote.as_ref().and_then(|r| r.expires_in.clone());
        let (code, source) = match remote.and_then(|r| r.code) {
            Some(code) => (code, OtpSource::BankApi),
            None => (self.local_code(), OtpSource::Local),
        };

        let now = Utc::now();
        self.store.issue(
            customer,
            OtpRecord {
                code: code.clone(),
                expires_at: now + self.ttl,
                used: false,
                purpose: purpose.to_string(),
            },
        );

        tracing::info!(
            customer_id = %customer,
            purpose,
            source = ?source,
            "OTP issued"
        );

        GeneratedOtp {
            code,
            expires_in: remote_expiry.unwrap_or_else(|| describe_ttl(self.ttl)),
            source,
        }
    }

    pub fn verify(&self, customer: &CustomerId, submitted: &str) -> Result<(), OtpError> {
        let result = self.store.verify(customer, submitted);
        match &result {
            Ok(()) => tracing::info!(customer_id = %customer, "OTP verified"),
            Err(e) => tracing::warn!(customer_id = %customer, reason = %e, "OTP verification failed"),
        }
        result
    }

    fn local_code(&self) -> String {
        let low = 10u64.pow(self.code_length.saturating_sub(1));
        let high = 10u64.pow(self.code_length);
        rand::thread_rng().gen_range(low..high).to_string()
    }
}

fn describe_ttl(ttl: Duration) -> String {
    let secs = ttl.num_seconds();
    match secs {
        60 => "1 minute".to_string(),
        s if s % 60 == 0 => format!("{} minutes", s / 60),
        s => format!("{} seconds", s),
    }
}

//! Complaint Case Tracker
//!
//! Cases move OPEN → CLOSED or OPEN → ESCALATED and never leave a terminal
//! state. Every lookup and mutation is scoped to the owning customer.

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use bank_agent_config::constants::cases::DEFAULT_ESCALATION_AGENTS;
use bank_agent_config::CaseConfig;
use bank_agent_core::CustomerId;

const ID_SUFFIX_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const ID_SUFFIX_LEN: usize = 5;

/// Display name used for cases opened implicitly by an escalation
pub const IMPLICIT_CUSTOMER_NAME: &str = "Customer";

/// Case lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CaseStatus {
    Open,
    Closed,
    Escalated,
}

impl CaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
            Self::Escalated => "ESCALATED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Open)
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complaint category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplaintType {
    ChequeNotCredited,
    MissingTransaction,
    CardIssue,
    GeneralComplaint,
}

impl ComplaintType {
    pub const ALL: [ComplaintType; 4] = [
        Self::ChequeNotCredited,
        Self::MissingTransaction,
        Self::CardIssue,
        Self::GeneralComplaint,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ChequeNotCredited => "CHEQUE_NOT_CREDITED",
            Self::MissingTransaction => "MISSING_TRANSACTION",
            Self::CardIssue => "CARD_ISSUE",
            Self::GeneralComplaint => "GENERAL_COMPLAINT",
        }
    }

    /// Case-insensitive parse of the wire tag
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(raw))
    }

    /// Tag with underscores replaced by spaces, e.g. "CARD ISSUE"
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl fmt::Display for ComplaintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored complaint case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplaintCase {
    pub case_id: String,
    pub customer_id: CustomerId,
    pub customer_name: String,
    pub complaint_type: ComplaintType,
    pub description: String,
    pub cheque_number: Option<String>,
    pub status: CaseStatus,
    pub resolution: Option<String>,
    pub assigned_agent: Option<String>,
    pub escalation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when opening a case
#[derive(Debug, Clone)]
pub struct NewCase {
    pub customer_name: String,
    pub complaint_type: ComplaintType,
    pub description: String,
    pub cheque_number: Option<String>,
}

/// Outcome of an escalation
#[derive(Debug, Clone)]
pub struct Escalation {
    pub case: ComplaintCase,
    /// No case existed under the requested id, so a new one was opened
    pub created: bool,
}

/// Case lookup and transition failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaseError {
    #[error("case {0} not found")]
    NotFound(String),

    #[error("case {0} belongs to another customer")]
    NotOwner(String),

    #[error("case {case_id} is already {status}")]
    Terminal { case_id: String, status: CaseStatus },
}

/// Process-wide case records keyed by case id
pub struct CaseStore {
    cases: DashMap<String, ComplaintCase>,
    id_prefix: String,
    agents: Vec<String>,
}

impl CaseStore {
    pub fn new(config: &CaseConfig) -> Self {
        let mut agents: Vec<String> = config
            .escalation_agents
            .iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();
        if agents.is_empty() {
            agents = DEFAULT_ESCALATION_AGENTS
                .iter()
                .map(|a| a.to_string())
                .collect();
        }

        Self {
            cases: DashMap::new(),
            id_prefix: config.id_prefix.clone(),
            agents,
        }
    }

    /// Escalation roster
    pub fn agents(&self) -> &[String] {
        &self.agents
    }

    /// Open a new case
    pub fn create(&self, customer: &CustomerId, new_case: NewCase) -> ComplaintCase {
        let now = Utc::now();
        let case = self.insert_new(|case_id| ComplaintCase {
            case_id,
            customer_id: customer.clone(),
            customer_name: new_case.customer_name.clone(),
            complaint_type: new_case.complaint_type,
            description: new_case.description.clone(),
            cheque_number: new_case.cheque_number.clone(),
            status: CaseStatus::Open,
            resolution: None,
            assigned_agent: None,
            escalation_reason: None,
            created_at: now,
            updated_at: now,
        });

        tracing::info!(
            case_id = %case.case_id,
            customer_id = %customer,
            complaint_type = %case.complaint_type,
            "Complaint case created"
        );

        case
    }

    pub fn get(&self, customer: &CustomerId, case_id: &str) -> Result<ComplaintCase, CaseError> {
        let case = self
            .cases
            .get(case_id)
            .ok_or_else(|| CaseError::NotFound(case_id.to_string()))?;

        if &case.customer_id != customer {
            return Err(CaseError::NotOwner(case_id.to_string()));
        }

        Ok(case.clone())
    }

    /// Close an open case with a resolution note
    pub fn close(
        &self,
        customer: &CustomerId,
        case_id: &str,
        resolution: &str,
    ) -> Result<ComplaintCase, CaseError> {
        let mut case = self
            .cases
            .get_mut(case_id)
            .ok_or_else(|| CaseError::NotFound(case_id.to_string()))?;

        Self::check_transition(&case, customer)?;

        case.status = CaseStatus::Closed;
        case.resolution = Some(resolution.to_string());
        case.updated_at = Utc::now();

        tracing::info!(case_id = %case_id, customer_id = %customer, "Complaint case closed");

        Ok(case.clone())
    }

    /// Escalate a case to a senior agent, opening one first if `case_id` is unknown
    pub fn escalate(
        &self,
        customer: &CustomerId,
        case_id: &str,
        reason: &str,
    ) -> Result<Escalation, CaseError> {
        if let Some(mut case) = self.cases.get_mut(case_id) {
            Self::check_transition(&case, customer)?;

            let agent = self.pick_agent();
            case.status = CaseStatus::Escalated;
            case.assigned_agent = Some(agent);
            case.escalation_reason = Some(reason.to_string());
            case.updated_at = Utc::now();

            tracing::info!(
                case_id = %case_id,
                customer_id = %customer,
                agent = ?case.assigned_agent,
                "Complaint case escalated"
            );

            return Ok(Escalation {
                case: case.clone(),
                created: false,
            });
        }

        let now = Utc::now();
        let agent = self.pick_agent();
        let case = self.insert_new(|new_id| ComplaintCase {
            case_id: new_id,
            customer_id: customer.clone(),
            customer_name: IMPLICIT_CUSTOMER_NAME.to_string(),
            complaint_type: ComplaintType::GeneralComplaint,
            description: reason.to_string(),
            cheque_number: None,
            status: CaseStatus::Escalated,
            resolution: None,
            assigned_agent: Some(agent.clone()),
            escalation_reason: Some(reason.to_string()),
            created_at: now,
            updated_at: now,
        });

        tracing::info!(
            requested_case_id = %case_id,
            case_id = %case.case_id,
            customer_id = %customer,
            agent = %agent,
            "Escalation opened a new complaint case"
        );

        Ok(Escalation {
            case,
            created: true,
        })
    }

    /// Cases owned by `customer`, most recently updated first
    pub fn list_for_customer(&self, customer: &CustomerId) -> Vec<ComplaintCase> {
        let mut cases: Vec<ComplaintCase> = self
            .cases
            .iter()
            .filter(|entry| &entry.customer_id == customer)
            .map(|entry| entry.value().clone())
            .collect();
        cases.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        cases
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    fn check_transition(case: &ComplaintCase, customer: &CustomerId) -> Result<(), CaseError> {
        if &case.customer_id != customer {
            return Err(CaseError::NotOwner(case.case_id.clone()));
        }
        if case.status.is_terminal() {
            return Err(CaseError::Terminal {
                case_id: case.case_id.clone(),
                status: case.status,
            });
        }
        Ok(())
    }

    /// Insert under a freshly generated id, retrying on the rare collision
    fn insert_new(&self, build: impl Fn(String) -> ComplaintCase) -> ComplaintCase {
        loop {
            match self.cases.entry(self.generate_id()) {
                Entry::Occupied(_) => continue,
                Entry::Vacant(slot) => {
                    let case = build(slot.key().clone());
                    slot.insert(case.clone());
                    return case;
                },
            }
        }
    }

    fn generate_id(&self) -> String {
        let mut rng = rand::thread_rng();
        let suffix: String = (0..ID_SUFFIX_LEN)
            .map(|_| ID_SUFFIX_CHARSET[rng.gen_range(0..ID_SUFFIX_CHARSET.len())] as char)
            .collect();
        format!(
            "{}-{}-{}",
            self.id_prefix,
            Utc::now().timestamp_millis(),
            suffix
        )
    }

    fn pick_agent(&self) -> String {
        self.agents
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_default()
    }
}

impl Default for CaseStore {
    fn default() -> Self {
        Self::new(&CaseConfig::default())
    }
}

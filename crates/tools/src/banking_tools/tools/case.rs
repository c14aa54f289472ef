//! Complaint Case Tools
//!
//! Create, look up, close, escalate and list complaint cases. Every operation
//! is scoped to the calling customer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use std::sync::Arc;

use bank_agent_core::{InputSchema, PropertySchema, Tool, ToolError, ToolOutput, ToolSchema};

use crate::banking_tools::utils::{customer_id, customer_id_property, optional_str, required_str};
use crate::cases::{CaseError, CaseStore, ComplaintCase, ComplaintType, Escalation, NewCase};

pub const DEFAULT_RESOLUTION_NOTE: &str = "Resolved – customer satisfied";
pub const DEFAULT_ESCALATION_REASON: &str = "Customer not satisfied with initial resolution";

fn date(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

fn case_id_property() -> PropertySchema {
    PropertySchema::string("The case ID (format: CASE-XXXXXXXXXXXXX-XXXXX)")
}

/// Messages for lookup failures shared by get/close/escalate
fn render_case_error(err: &CaseError, verb: &str) -> String {
    match err {
        CaseError::NotFound(id) => {
            format!("Case {} not found. Please verify the case ID and try again.", id)
        },
        CaseError::NotOwner(id) => format!("Case {} does not belong to your account.", id),
        CaseError::Terminal { case_id, status } => format!(
            "Case {} is already {} and cannot be {}.",
            case_id, status, verb
        ),
    }
}

// ============================================================================
// create_complaint_case
// ============================================================================

pub struct CreateComplaintCaseTool {
    store: Arc<CaseStore>,
}

impl CreateComplaintCaseTool {
    pub fn new(store: Arc<CaseStore>) -> Self {
        Self { store }
    }

    fn render(case: &ComplaintCase) -> String {
        let cheque_note = case
            .cheque_number
            .as_deref()
            .map(|n| format!("\n• Cheque Number:  {}", n))
            .unwrap_or_default();

        format!(
            "✅ Complaint registered successfully!\n\n\
             📁 Case Details:\n\
             • Case ID:        {}\n\
             • Type:           {}\n\
             • Status:         {}\n\
             • Description:    {}{}\n\
             • Created At:     {}\n\n\
             You will receive updates at your registered mobile/email. \
             Is this resolved to your satisfaction, or would you like to escalate to a human agent?",
            case.case_id,
            case.complaint_type.label(),
            case.status,
            case.description,
            cheque_note,
            date(&case.created_at)
        )
    }
}

#[async_trait]
impl Tool for CreateComplaintCaseTool {
    fn name(&self) -> &str {
        "create_complaint_case"
    }

    fn description(&self) -> &str {
        "Register a new complaint for the authenticated customer, such as a cheque not credited or a missing transaction"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: InputSchema::object()
                .property("customer_id", customer_id_property(), true)
                .property(
                    "customer_name",
                    PropertySchema::string("Full name of the customer"),
                    true,
                )
                .property(
                    "complaint_type",
                    PropertySchema::enum_type(
                        "Type of complaint",
                        ComplaintType::ALL
                            .iter()
                            .map(|t| t.as_str().to_string())
                            .collect(),
                    ),
                    true,
                )
                .property(
                    "description",
                    PropertySchema::string("The complaint as stated by the customer"),
                    true,
                )
                .property(
                    "cheque_number",
                    PropertySchema::string("Cheque number, if the complaint concerns a cheque"),
                    false,
                ),
        }
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput, ToolError> {
        let customer = customer_id(&input)?;
        let customer_name = required_str(&input, "customer_name")?.trim();
        let raw_type = required_str(&input, "complaint_type")?;
        let complaint_type = ComplaintType::parse(raw_type).ok_or_else(|| {
            ToolError::invalid_params(format!("Unknown complaint_type: {}", raw_type))
        })?;
        let description = required_str(&input, "description")?.trim();

        let case = self.store.create(
            &customer,
            NewCase {
                customer_name: customer_name.to_string(),
                complaint_type,
                description: description.to_string(),
                cheque_number: optional_str(&input, "cheque_number").map(str::to_string),
            },
        );

        Ok(ToolOutput::text(Self::render(&case)))
    }
}

// ============================================================================
// get_complaint_case
// ============================================================================

pub struct GetComplaintCaseTool {
    store: Arc<CaseStore>,
}

impl GetComplaintCaseTool {
    pub fn new(store: Arc<CaseStore>) -> Self {
        Self { store }
    }

    fn render(case: &ComplaintCase) -> String {
        let mut text = format!(
            "📁 Case {}:\n\
             • Customer:       {}\n\
             • Status:         {}\n\
             • Type:           {}\n\
             • Description:    {}",
            case.case_id,
            case.customer_name,
            case.status,
            case.complaint_type.label(),
            case.description,
        );

        if let Some(ref cheque) = case.cheque_number {
            text.push_str(&format!("\n• Cheque Number:  {}", cheque));
        }
        text.push_str(&format!(
            "\n• Created:        {}\n• Last Updated:   {}",
            date(&case.created_at),
            date(&case.updated_at)
        ));

        if let Some(ref agent) = case.assigned_agent {
            text.push_str(&format!("\n• Assigned Agent: {}", agent));
        }
        if let Some(ref reason) = case.escalation_reason {
            text.push_str(&format!("\n• Escalation Reason: {}", reason));
        }
        if let Some(ref resolution) = case.resolution {
            text.push_str(&format!("\n• Resolution:     {}", resolution));
        }

        text
    }
}

#[async_trait]
impl Tool for GetComplaintCaseTool {
    fn name(&self) -> &str {
        "get_complaint_case"
    }

    fn description(&self) -> &str {
        "Retrieve the current status and details of an existing complaint case"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: InputSchema::object()
                .property("customer_id", customer_id_property(), true)
                .property("case_id", case_id_property(), true),
        }
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput, ToolError> {
        let customer = customer_id(&input)?;
        let case_id = required_str(&input, "case_id")?.trim();

        let text = match self.store.get(&customer, case_id) {
            Ok(case) => Self::render(&case),
            Err(e) => render_case_error(&e, "viewed"),
        };

        Ok(ToolOutput::text(text))
    }
}

// ============================================================================
// close_complaint_case
// ============================================================================

pub struct CloseComplaintCaseTool {
    store: Arc<CaseStore>,
}

impl CloseComplaintCaseTool {
    pub fn new(store: Arc<CaseStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for CloseComplaintCaseTool {
    fn name(&self) -> &str {
        "close_complaint_case"
    }

    fn description(&self) -> &str {
        "Close a complaint case when the customer is satisfied with the resolution"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: InputSchema::object()
                .property("customer_id", customer_id_property(), true)
                .property("case_id", case_id_property(), true)
                .property(
                    "resolution_note",
                    PropertySchema::string("How the issue was resolved")
                        .with_default(json!(DEFAULT_RESOLUTION_NOTE)),
                    false,
                ),
        }
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput, ToolError> {
        let customer = customer_id(&input)?;
        let case_id = required_str(&input, "case_id")?.trim();
        let note = optional_str(&input, "resolution_note").unwrap_or(DEFAULT_RESOLUTION_NOTE);

        let text = match self.store.close(&customer, case_id, note) {
            Ok(case) => format!(
                "✅ Case {} has been CLOSED.\n\
                 Resolution: {}\n\n\
                 Thank you for banking with SwiftBank. Is there anything else I can help you with?",
                case.case_id, note
            ),
            Err(e) => render_case_error(&e, "closed"),
        };

        Ok(ToolOutput::text(text))
    }
}

// ============================================================================
// escalate_complaint_case
// ============================================================================

pub struct EscalateComplaintCaseTool {
    store: Arc<CaseStore>,
}

impl EscalateComplaintCaseTool {
    pub fn new(store: Arc<CaseStore>) -> Self {
        Self { store }
    }

    fn render(escalation: &Escalation, reason: &str) -> String {
        let case = &escalation.case;
        format!(
            "🔴 Case {} has been ESCALATED to a senior agent.\n\n\
             • Assigned Agent:  {}\n\
             • Reason:          {}\n\
             • Escalation Time: {}\n\n\
             Our agent will contact you within 30 minutes on your registered mobile number. \
             The full conversation transcript has been forwarded. \
             Is there anything else you'd like to note for the agent?",
            case.case_id,
            case.assigned_agent.as_deref().unwrap_or("N/A"),
            reason,
            date(&case.updated_at)
        )
    }
}

#[async_trait]
impl Tool for EscalateComplaintCaseTool {
    fn name(&self) -> &str {
        "escalate_complaint_case"
    }

    fn description(&self) -> &str {
        "Escalate a complaint case to a senior human agent when the customer asks for it or is not satisfied. Opens a new case if none exists yet"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: InputSchema::object()
                .property("customer_id", customer_id_property(), true)
                .property(
                    "case_id",
                    PropertySchema::string(
                        "The case ID to escalate; leave empty to open a new escalated case",
                    ),
                    false,
                )
                .property(
                    "reason",
                    PropertySchema::string("Reason for escalation")
                        .with_default(json!(DEFAULT_ESCALATION_REASON)),
                    false,
                ),
        }
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput, ToolError> {
        let customer = customer_id(&input)?;
        let case_id = optional_str(&input, "case_id").unwrap_or("");
        let reason = optional_str(&input, "reason").unwrap_or(DEFAULT_ESCALATION_REASON);

        let text = match self.store.escalate(&customer, case_id, reason) {
            Ok(escalation) => Self::render(&escalation, reason),
            Err(e) => render_case_error(&e, "escalated"),
        };

        Ok(ToolOutput::text(text))
    }
}

// ============================================================================
// list_complaint_cases
// ============================================================================

pub struct ListComplaintCasesTool {
    store: Arc<CaseStore>,
}

impl ListComplaintCasesTool {
    pub fn new(store: Arc<CaseStore>) -> Self {
        Self { store }
    }

    fn render(cases: &[ComplaintCase]) -> String {
        if cases.is_empty() {
            return "No complaint cases found for your account.".to_string();
        }

        let lines: Vec<String> = cases
            .iter()
            .enumerate()
            .map(|(i, case)| {
                format!(
                    "{}. {} | {} | {} | updated {}",
                    i + 1,
                    case.case_id,
                    case.status,
                    case.complaint_type.label(),
                    date(&case.updated_at)
                )
            })
            .collect();

        format!("📁 Your complaint cases:\n{}", lines.join("\n"))
    }
}

#[async_trait]
impl Tool for ListComplaintCasesTool {
    fn name(&self) -> &str {
        "list_complaint_cases"
    }

    fn description(&self) -> &str {
        "List the customer's complaint cases, most recently updated first"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: InputSchema::object().property("customer_id", customer_id_property(), true),
        }
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput, ToolError> {
        let customer = customer_id(&input)?;
        let cases = self.store.list_for_customer(&customer);
        Ok(ToolOutput::text(Self::render(&cases)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> Arc<CaseStore> {
        Arc::new(CaseStore::default())
    }

    fn case_id_from(text: &str) -> String {
        text.lines()
            .find_map(|l| l.strip_prefix("• Case ID:        "))
            .map(str::to_string)
            .unwrap()
    }

    async fn create(store: &Arc<CaseStore>, customer: &str) -> String {
        let text = CreateComplaintCaseTool::new(store.clone())
            .execute(json!({
                "customer_id": customer,
                "customer_name": "Asha Rao",
                "complaint_type": "CHEQUE_NOT_CREDITED",
                "description": "Cheque deposited on Monday not credited",
                "cheque_number": "004512"
            }))
            .await
            .unwrap()
            .as_text();
        case_id_from(&text)
    }

    #[tokio::test]
    async fn test_create_message() {
        let store = store();
        let text = CreateComplaintCaseTool::new(store.clone())
            .execute(json!({
                "customer_id": "CUST001",
                "customer_name": "Asha Rao",
                "complaint_type": "missing_transaction",
                "description": "UPI payment missing"
            }))
            .await
            .unwrap()
            .as_text();

        assert!(text.starts_with("✅ Complaint registered successfully!\n\n📁 Case Details:\n"));
        assert!(text.contains("• Type:           MISSING TRANSACTION\n"));
        assert!(text.contains("• Status:         OPEN\n"));
        assert!(text.contains("• Description:    UPI payment missing\n• Created At:"));
        assert!(!text.contains("Cheque Number"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_type() {
        let err = CreateComplaintCaseTool::new(store())
            .execute(json!({
                "customer_id": "CUST001",
                "customer_name": "Asha Rao",
                "complaint_type": "REFUND",
                "description": "x"
            }))
            .await
            .unwrap_err();
        assert!(err.message.contains("REFUND"));
    }

    #[tokio::test]
    async fn test_get_round_trip() {
        let store = store();
        let case_id = create(&store, "CUST001").await;

        let text = GetComplaintCaseTool::new(store.clone())
            .execute(json!({"customer_id": "CUST001", "case_id": &case_id}))
            .await
            .unwrap()
            .as_text();

        assert!(text.starts_with(&format!("📁 Case {}:\n", case_id)));
        assert!(text.contains("• Status:         OPEN"));
        assert!(text.contains("• Type:           CHEQUE NOT CREDITED"));
        assert!(text.contains("• Customer:       Asha Rao\n"));
        assert!(text.contains("• Description:    Cheque deposited on Monday not credited\n"));
        assert!(text.contains("• Cheque Number:  004512\n• Created:"));
        assert!(!text.contains("Assigned Agent"));
        assert!(!text.contains("Escalation Reason"));
    }

    #[tokio::test]
    async fn test_ownership_and_missing() {
        let store = store();
        let case_id = create(&store, "CUST001").await;

        let get = GetComplaintCaseTool::new(store.clone());
        let text = get
            .execute(json!({"customer_id": "CUST999", "case_id": &case_id}))
            .await
            .unwrap()
            .as_text();
        assert_eq!(text, format!("Case {} does not belong to your account.", case_id));

        let text = CloseComplaintCaseTool::new(store.clone())
            .execute(json!({"customer_id": "CUST999", "case_id": &case_id}))
            .await
            .unwrap()
            .as_text();
        assert_eq!(text, format!("Case {} does not belong to your account.", case_id));

        let text = get
            .execute(json!({"customer_id": "CUST001", "case_id": "CASE-1-AAAAA"}))
            .await
            .unwrap()
            .as_text();
        assert_eq!(
            text,
            "Case CASE-1-AAAAA not found. Please verify the case ID and try again."
        );
    }

    #[tokio::test]
    async fn test_close_then_get_shows_resolution() {
        let store = store();
        let case_id = create(&store, "CUST001").await;

        let text = CloseComplaintCaseTool::new(store.clone())
            .execute(json!({"customer_id": "CUST001", "case_id": &case_id}))
            .await
            .unwrap()
            .as_text();
        assert_eq!(
            text,
            format!(
                "✅ Case {} has been CLOSED.\nResolution: Resolved – customer satisfied\n\n\
                 Thank you for banking with SwiftBank. Is there anything else I can help you with?",
                case_id
            )
        );

        let text = GetComplaintCaseTool::new(store.clone())
            .execute(json!({"customer_id": "CUST001", "case_id": &case_id}))
            .await
            .unwrap()
            .as_text();
        assert!(text.contains("• Status:         CLOSED"));
        assert!(text.ends_with("• Resolution:     Resolved – customer satisfied"));

        let text = EscalateComplaintCaseTool::new(store)
            .execute(json!({"customer_id": "CUST001", "case_id": &case_id}))
            .await
            .unwrap()
            .as_text();
        assert_eq!(
            text,
            format!("Case {} is already CLOSED and cannot be escalated.", case_id)
        );
    }

    #[tokio::test]
    async fn test_escalate_without_case() {
        let store = store();
        let text = EscalateComplaintCaseTool::new(store.clone())
            .execute(json!({
                "customer_id": "CUST001",
                "case_id": "unknown",
                "reason": "ATM swallowed my card"
            }))
            .await
            .unwrap()
            .as_text();

        assert!(text.starts_with("🔴 Case CASE-"));
        assert!(text.contains("has been ESCALATED to a senior agent."));
        assert!(text.contains("• Reason:          ATM swallowed my card"));
        assert!(store
            .agents()
            .iter()
            .any(|a| text.contains(&format!("• Assigned Agent:  {}", a))));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_escalate_blank_or_missing_case_id_opens_case() {
        let store = store();
        let escalate = EscalateComplaintCaseTool::new(store.clone());

        for input in [
            json!({"customer_id": "CUST001", "case_id": "", "reason": "angry"}),
            json!({"customer_id": "CUST001", "case_id": "   "}),
            json!({"customer_id": "CUST001"}),
        ] {
            assert!(escalate.validate(&input).is_ok());
            let text = escalate.execute(input).await.unwrap().as_text();
            assert!(text.starts_with("🔴 Case CASE-"), "{}", text);
        }
        assert_eq!(store.len(), 3);

        let customer = bank_agent_core::CustomerId::parse("CUST001").unwrap();
        let cases = store.list_for_customer(&customer);
        assert!(cases.iter().any(|c| c.description == "angry"));
        assert!(cases.iter().any(|c| c.description == DEFAULT_ESCALATION_REASON));
    }

    #[tokio::test]
    async fn test_get_after_escalation_shows_reason() {
        let store = store();
        let case_id = create(&store, "CUST001").await;

        EscalateComplaintCaseTool::new(store.clone())
            .execute(json!({
                "customer_id": "CUST001",
                "case_id": &case_id,
                "reason": "No update in a week"
            }))
            .await
            .unwrap();

        let text = GetComplaintCaseTool::new(store)
            .execute(json!({"customer_id": "CUST001", "case_id": &case_id}))
            .await
            .unwrap()
            .as_text();
        assert!(text.contains("• Status:         ESCALATED"));
        assert!(text.ends_with("• Escalation Reason: No update in a week"));
    }

    #[tokio::test]
    async fn test_list_cases() {
        let store = store();
        let list = ListComplaintCasesTool::new(store.clone());

        let text = list
            .execute(json!({"customer_id": "CUST001"}))
            .await
            .unwrap()
            .as_text();
        assert_eq!(text, "No complaint cases found for your account.");

        let case_id = create(&store, "CUST001").await;
        create(&store, "CUST002").await;

        let text = list
            .execute(json!({"customer_id": "CUST001"}))
            .await
            .unwrap()
            .as_text();
        assert!(text.starts_with("📁 Your complaint cases:\n1. "));
        assert!(text.contains(&format!("{} | OPEN | CHEQUE NOT CREDITED", case_id)));
        assert_eq!(text.lines().count(), 2);
    }
}

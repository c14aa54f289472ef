//! End-to-end tool flows through the registry

use serde_json::json;
use std::sync::Arc;

use bank_agent_config::Settings;
use bank_agent_tools::{
    create_banking_registry, StubBankApi, ToolRegistry, ToolServices, OTP_VERIFIED_SUCCESS,
};

fn registry_with(api: StubBankApi) -> (ToolRegistry, Arc<StubBankApi>) {
    let api = Arc::new(api);
    let services = ToolServices::with_api(api.clone(), &Settings::default());
    (create_banking_registry(services), api)
}

fn otp_from(text: &str) -> String {
    text.split("**").nth(1).expect("code in reply").to_string()
}

#[tokio::test]
async fn card_unlock_after_otp() {
    let (registry, api) = registry_with(StubBankApi::new().with_otp(Some("246810"), None));

    let issued = registry
        .call("generate_otp", json!({"customer_id": "CUST001"}))
        .await
        .as_text();
    let code = otp_from(&issued);
    assert_eq!(code, "246810");

    let verified = registry
        .call(
            "verify_otp",
            json!({"customer_id": "CUST001", "submitted_otp": code}),
        )
        .await
        .as_text();
    assert!(verified.starts_with(OTP_VERIFIED_SUCCESS));

    let unlocked = registry
        .call(
            "unlock_atm_card",
            json!({"customer_id": "CUST001", "confirmed_otp_verified": true}),
        )
        .await;
    assert!(!unlocked.is_error);
    assert!(unlocked.as_text().contains("UNLOCKED"));

    assert_eq!(
        api.calls(),
        vec!["generate_otp:CARD_ACTION".to_string(), "unlock_card".to_string()]
    );
}

#[tokio::test]
async fn otp_is_scoped_to_customer() {
    let (registry, _) = registry_with(StubBankApi::new().with_otp(Some("135790"), None));

    registry
        .call("generate_otp", json!({"customer_id": "CUST001"}))
        .await;

    let other = registry
        .call(
            "verify_otp",
            json!({"customer_id": "CUST002", "submitted_otp": "135790"}),
        )
        .await
        .as_text();
    assert!(other.contains("No OTP found"));
}

#[tokio::test]
async fn escalation_of_unknown_case_is_listed() {
    let (registry, _) = registry_with(StubBankApi::new());

    let escalated = registry
        .call(
            "escalate_complaint_case",
            json!({"customer_id": "CUST001", "case_id": "CASE-0-ABCDE"}),
        )
        .await
        .as_text();
    let case_id = escalated
        .split_whitespace()
        .nth(2)
        .expect("case id in reply")
        .to_string();
    assert!(case_id.starts_with("CASE-"));
    assert!(escalated.contains("Customer not satisfied with initial resolution"));

    let listed = registry
        .call("list_complaint_cases", json!({"customer_id": "CUST001"}))
        .await
        .as_text();
    assert!(listed.contains(&format!("{} | ESCALATED | GENERAL COMPLAINT", case_id)));

    let fetched = registry
        .call(
            "get_complaint_case",
            json!({"customer_id": "CUST001", "case_id": &case_id}),
        )
        .await
        .as_text();
    assert!(fetched.contains("• Status:         ESCALATED"));
    assert!(fetched.contains("• Assigned Agent: "));
}

#[tokio::test]
async fn bank_outage_still_yields_text() {
    let (registry, _) = registry_with(StubBankApi::new().failing());

    for tool in ["get_account_balance", "get_recent_transactions", "get_account_details"] {
        let output = registry.call(tool, json!({"customer_id": "CUST001"})).await;
        assert!(!output.is_error, "{} flagged an outage as a tool error", tool);
        assert!(output.as_text().starts_with("Failed to retrieve"));
    }

    let otp = registry
        .call("generate_otp", json!({"customer_id": "CUST001"}))
        .await
        .as_text();
    assert_eq!(otp_from(&otp).len(), 6);
}

//! HttpBankApi against a local mock bank server

use axum::extract::{Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::time::Duration;

use bank_agent_config::BankApiConfig;
use bank_agent_core::CustomerId;
use bank_agent_tools::{BalanceAmount, BankApi, BankApiError, HttpBankApi};

const CUSTOMER: &str = "CUST001";

fn authorised(headers: &HeaderMap) -> bool {
    headers.get("x-customer-id").and_then(|v| v.to_str().ok()) == Some(CUSTOMER)
        && headers.get("content-type").and_then(|v| v.to_str().ok()) == Some("application/json")
}

async fn balance(headers: HeaderMap) -> impl IntoResponse {
    if !authorised(&headers) {
        return (StatusCode::UNAUTHORIZED, "unknown customer").into_response();
    }
    Json(json!({"success": true, "data": {"accountNumber": "XXXX0001", "availableBalance": 5000.75}}))
        .into_response()
}

async fn transactions(
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    if !authorised(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let limit: usize = params.get("limit").and_then(|l| l.parse().ok()).unwrap_or(0);
    let items: Vec<Value> = (0..limit)
        .map(|i| json!({"transactionId": format!("T{}", i), "type": "DEBIT", "amount": 10}))
        .collect();
    Json(json!({"data": {"transactions": items}})).into_response()
}

async fn account() -> Json<Value> {
    Json(json!({"accountNumber": "XXXX0001", "accountType": "Current", "status": "Dormant"}))
}

async fn cheque(Path(number): Path<String>) -> impl IntoResponse {
    if number == "123456" {
        Json(json!({"data": {"amount": 2500, "status": "CLEARED", "expectedClearanceDate": "2024-05-02"}}))
            .into_response()
    } else {
        (StatusCode::NOT_FOUND, r#"{"error":"not found"}"#).into_response()
    }
}

async fn generate_otp(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "data": {
            "otp": 777111,
            "expiresIn": "5 minutes",
            "purpose": body["purpose"]
        }
    }))
}

async fn transfer(Json(body): Json<Value>) -> StatusCode {
    if body == json!({"amount": 0, "action": "UNLOCK_CARD"}) {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    }
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(3)).await;
    Json(json!({"balance": 1}))
}

async fn spawn_bank(routes: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new().nest("/api/v1", routes);
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api/v1", addr)
}

fn mock_routes() -> Router {
    Router::new()
        .route("/balance", get(balance))
        .route("/transactions", get(transactions))
        .route("/account", get(account))
        .route("/cheque/:number", get(cheque))
        .route("/generate-otp", post(generate_otp))
        .route("/transfer", post(transfer))
}

fn client(base_url: String, timeout_secs: u64) -> HttpBankApi {
    HttpBankApi::new(&BankApiConfig {
        base_url,
        timeout_secs,
    })
    .unwrap()
}

fn customer() -> CustomerId {
    CustomerId::parse(CUSTOMER).unwrap()
}

#[tokio::test]
async fn test_balance_unwraps_envelope_and_sends_headers() {
    let api = client(spawn_bank(mock_routes()).await, 5);

    let balance = api.balance(&customer()).await.unwrap();
    assert_eq!(balance.amount, BalanceAmount::Numeric(5000.75));
    assert_eq!(balance.account_number.as_deref(), Some("XXXX0001"));

    let stranger = CustomerId::parse("SOMEONE").unwrap();
    let err = api.balance(&stranger).await.unwrap_err();
    assert_eq!(
        err,
        BankApiError::Status {
            status: 401,
            body: "unknown customer".to_string(),
        }
    );
}

#[tokio::test]
async fn test_transactions_forward_limit() {
    let api = client(spawn_bank(mock_routes()).await, 5);
    let txns = api.transactions(&customer(), 7).await.unwrap();
    assert_eq!(txns.len(), 7);
    assert_eq!(txns[0].transaction_id.as_deref(), Some("T0"));
    assert!(!txns[0].is_credit());
}

#[tokio::test]
async fn test_account_without_envelope() {
    let api = client(spawn_bank(mock_routes()).await, 5);
    let account = api.account(&customer()).await.unwrap();
    assert_eq!(account.status, "Dormant");
    assert!(!account.is_active());
}

#[tokio::test]
async fn test_cheque_found_and_missing() {
    let api = client(spawn_bank(mock_routes()).await, 5);

    let cheque = api.cheque(&customer(), "123456").await.unwrap();
    assert_eq!(cheque.status.as_deref(), Some("CLEARED"));
    assert_eq!(cheque.amount.as_deref(), Some("2500"));

    let err = api.cheque(&customer(), "000000").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_generate_otp_and_unlock() {
    let api = client(spawn_bank(mock_routes()).await, 5);

    let issued = api.generate_otp(&customer(), "CARD_ACTION").await.unwrap();
    assert_eq!(issued.code.as_deref(), Some("777111"));
    assert_eq!(issued.expires_in.as_deref(), Some("5 minutes"));

    assert!(api.unlock_card(&customer()).await.is_ok());
}

#[tokio::test]
async fn test_malformed_body() {
    let routes = Router::new().route("/balance", get(|| async { "definitely not json" }));
    let api = client(spawn_bank(routes).await, 5);

    assert!(matches!(
        api.balance(&customer()).await,
        Err(BankApiError::InvalidResponse(_))
    ));
}

#[tokio::test]
async fn test_timeout_is_network_error() {
    let routes = Router::new().route("/balance", get(slow));
    let api = client(spawn_bank(routes).await, 1);

    assert!(matches!(
        api.balance(&customer()).await,
        Err(BankApiError::Network(_))
    ));
}

#[tokio::test]
async fn test_unreachable_bank() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = client(format!("http://{}/api/v1", addr), 2);
    assert!(matches!(
        api.account(&customer()).await,
        Err(BankApiError::Network(_))
    ));
}

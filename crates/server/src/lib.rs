//! Banking Agent Server
//!
//! Exposes the banking tools over HTTP for the orchestrating agent.

pub mod http;
pub mod state;

pub use http::create_router;
pub use state::AppState;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bank API client error: {0}")]
    BankApi(#[from] bank_agent_tools::BankApiError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<&ServerError> for StatusCode {
    fn from(err: &ServerError) -> Self {
        match err {
            ServerError::ToolNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Config(_) | ServerError::BankApi(_) | ServerError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = StatusCode::from(&self);
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

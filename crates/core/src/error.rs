//! Error types shared across crates

use thiserror::Error;

use crate::traits::ToolError;

/// Crate-wide error
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for ToolError {
    fn from(err: Error) -> Self {
        match err {
            Error::InvalidInput(msg) => ToolError::invalid_params(msg),
            Error::Tool(e) => e,
        }
    }
}

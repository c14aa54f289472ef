//! Core traits and types for the banking agent tools
//!
//! This crate provides foundational types used across all other crates:
//! - The MCP-compatible `Tool` trait and its schema/output types
//! - Customer identity
//! - Error types

pub mod customer;
pub mod error;
pub mod traits;

pub use customer::CustomerId;
pub use error::{Error, Result};

pub use traits::{
    validate_property, ContentBlock, ErrorCode, InputSchema, PropertySchema, Tool, ToolError,
    ToolInput, ToolOutput, ToolSchema, DEFAULT_TOOL_TIMEOUT_SECS,
};

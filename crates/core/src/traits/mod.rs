//! Core traits for the banking tool system
//!
//! ```text
//! Tools:
//!   - Tool: MCP-compatible tool interface
//! ```

mod tool;

pub use tool::{
    validate_property, ContentBlock, ErrorCode, InputSchema, PropertySchema, Tool, ToolError,
    ToolInput, ToolOutput, ToolSchema, DEFAULT_TOOL_TIMEOUT_SECS,
};

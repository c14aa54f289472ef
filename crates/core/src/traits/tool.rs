//! MCP-compatible tool interface
//!
//! Tools are the only surface the orchestrating agent sees. Every tool takes a
//! JSON object of arguments and answers with content blocks; banking tools
//! always answer with a single text block.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Default timeout for tool execution
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 30;

/// Raw tool input (JSON object of arguments)
pub type ToolInput = Value;

/// Tool schema advertised to the orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub input_schema: InputSchema,
}

/// JSON-schema style description of a tool's arguments
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    #[serde(default)]
    pub properties: HashMap<String, PropertySchema>,
    #[serde(default)]
    pub required: Vec<String>,
}

impl InputSchema {
    /// Empty object schema
    pub fn object() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: HashMap::new(),
            required: Vec::new(),
        }
    }

    /// Add a property
    pub fn property(mut self, name: &str, schema: PropertySchema, required: bool) -> Self {
        self.properties.insert(name.to_string(), schema);
        if required {
            self.required.push(name.to_string());
        }
        self
    }
}

/// Schema for one argument
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub prop_type: String,
    pub description: String,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
}

impl PropertySchema {
    fn typed(prop_type: &str, description: &str) -> Self {
        Self {
            prop_type: prop_type.to_string(),
            description: description.to_string(),
            enum_values: None,
            default: None,
            minimum: None,
            maximum: None,
        }
    }

    pub fn string(description: &str) -> Self {
        Self::typed("string", description)
    }

    pub fn integer(description: &str) -> Self {
        Self::typed("integer", description)
    }

    pub fn boolean(description: &str) -> Self {
        Self::typed("boolean", description)
    }

    /// String restricted to a fixed set of values
    pub fn enum_type(description: &str, values: Vec<String>) -> Self {
        Self {
            enum_values: Some(values),
            ..Self::typed("string", description)
        }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_range(mut self, minimum: f64, maximum: f64) -> Self {
        self.minimum = Some(minimum);
        self.maximum = Some(maximum);
        self
    }
}

/// Content block returned by a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
}

/// Tool execution output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    pub content: Vec<ContentBlock>,
    #[serde(default)]
    pub is_error: bool,
}

impl ToolOutput {
    /// Successful text output
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
            is_error: false,
        }
    }

    /// Text output flagged as an error
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
            is_error: true,
        }
    }

    /// Concatenated text of all blocks
    pub fn as_text(&self) -> String {
        self.content
            .iter()
            .map(|block| match block {
                ContentBlock::Text { text } => text.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// JSON-RPC style error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    InvalidParams,
    MethodNotFound,
    Timeout,
}

impl ErrorCode {
    pub fn code(&self) -> i32 {
        match self {
            Self::InvalidParams => -32602,
            Self::MethodNotFound => -32601,
            Self::Timeout => -32000,
        }
    }
}

/// Tool execution error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct ToolError {
    pub code: ErrorCode,
    pub message: String,
}

impl ToolError {
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::InvalidParams,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::MethodNotFound,
            message: message.into(),
        }
    }

    pub fn timeout(tool: &str, secs: u64) -> Self {
        Self {
            code: ErrorCode::Timeout,
            message: format!("Tool '{}' timed out after {}s", tool, secs),
        }
    }
}

/// Check one argument against its property schema
pub fn validate_property(name: &str, schema: &PropertySchema, value: &Value) -> Result<(), ToolError> {
    if value.is_null() {
        return Ok(());
    }

    let type_ok = match schema.prop_type.as_str() {
        "string" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        _ => true,
    };
    if !type_ok {
        return Err(ToolError::invalid_params(format!(
            "{} must be of type {}",
            name, schema.prop_type
        )));
    }

    if let (Some(allowed), Some(s)) = (&schema.enum_values, value.as_str()) {
        if !allowed.iter().any(|a| a.eq_ignore_ascii_case(s)) {
            return Err(ToolError::invalid_params(format!(
                "{} must be one of: {}",
                name,
                allowed.join(", ")
            )));
        }
    }

    Ok(())
}

/// MCP-compatible tool
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique tool name
    fn name(&self) -> &str;

    /// Human readable description for the orchestrator
    fn description(&self) -> &str;

    /// Argument schema
    fn schema(&self) -> ToolSchema;

    /// Validate arguments before execution.
    ///
    /// The default checks that every required property is present and that
    /// present properties match their declared type.
    fn validate(&self, input: &Value) -> Result<(), ToolError> {
        let schema = self.schema().input_schema;
        let object = input
            .as_object()
            .ok_or_else(|| ToolError::invalid_params("arguments must be a JSON object"))?;

        for name in &schema.required {
            match object.get(name) {
                Some(v) if !v.is_null() => {},
                _ => return Err(ToolError::invalid_params(format!("{} is required", name))),
            }
        }

        for (name, value) in object {
            if let Some(prop) = schema.properties.get(name) {
                validate_property(name, prop, value)?;
            }
        }

        Ok(())
    }

    /// Execute the tool
    async fn execute(&self, input: Value) -> Result<ToolOutput, ToolError>;

    /// Execution timeout
    fn timeout_secs(&self) -> u64 {
        DEFAULT_TOOL_TIMEOUT_SECS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echo the message back"
        }

        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: self.name().to_string(),
                description: self.description().to_string(),
                input_schema: InputSchema::object()
                    .property("message", PropertySchema::string("Message"), true)
                    .property("times", PropertySchema::integer("Repeat count"), false)
                    .property(
                        "tone",
                        PropertySchema::enum_type("Tone", vec!["calm".into(), "loud".into()]),
                        false,
                    ),
            }
        }

        async fn execute(&self, input: Value) -> Result<ToolOutput, ToolError> {
            let message = input.get("message").and_then(|v| v.as_str()).unwrap_or_default();
            Ok(ToolOutput::text(message))
        }
    }

    #[test]
    fn test_validate_requires_properties() {
        let tool = EchoTool;
        assert!(tool.validate(&json!({"message": "hi"})).is_ok());

        let err = tool.validate(&json!({})).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidParams);
        assert!(err.message.contains("message"));

        assert!(tool.validate(&json!({"message": null})).is_err());
        assert!(tool.validate(&json!("not an object")).is_err());
    }

    #[test]
    fn test_validate_checks_types_and_enums() {
        let tool = EchoTool;
        assert!(tool.validate(&json!({"message": "hi", "times": "two"})).is_err());
        assert!(tool.validate(&json!({"message": "hi", "times": 2})).is_ok());
        assert!(tool.validate(&json!({"message": "hi", "tone": "LOUD"})).is_ok());
        assert!(tool.validate(&json!({"message": "hi", "tone": "angry"})).is_err());
    }

    #[tokio::test]
    async fn test_execute_text_output() {
        let output = EchoTool.execute(json!({"message": "hello"})).await.unwrap();
        assert!(!output.is_error);
        assert_eq!(output.as_text(), "hello");
    }

    #[test]
    fn test_schema_serializes_like_json_schema() {
        let schema = EchoTool.schema();
        let value = serde_json::to_value(&schema.input_schema).unwrap();
        assert_eq!(value["type"], "object");
        assert_eq!(value["properties"]["tone"]["enum"], json!(["calm", "loud"]));
        assert_eq!(value["required"], json!(["message"]));
    }

    #[test]
    fn test_timeout_error_message() {
        let err = ToolError::timeout("get_account_balance", 15);
        assert_eq!(err.code, ErrorCode::Timeout);
        assert_eq!(err.to_string(), "Tool 'get_account_balance' timed out after 15s");
    }
}

//! Shared helpers for banking tools: argument extraction and text formatting.

use serde_json::Value;

use bank_agent_config::constants::transactions::{MAX_LIMIT, MIN_LIMIT};
use bank_agent_core::{CustomerId, PropertySchema, ToolError};

use crate::bank_api::BankApiError;

/// Schema of the `customer_id` argument every banking tool takes
pub fn customer_id_property() -> PropertySchema {
    PropertySchema::string("The unique customer identifier from the authenticated session")
}

/// Extract and parse `customer_id`
pub fn customer_id(input: &Value) -> Result<CustomerId, ToolError> {
    let raw = required_str(input, "customer_id")?;
    CustomerId::parse(raw).map_err(ToolError::from)
}

/// Required, non-blank string argument
pub fn required_str<'a>(input: &'a Value, name: &str) -> Result<&'a str, ToolError> {
    input
        .get(name)
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ToolError::invalid_params(format!("{} is required", name)))
}

/// Optional string argument; blank counts as absent
pub fn optional_str<'a>(input: &'a Value, name: &str) -> Option<&'a str> {
    input
        .get(name)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Clamp a requested transaction count into the supported range
pub fn clamp_limit(requested: i64) -> u32 {
    requested.clamp(MIN_LIMIT as i64, MAX_LIMIT as i64) as u32
}

/// Insert thousands separators into a run of digits
fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn group_decimal(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    match unsigned.split_once('.') {
        Some((int, frac)) => format!("{}{}.{}", sign, group_digits(int), frac),
        None => format!("{}{}", sign, group_digits(unsigned)),
    }
}

/// Grouped with exactly two decimals, e.g. `125,000.50`
pub fn format_currency(amount: f64) -> String {
    group_decimal(&format!("{:.2}", amount))
}

/// Grouped without padding decimals, e.g. `1,500` or `1,500.5`
pub fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        return group_decimal(&format!("{:.0}", amount));
    }
    let fixed = format!("{:.2}", amount);
    group_decimal(fixed.trim_end_matches('0').trim_end_matches('.'))
}

/// Render a remote failure for `what` ("balance", "transactions", ...)
///
/// HTTP errors read `Error retrieving <what>: <status>` (with the body when
/// `with_body` is set); transport and decoding errors read
/// `Failed to retrieve <what>: <cause>`.
pub fn describe_failure(what: &str, err: &BankApiError, with_body: bool) -> String {
    tracing::warn!(lookup = what, error = %err, "Bank API lookup failed");

    match err {
        BankApiError::Status { status, body } if with_body => {
            format!("Error retrieving {}: {} – {}", what, status, body)
        },
        BankApiError::Status { status, .. } => format!("Error retrieving {}: {}", what, status),
        BankApiError::Network(cause) | BankApiError::InvalidResponse(cause) => {
            format!("Failed to retrieve {}: {}", what, cause)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(50), 20);
        assert_eq!(clamp_limit(0), 1);
        assert_eq!(clamp_limit(-3), 1);
        assert_eq!(clamp_limit(7), 7);
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(125000.5), "125,000.50");
        assert_eq!(format_currency(999.0), "999.00");
        assert_eq!(format_currency(1234567.891), "1,234,567.89");
        assert_eq!(format_currency(-2500.0), "-2,500.00");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(1500.0), "1,500");
        assert_eq!(format_amount(1500.5), "1,500.5");
        assert_eq!(format_amount(42.25), "42.25");
        assert_eq!(format_amount(0.0), "0");
    }

    #[test]
    fn test_argument_helpers() {
        let input = json!({"customer_id": " CUST001 ", "note": "  ", "n": 3});
        assert_eq!(customer_id(&input).unwrap().as_str(), "CUST001");
        assert!(required_str(&input, "note").is_err());
        assert!(required_str(&input, "n").is_err());
        assert_eq!(optional_str(&input, "note"), None);
        assert!(customer_id(&json!({})).is_err());
    }

    #[test]
    fn test_describe_failure() {
        let status = BankApiError::Status {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(
            describe_failure("balance", &status, true),
            "Error retrieving balance: 500 – boom"
        );
        assert_eq!(
            describe_failure("account details", &status, false),
            "Error retrieving account details: 500"
        );
        assert_eq!(
            describe_failure("transactions", &BankApiError::Network("timed out".into()), false),
            "Failed to retrieve transactions: timed out"
        );
    }
}

//! Formatting for command-line results.
//!
//! Pure functions: (data, OutputFormat) -> String.
//! No I/O, no side effects.

use serde_json::json;

use crate::config::{mask_secret, Credentials};
use crate::types::{OutputFormat, SendReceipt};

/// Format a credit balance.
pub fn format_credit(credit: f64, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => format!("💰 Current Credit: {:.2} SMS\n", credit),
        OutputFormat::Json => to_json(&json!({ "credit": credit })),
    }
}

/// Format the account's sending lines.
pub fn format_lines(lines: &[i64], format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => {
            if lines.is_empty() {
                return "📞 No lines found\n".to_string();
            }
            let mut out = String::from("📞 Available Lines:\n");
            for (i, line) in lines.iter().enumerate() {
                out.push_str(&format!("  {}. {}\n", i + 1, line));
            }
            out
        }
        OutputFormat::Json => to_json(&json!({ "lines": lines })),
    }
}

/// Format the receipt of a successful bulk send.
pub fn format_receipt(receipt: &SendReceipt, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => {
            let mut out = String::from("✅ SMS sent successfully!\n");
            out.push_str(&format!("📦 Pack ID: {}\n", receipt.pack_id));
            out.push_str(&format!("💰 Cost: {:.2} SMS\n", receipt.cost));
            out.push_str(&format!("📱 Message IDs: {:?}\n", receipt.message_ids));
            out.push_str(&format!("📊 Total messages: {}\n", receipt.message_ids.len()));
            out
        }
        OutputFormat::Json => to_json(receipt),
    }
}

/// Format stored credentials with the API key masked.
pub fn format_credentials(credentials: &Credentials, format: OutputFormat) -> String {
    let masked = mask_secret(&credentials.api_key);
    match format {
        OutputFormat::Human => format!(
            "API Key: {}\nLine Number: {}\nBase URL: {}\n",
            masked, credentials.line_number, credentials.base_url
        ),
        OutputFormat::Json => to_json(&json!({
            "api_key": masked,
            "line_number": credentials.line_number,
            "base_url": credentials.base_url,
        })),
    }
}

// ============================================================================
// JSON FORMAT
// ============================================================================

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    // Only plain maps and numbers reach here; serialization cannot fail
    // for them, but fall back to an empty object rather than panic.
    let mut out = serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string());
    out.push('\n');
    out
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn receipt() -> SendReceipt {
        SendReceipt {
            pack_id: "pack-1".into(),
            message_ids: vec![7, 8, 9],
            cost: 3.0,
        }
    }

    #[test]
    fn credit_human_has_two_decimals() {
        assert_eq!(
            format_credit(12.5, OutputFormat::Human),
            "💰 Current Credit: 12.50 SMS\n"
        );
    }

    #[test]
    fn credit_json_is_parseable() {
        let out = format_credit(12.5, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["credit"], 12.5);
    }

    #[test]
    fn lines_human_numbers_each_entry() {
        let out = format_lines(&[3000, 5000], OutputFormat::Human);
        assert!(out.contains("1. 3000"));
        assert!(out.contains("2. 5000"));
    }

    #[test]
    fn lines_human_empty_says_so() {
        assert!(format_lines(&[], OutputFormat::Human).contains("No lines found"));
    }

    #[test]
    fn receipt_human_shows_pack_and_count() {
        let out = format_receipt(&receipt(), OutputFormat::Human);
        assert!(out.contains("Pack ID: pack-1"));
        assert!(out.contains("Cost: 3.00 SMS"));
        assert!(out.contains("Total messages: 3"));
    }

    #[test]
    fn receipt_json_uses_service_field_names() {
        let out = format_receipt(&receipt(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["packId"], "pack-1");
        assert_eq!(value["messageIds"][2], 9);
    }

    #[test]
    fn credentials_never_print_raw_key() {
        let creds = Credentials {
            api_key: "abcdefghijklmnop".into(),
            line_number: "3000".into(),
            ..Default::default()
        };
        for format in [OutputFormat::Human, OutputFormat::Json] {
            let out = format_credentials(&creds, format);
            assert!(!out.contains("abcdefghijklmnop"));
            assert!(out.contains("abcd****mnop"));
        }
    }
}

//! Domain and wire types for the SMS.ir API.
//!
//! Shapes follow the JSON the service speaks. Everything here is plain
//! data; the HTTP plumbing lives in [`crate::api`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// RESPONSE ENVELOPE
// ============================================================================

/// Envelope every SMS.ir endpoint wraps its payload in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    /// 1 on success, 0 on failure, anything else is unknown.
    pub status: i32,
    /// Human-readable message from the service.
    #[serde(default)]
    pub message: String,
    /// Endpoint-specific payload. Failed calls usually send `null`.
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// Whether the service reported success.
    pub fn is_success(&self) -> bool {
        self.status == 1
    }

    /// Short label for the status code.
    pub fn status_message(&self) -> String {
        match self.status {
            0 => "Failed".to_string(),
            1 => "Success".to_string(),
            other => format!("Unknown status: {}", other),
        }
    }
}

// ============================================================================
// REQUESTS
// ============================================================================

/// Body of `POST /send/bulk`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkSendRequest {
    /// Sending line.
    pub line_number: i64,
    /// Message body.
    pub message_text: String,
    /// Recipient mobile numbers, in the order given.
    pub mobiles: Vec<String>,
    /// Optional Unix timestamp for scheduled delivery.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_date_time: Option<i64>,
}

impl BulkSendRequest {
    /// An immediate (unscheduled) send.
    pub fn new(line_number: i64, message_text: impl Into<String>, mobiles: Vec<String>) -> Self {
        Self {
            line_number,
            message_text: message_text.into(),
            mobiles,
            send_date_time: None,
        }
    }
}

/// Why a sending line could not be determined.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("line number is required")]
    Missing,

    #[error("invalid line number: {0}")]
    Invalid(String),
}

/// Split a comma-separated recipient list, trimming each entry.
///
/// Entries are kept in order and empty entries are not dropped; the
/// service reports those itself.
pub fn split_mobiles(raw: &str) -> Vec<String> {
    raw.split(',').map(|m| m.trim().to_string()).collect()
}

/// Parse the typed line number, falling back to the configured default
/// when nothing was typed.
pub fn resolve_line(typed: &str, fallback: &str) -> Result<i64, LineError> {
    let chosen = if typed.trim().is_empty() { fallback } else { typed };
    let chosen = chosen.trim();
    if chosen.is_empty() {
        return Err(LineError::Missing);
    }
    chosen
        .parse::<i64>()
        .map_err(|_| LineError::Invalid(chosen.to_string()))
}

// ============================================================================
// PAYLOADS
// ============================================================================

/// Payload returned by a successful bulk send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendReceipt {
    /// Identifier of the whole batch.
    pub pack_id: String,
    /// One id per queued message.
    #[serde(default)]
    pub message_ids: Vec<i64>,
    /// Charged credit.
    pub cost: f64,
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Output format for command-line results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable pretty output.
    #[default]
    Human,
    /// Machine-readable JSON.
    Json,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_one_is_success() {
        let resp: ApiResponse<f64> =
            serde_json::from_str(r#"{"status":1,"message":"ok","data":12.5}"#).unwrap();
        assert!(resp.is_success());
        assert_eq!(resp.data, Some(12.5));
        assert_eq!(resp.status_message(), "Success");
    }

    #[test]
    fn unknown_status_is_labelled() {
        let resp: ApiResponse<Vec<i64>> =
            serde_json::from_str(r#"{"status":7,"data":[]}"#).unwrap();
        assert!(!resp.is_success());
        assert_eq!(resp.status_message(), "Unknown status: 7");
        assert!(resp.message.is_empty());
    }

    #[test]
    fn null_payload_decodes_as_none() {
        let resp: ApiResponse<f64> =
            serde_json::from_str(r#"{"status":0,"message":"invalid key","data":null}"#).unwrap();
        assert!(!resp.is_success());
        assert_eq!(resp.data, None);
    }

    #[test]
    fn bulk_request_uses_camel_case_and_omits_schedule() {
        let req = BulkSendRequest::new(3000, "hi", vec!["0912".into()]);
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["lineNumber"], 3000);
        assert_eq!(json["messageText"], "hi");
        assert_eq!(json["mobiles"][0], "0912");
        assert!(json.get("sendDateTime").is_none());
    }

    #[test]
    fn mobiles_are_split_and_trimmed() {
        assert_eq!(split_mobiles(" 0912,0913 ,0914"), vec!["0912", "0913", "0914"]);
    }

    #[test]
    fn single_mobile_is_one_entry() {
        assert_eq!(split_mobiles("09120000000"), vec!["09120000000"]);
    }

    #[test]
    fn typed_line_wins_over_default() {
        assert_eq!(resolve_line("5000", "3000"), Ok(5000));
    }

    #[test]
    fn empty_line_falls_back_to_default() {
        assert_eq!(resolve_line("", "3000"), Ok(3000));
    }

    #[test]
    fn no_line_anywhere_is_missing() {
        assert_eq!(resolve_line("", ""), Err(LineError::Missing));
    }

    #[test]
    fn non_numeric_line_is_invalid() {
        assert_eq!(resolve_line("30a0", ""), Err(LineError::Invalid("30a0".into())));
    }

    #[test]
    fn receipt_decodes_from_service_json() {
        let receipt: SendReceipt = serde_json::from_str(
            r#"{"packId":"abc-123","messageIds":[11,12],"cost":2.0}"#,
        )
        .unwrap();
        assert_eq!(receipt.pack_id, "abc-123");
        assert_eq!(receipt.message_ids, vec![11, 12]);
    }
}

//! Formatting of the request and response payloads for display.
//!
//! The log service stores the payloads as text. Most of them are json documents,
//! which are shown indented. Everything else is shown exactly as it was stored.
//!
use serde_json::Value;

/// Shown instead of a payload that is absent or empty.
pub const PAYLOAD_PLACEHOLDER: &str = "-";

/// Pretty print `raw` with 2-space indentation if it is json, otherwise return it unchanged.
/// This never fails.
pub fn format_payload(
    raw: &str,
) -> String
{
    serde_json::from_str::<Value>(raw)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| raw.to_string())
}

/// The text of a payload table cell.
pub fn payload_cell(
    payload: Option<&str>,
) -> String
{
    match payload {
        Some(raw) if !raw.is_empty() => format_payload(raw),
        _ => PAYLOAD_PLACEHOLDER.to_string(),
    }
}

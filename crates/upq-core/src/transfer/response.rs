//! Classify an upload response into success or a `TransferError`.

use super::error::TransferError;

/// Turn the final status code and body of an upload into an outcome.
pub fn classify_response(status: u32, body: &[u8]) -> Result<(), TransferError> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    Err(TransferError::Http {
        status,
        message: error_message_from_body(status, body),
    })
}

/// Server-supplied `detail` or `message` string from a JSON error body,
/// else `"HTTP <status>"`.
pub fn error_message_from_body(status: u32, body: &[u8]) -> String {
    let parsed = serde_json::from_slice::<serde_json::Value>(body).ok();
    parsed
        .as_ref()
        .and_then(|v| field_str(v, "detail").or_else(|| field_str(v, "message")))
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", status))
}

fn field_str<'a>(v: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    v.get(key)
        .and_then(serde_json::Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

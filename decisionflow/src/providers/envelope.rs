//! Extraction of generated text from a messages-style response body.
//!
//! Both the proxy and the provider answer with `{ "content": [ { "text": .. } ] }`;
//! only `content[0].text` is consumed.

use serde::Deserialize;

use crate::errors::{FormatError, StageError, TransportError};

#[derive(Debug, Deserialize)]
struct MessageEnvelope {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

/// Pulls `content[0].text` out of a decoded response.
///
/// # Errors
///
/// Returns `FormatError` when the path is absent, not a string, or empty.
pub fn extract_text(body: &serde_json::Value) -> Result<String, FormatError> {
    let envelope = MessageEnvelope::deserialize(body)
        .map_err(|e| FormatError::for_field("content", format!("Invalid API response format: {e}")))?;

    envelope
        .content
        .into_iter()
        .next()
        .and_then(|block| block.text)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| FormatError::for_field("content[0].text", "Invalid API response format"))
}

/// Decodes a raw success body and extracts its text.
///
/// A body that is not JSON at all counts as a transport failure with status
/// 0; a JSON body without the text path is a format failure.
///
/// # Errors
///
/// See above.
pub fn parse_envelope(raw: &str) -> Result<String, StageError> {
    let value: serde_json::Value = serde_json::from_str(raw)
        .map_err(|e| TransportError::network(format!("malformed response body: {e}")))?;
    Ok(extract_text(&value)?)
}

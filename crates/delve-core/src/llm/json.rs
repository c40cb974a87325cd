//! Helpers for coaxing structured JSON out of chat model replies.
//!
//! Models asked for "pure JSON" still wrap their answer in markdown fences
//! or prose often enough that every structured call goes through here.

use serde::de::DeserializeOwned;

/// Strips a surrounding markdown code fence, if present.
///
/// Handles both plain ``` fences and language-tagged ones like ```json.
pub fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    if trimmed.starts_with("```") {
        if let Some(start) = trimmed.find('\n') {
            let rest = &trimmed[start + 1..];
            if let Some(end) = rest.rfind("```") {
                return rest[..end].trim();
            }
        }
    }

    trimmed
}

/// Slices to the outermost JSON object or array delimiters.
///
/// Used as a fallback when the model wrapped its JSON in prose.
pub fn slice_to_json(text: &str) -> &str {
    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            return &text[start..=end];
        }
    }

    if let (Some(start), Some(end)) = (text.find('['), text.rfind(']')) {
        if start < end {
            return &text[start..=end];
        }
    }

    text
}

/// Parses a model reply into `T`, tolerating fences and surrounding prose.
///
/// On failure, returns the error from the first, stricter attempt.
pub fn parse_json_response<T: DeserializeOwned>(response: &str) -> Result<T, serde_json::Error> {
    let cleaned = extract_json(response);

    match serde_json::from_str(cleaned) {
        Ok(value) => Ok(value),
        Err(err) => serde_json::from_str(slice_to_json(cleaned)).map_err(|_| err),
    }
}

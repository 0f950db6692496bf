//! Structured-span extraction from free text
//!
//! Generated text often wraps a JSON object in prose or markdown fences. This
//! module finds the first balanced top-level `{ ... }` span and parses it.
//! Braces inside string literals (and escaped quotes) do not count towards
//! nesting.

use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpanError {
    #[error("no balanced JSON object found in text")]
    NoObjectFound,

    #[error("invalid JSON object: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Locate the first balanced `{ ... }` span in `text`
///
/// Returns `None` when there is no opening brace or the first object never
/// closes.
pub fn find_object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Find the first balanced object span and deserialize it
pub fn extract_json_object<T: DeserializeOwned>(text: &str) -> Result<T, SpanError> {
    let span = find_object_span(text).ok_or(SpanError::NoObjectFound)?;
    Ok(serde_json::from_str(span)?)
}

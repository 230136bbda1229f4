//! Cleanup of raw model output into a bare query string.

use serde::Deserialize;

pub const THINK_START: &str = "<think>";
pub const THINK_END: &str = "</think>";

/// Remove every `<think>...</think>` block. An unterminated block swallows
/// the rest of the text: the model ran out of tokens mid-reasoning.
pub fn strip_reasoning(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find(THINK_START) {
        out.push_str(&rest[..start]);
        let after_start = &rest[start + THINK_START.len()..];
        match after_start.find(THINK_END) {
            Some(end) => rest = &after_start[end + THINK_END.len()..],
            None => {
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out.trim().to_string()
}

fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence line
    let inner = match inner.find('\n') {
        Some(nl) if !inner[..nl].contains(' ') => &inner[nl + 1..],
        _ => inner,
    };
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

#[derive(Deserialize)]
struct QueryPayload {
    query: Option<String>,
}

/// Turn raw model output into a query: strip reasoning and fences, then try
/// the embedded JSON object's `query` field, falling back to the text itself.
pub fn extract_query(content: &str) -> String {
    let stripped = strip_reasoning(content);
    let text = strip_code_fence(&stripped);

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            match serde_json::from_str::<QueryPayload>(&text[start..=end]) {
                Ok(QueryPayload { query: Some(q) }) if !q.trim().is_empty() => {
                    return q.trim().to_string();
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!("Model output is not a JSON query payload: {e}");
                }
            }
        }
    }

    text.to_string()
}

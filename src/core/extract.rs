use serde_json::Value;
use thiserror::Error;

/// Errors turning model output into a JSON payload
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("model output contains no JSON array or object")]
    NoJsonSpan,

    #[error("model output JSON is malformed: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("model output has unexpected shape: {0}")]
    UnexpectedShape(String),
}

/// Locate the first balanced top-level JSON array or object in free text
///
/// Models often wrap their answer in prose or markdown fences. A single pass
/// keeps a stack of open `[` / `{` brackets and ignores brackets inside
/// string literals while a candidate is open. A closer of the wrong kind
/// abandons every open candidate; text that ends with candidates still open
/// (truncated output) abandons them too. Of the spans that do close, the one
/// starting earliest is returned.
///
/// Returns `None` when nothing balances.
///
/// The first balanced span wins even if it is prose such as `see [1]`; the
/// caller's parse or shape check then rejects it. Runs in linear time.
pub fn extract_json_span(text: &str) -> Option<&str> {
    // (byte offset of opener, expected closer)
    let mut open: Vec<(usize, char)> = Vec::new();
    let mut best: Option<(usize, usize)> = None;
    let mut in_string = false;
    let mut escaped = false;

    for (pos, c) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' if !open.is_empty() => in_string = true,
            '[' => open.push((pos, ']')),
            '{' => open.push((pos, '}')),
            ']' | '}' => match open.last() {
                Some(&(start, expected)) if expected == c => {
                    open.pop();
                    let end = pos + c.len_utf8();
                    if best.map_or(true, |(s, _)| start < s) {
                        best = Some((start, end));
                    }
                    if open.is_empty() {
                        break;
                    }
                }
                Some(_) => {
                    // Every open candidate sees the same wrong closer
                    open.clear();
                    if best.is_some() {
                        break;
                    }
                }
                None => {}
            },
            _ => {}
        }
    }

    best.map(|(start, end)| &text[start..end])
}

/// Extract the JSON span from model output and parse exactly that span
pub fn parse_payload(text: &str) -> Result<Value, ExtractionError> {
    let span = extract_json_span(text).ok_or(ExtractionError::NoJsonSpan)?;
    Ok(serde_json::from_str(span)?)
}

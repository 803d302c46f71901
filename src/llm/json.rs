//! Extraction of a JSON object from free-form model output.
//!
//! Grammar, tried in order:
//!
//! 1. A fenced block (```` ```json ```` or an untagged ```` ``` ````) whose body
//!    starts with `{`. The body is the candidate.
//! 2. The first top-level brace-delimited span that parses as JSON. Spans are
//!    found with a balanced-brace scanner that ignores braces inside string
//!    literals.
//!
//! Anything else is rejected with [`LlmError::NoJson`].

use crate::error::LlmError;
use crate::utils::text::truncate_with_ellipsis;
use serde_json::{Map, Value};

const FENCE: &str = "```";
const PREVIEW_CHARS: usize = 200;

/// Extract and parse the JSON object carried by `text`.
pub fn extract_json_object(text: &str) -> Result<Map<String, Value>, LlmError> {
    if let Some(body) = fenced_block(text) {
        return parse_object(body, text);
    }

    let mut first_error = None;
    for span in brace_spans(text) {
        match parse_object(span, text) {
            Ok(map) => return Ok(map),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    Err(first_error.unwrap_or_else(|| LlmError::NoJson {
        preview: preview(text),
    }))
}

fn preview(text: &str) -> String {
    truncate_with_ellipsis(text.trim(), PREVIEW_CHARS)
}

fn parse_object(candidate: &str, original: &str) -> Result<Map<String, Value>, LlmError> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(LlmError::InvalidJson {
            message: format!("expected an object, found {other}"),
            preview: preview(original),
        }),
        Err(e) => Err(LlmError::InvalidJson {
            message: e.to_string(),
            preview: preview(original),
        }),
    }
}

/// Body of the first ```` ```json ```` or untagged fence that holds an object.
/// Fences count only at the start of a line; a fence closed on its own line
/// is inline code.
fn fenced_block(text: &str) -> Option<&str> {
    let mut pos = 0;
    while let Some(rel) = text[pos..].find(FENCE) {
        let open = pos + rel;
        let after_open = open + FENCE.len();
        if !at_line_start(text, open) {
            pos = after_open;
            continue;
        }

        let line_end = text[after_open..]
            .find('\n')
            .map_or(text.len(), |n| after_open + n);
        if let Some(inline_close) = text[after_open..line_end].find(FENCE) {
            pos = after_open + inline_close + FENCE.len();
            continue;
        }
        if line_end == text.len() {
            break;
        }

        let tag = text[after_open..line_end].trim();
        let body_start = line_end + 1;
        let Some(close) = text[body_start..].find(FENCE) else {
            break;
        };
        let body = text[body_start..body_start + close].trim();

        if (tag.is_empty() || tag.eq_ignore_ascii_case("json")) && body.starts_with('{') {
            return Some(body);
        }
        pos = body_start + close + FENCE.len();
    }
    None
}

fn at_line_start(text: &str, at: usize) -> bool {
    let before = text[..at].trim_end_matches([' ', '\t']);
    before.is_empty() || before.ends_with('\n')
}

/// Every balanced top-level `{...}` span in `text`, in order of appearance.
fn brace_spans(text: &str) -> Vec<&str> {
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in text.char_indices() {
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
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    spans.push(&text[start..=i]);
                }
            }
            _ => {}
        }
    }
    spans
}

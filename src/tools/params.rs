//! Lenient readers for plan-step parameters. Models frequently emit numbers
//! as strings and vice versa, so each reader accepts both spellings.

use serde_json::{Map, Value};

/// Non-empty string parameter; numbers and booleans are stringified.
pub fn string_param(params: &Map<String, Value>, key: &str) -> Option<String> {
    match params.get(key)? {
        Value::String(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// First non-empty string among `keys`.
pub fn first_string_param(params: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| string_param(params, key))
}

/// Unsigned integer parameter; numeric strings and whole floats are accepted.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn u32_param(params: &Map<String, Value>, key: &str) -> Option<u32> {
    match params.get(key)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
            .and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

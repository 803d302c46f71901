use std::borrow::Cow;

const MAX_API_ERROR_CHARS: usize = 200;

const PREFIX_PATTERNS: [&str; 8] = [
    "sk-", "gsk_", "ghp_", "gho_", "ghs_", "github_pat_", "xai-", "eyJ",
];

const MARKER_PATTERNS: [&str; 7] = [
    "Authorization: Bearer ",
    "authorization: bearer ",
    "Authorization: token ",
    "api_key=",
    "key=",
    "\"api_key\":\"",
    "\"token\":\"",
];

fn is_secret_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':' | '+' | '/' | '=')
}

fn token_end(input: &str, from: usize) -> usize {
    let mut end = from;
    for (i, c) in input[from..].char_indices() {
        if is_secret_char(c) {
            end = from + i + c.len_utf8();
        } else {
            break;
        }
    }
    end
}

fn scrub_after_marker(scrubbed: &mut String, marker: &str) {
    let mut search_from = 0;
    while let Some(rel) = scrubbed[search_from..].find(marker) {
        let start = search_from + rel;
        let content_start = start + marker.len();
        let end = token_end(scrubbed, content_start);

        // Bare marker with no token value.
        if end == content_start {
            search_from = content_start;
            continue;
        }

        scrubbed.replace_range(start..end, "[REDACTED]");
        search_from = start + "[REDACTED]".len();
    }
}

/// Redact API keys and bearer tokens that upstream services sometimes echo
/// back in error bodies (Groq keys, GitHub tokens, weather `key=` params).
pub fn scrub_secret_patterns(input: &str) -> Cow<'_, str> {
    let needs_scrubbing = PREFIX_PATTERNS
        .iter()
        .chain(MARKER_PATTERNS.iter())
        .any(|pattern| input.contains(pattern));
    if !needs_scrubbing {
        return Cow::Borrowed(input);
    }

    let mut scrubbed = input.to_string();
    for marker in MARKER_PATTERNS.iter().chain(PREFIX_PATTERNS.iter()) {
        scrub_after_marker(&mut scrubbed, marker);
    }
    Cow::Owned(scrubbed)
}

/// Sanitize API error text by scrubbing secrets and truncating length.
pub fn sanitize_api_error(input: &str) -> String {
    let scrubbed = scrub_secret_patterns(input);
    crate::utils::text::truncate_with_ellipsis(&scrubbed, MAX_API_ERROR_CHARS)
}

/// Build a sanitized provider error from a failed HTTP response.
pub async fn api_error(provider: &str, response: reqwest::Response) -> anyhow::Error {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read error body>".to_string());
    let sanitized = sanitize_api_error(&body);
    crate::error::LlmError::Request {
        provider: provider.to_string(),
        message: format!("API error ({status}): {sanitized}"),
    }
    .into()
}

//! Small text and clock helpers shared by config parsing and the HTTP remote.

/// Longest excerpt of a remote response kept in an error message.
pub const MAX_EXCERPT_CHARS: usize = 180;

/// Trim `value`, mapping missing or blank input to `None`.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

pub fn has_http_scheme(value: &str) -> bool {
    ["http://", "https://"]
        .iter()
        .any(|scheme| value.starts_with(scheme))
}

/// First [`MAX_EXCERPT_CHARS`] characters of a trimmed response body.
pub fn excerpt(body: &str) -> String {
    body.trim().chars().take(MAX_EXCERPT_CHARS).collect()
}

/// Wall-clock time as Unix milliseconds, the unit of `ColorRecord::created_at`.
pub fn unix_millis_now() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

//! Text and time helpers shared by the config, gateway and sync layers.

/// Longest response excerpt kept in error messages.
const DETAIL_MAX_CHARS: usize = 180;

/// Trim optional text, mapping blank values to `None`.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let trimmed = value?.trim().to_string();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Collapse every whitespace run to a single space, `None` when nothing is left.
///
/// # Examples
///
/// ```
/// use brewlog_core::util::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace(" Da  Hong\tPao "), Some("Da Hong Pao".to_string()));
/// assert_eq!(collapse_whitespace(" \n "), None);
/// ```
pub fn collapse_whitespace(value: &str) -> Option<String> {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    (!collapsed.is_empty()).then_some(collapsed)
}

/// Whether `value` carries an `http://` or `https://` scheme, in any case.
pub fn is_http_url(value: &str) -> bool {
    let lower = value.get(..8).unwrap_or(value).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Single-line excerpt of a response body for error details.
///
/// Django validation bodies span several lines when pretty-printed; they are
/// folded onto one line and cut at 180 characters.
pub fn compact_text(value: &str) -> String {
    let folded = collapse_whitespace(value).unwrap_or_default();
    if folded.chars().count() <= DETAIL_MAX_CHARS {
        folded
    } else {
        let mut excerpt = folded.chars().take(DETAIL_MAX_CHARS - 3).collect::<String>();
        excerpt.push_str("...");
        excerpt
    }
}

/// Current Unix time in milliseconds, the unit clocks are stored in.
pub fn unix_millis_now() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

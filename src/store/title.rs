//! Identifier and title helpers for conversations

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use regex::Regex;
use std::sync::OnceLock;
use uuid::Uuid;

/// Title given to conversations with no meaningful user message yet
pub const PLACEHOLDER_TITLE: &str = "New Conversation";

const TITLE_MAX_CHARS: usize = 30;
// A boundary at or before this index would leave a one-word title.
const TITLE_MIN_BOUNDARY: usize = 10;
const ELLIPSIS: &str = "...";

/// Derive a conversation title from message content
///
/// Content of at most 30 characters is used verbatim. Longer content is cut
/// at the last space, comma, period, question mark or exclamation mark in
/// the first 30 characters when that boundary lies past index 10, otherwise
/// at 30 characters; either way an ellipsis is appended.
///
/// # Examples
///
/// ```
/// use bizchat::store::derive_title;
///
/// assert_eq!(derive_title("Show me Q1 sales"), "Show me Q1 sales");
/// assert_eq!(
///     derive_title("Show me the quarterly revenue breakdown by region"),
///     "Show me the quarterly revenue..."
/// );
/// ```
pub fn derive_title(content: &str) -> String {
    let chars: Vec<char> = content.chars().collect();
    if chars.len() <= TITLE_MAX_CHARS {
        return content.to_string();
    }

    let head = &chars[..TITLE_MAX_CHARS];
    let cut = match head
        .iter()
        .rposition(|c| matches!(c, ' ' | ',' | '.' | '?' | '!'))
    {
        Some(idx) if idx > TITLE_MIN_BOUNDARY => idx,
        _ => TITLE_MAX_CHARS,
    };

    let mut title: String = head[..cut].iter().collect();
    title.push_str(ELLIPSIS);
    title
}

fn session_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}$")
            .expect("session id pattern is valid")
    })
}

/// Whether `id` has the canonical 8-4-4-4-12 hex shape of a server session id
///
/// # Examples
///
/// ```
/// use bizchat::store::is_session_uuid;
///
/// assert!(is_session_uuid("11111111-1111-1111-1111-111111111111"));
/// assert!(!is_session_uuid("temp-xyz"));
/// ```
pub fn is_session_uuid(id: &str) -> bool {
    session_id_pattern().is_match(id)
}

/// Allocate a client-side id for a conversation the backend has not seen
///
/// The result never matches [`is_session_uuid`].
pub fn new_temporary_id() -> String {
    format!("temp-{}", Uuid::new_v4().simple())
}

/// Parse a backend timestamp, with or without an offset
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

//! URL shape validation
//!
//! URLs end up in a Wikibase instance, so on top of the shape check they must
//! fit its limits: at most 500 characters, no spaces, no square brackets.

use fancy_regex::Regex;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::primitives::validate_non_empty_trimmed_string;
use crate::Validation;

/// Longest URL Wikibase accepts.
pub const MAX_URL_LENGTH: usize = 500;

// Scheme-relative or http(s)/ftp URL with a public IPv4 address or a
// dotted host name with an alphabetic TLD, or anything ending in a
// `localhost` authority. The private-range exclusions need look-ahead.
static URL_SHAPE: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?i)^(?:(?:(?:https?|ftp):)?//)(?:\S+(?::\S*)?@)?",
        r"(?:",
        r"(?!(?:10|127)(?:\.[0-9]{1,3}){3})",
        r"(?!(?:169\.254|192\.168)(?:\.[0-9]{1,3}){2})",
        r"(?!172\.(?:1[6-9]|2[0-9]|3[0-1])(?:\.[0-9]{1,3}){2})",
        r"(?:[1-9][0-9]?|1[0-9][0-9]|2[01][0-9]|22[0-3])",
        r"(?:\.(?:1?[0-9]{1,2}|2[0-4][0-9]|25[0-5])){2}",
        r"(?:\.(?:[1-9][0-9]?|1[0-9][0-9]|2[0-4][0-9]|25[0-4]))",
        r"|",
        r"(?:(?:[a-z\x{00a1}-\x{ffff}0-9]-*)*[a-z\x{00a1}-\x{ffff}0-9]+)",
        r"(?:\.(?:[a-z\x{00a1}-\x{ffff}0-9]-*)*[a-z\x{00a1}-\x{ffff}0-9]+)*",
        r"(?:\.(?:[a-z\x{00a1}-\x{ffff}]{2,})).?",
        r")",
        r"|localhost(?::[0-9]{2,5})?(?:[/?#]\S*)?$",
    ))
    .ok()
});

fn has_url_shape(text: &str) -> bool {
    match URL_SHAPE.as_ref() {
        // a backtracking limit error counts as no match
        Some(regex) => regex.is_match(text).unwrap_or(false),
        None => false,
    }
}

/// A trimmed URL that Wikibase will accept.
///
/// ```rust
/// use favre_validators::url::validate_url;
/// use serde_json::json;
///
/// assert!(validate_url(json!(" https://gitlab.huma-num.fr/ ")).is_valid());
/// assert!(validate_url(json!("http://localhost:3000")).is_valid());
/// assert_eq!(
///     validate_url(json!("gitlab.huma-num.fr")).error.unwrap().to_string(),
///     "Invalid URL",
/// );
/// ```
pub fn validate_url(value: Value) -> Validation {
    let result = validate_non_empty_trimmed_string(value);
    if result.is_invalid() {
        return result;
    }
    let text = result.value.as_str().unwrap_or_default();

    let message = if !has_url_shape(text) {
        Some("Invalid URL")
    } else if text.chars().count() > MAX_URL_LENGTH {
        Some("URL too long for Wikibase")
    } else if text.contains([' ', '[', ']']) {
        Some("An URL can not contain spaces or square brackets")
    } else {
        None
    };
    match message {
        Some(message) => Validation::invalid(result.value, message),
        None => result,
    }
}

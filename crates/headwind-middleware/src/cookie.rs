//! Request cookie lookup.
//!
//! Cookies are read straight from the `Cookie` request header(s). Parsing is
//! lenient about layout and strict about content:
//!
//! - every `Cookie` header line is scanned, in stored order
//! - pairs are separated by `;` and surrounding spaces are ignored
//! - a pair without `=` is a cookie with an empty value
//! - pairs whose name is not an HTTP token are skipped
//! - one pair of surrounding double quotes is stripped from the value
//! - values containing control bytes, non-ASCII bytes, `"`, `;` or `\` are
//!   skipped as malformed
//!
//! The first well-formed pair with a matching name wins.
//!
//! # Example
//!
//! ```
//! use headwind_middleware::cookie::find_cookie;
//! use http::{header::COOKIE, HeaderMap, HeaderValue};
//!
//! let mut headers = HeaderMap::new();
//! headers.insert(COOKIE, HeaderValue::from_static("session=abc123; theme=dark"));
//!
//! assert_eq!(find_cookie(&headers, "theme").as_deref(), Some("dark"));
//! assert_eq!(find_cookie(&headers, "missing"), None);
//! ```

use http::header::COOKIE;
use http::HeaderMap;

/// Looks up the value of the cookie called `name`.
///
/// Returns `None` when no well-formed cookie with that name is present.
#[must_use]
pub fn find_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|line| line.to_str().ok())
        .flat_map(|line| line.split(';'))
        .filter_map(parse_pair)
        .find(|(pair_name, _)| *pair_name == name)
        .map(|(_, value)| value.to_owned())
}

/// Parses a single `name=value` pair, returning `None` if it is malformed.
fn parse_pair(pair: &str) -> Option<(&str, &str)> {
    let pair = pair.trim_matches([' ', '\t']);
    if pair.is_empty() {
        return None;
    }

    let (name, raw_value) = pair.split_once('=').unwrap_or((pair, ""));
    if !is_valid_name(name) {
        return None;
    }

    let value = parse_value(raw_value)?;
    Some((name, value))
}

/// Strips optional surrounding quotes and validates every byte.
fn parse_value(raw: &str) -> Option<&str> {
    let value = if raw.len() > 1 && raw.starts_with('"') && raw.ends_with('"') {
        &raw[1..raw.len() - 1]
    } else {
        raw
    };

    value.bytes().all(is_valid_value_byte).then_some(value)
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && name.bytes().all(is_token_byte)
}

/// RFC 7230 `tchar`.
fn is_token_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric()
        || matches!(
            b,
            b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_'
                | b'`' | b'|' | b'~'
        )
}

// Space and comma are tolerated for compatibility with real-world clients.
fn is_valid_value_byte(b: u8) -> bool {
    (0x20..0x7f).contains(&b) && b != b'"' && b != b';' && b != b'\\'
}

//! Header value derivation strategies.
//!
//! A [`DerivationStrategy`] computes the value written into an output header
//! from an inbound request. Derivation is pure and infallible: a missing
//! source yields an empty string rather than an error.

use crate::cookie::find_cookie;
use std::fmt;

/// Separator used when joining the values of a multi-valued header.
pub const HEADER_VALUE_SEPARATOR: &str = ",";

/// How an output header value is derived from a request.
///
/// Built from a configured expression with [`DerivationStrategy::parse`].
///
/// # Example
///
/// ```
/// use headwind_middleware::DerivationStrategy;
///
/// let request = http::Request::builder()
///     .header("cookie", "session=abc123")
///     .body(())
///     .unwrap();
///
/// let strategy = DerivationStrategy::cookie("session");
/// assert_eq!(strategy.derive(&request), "abc123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DerivationStrategy {
    /// Reads the named cookie from the request.
    Cookie {
        /// Cookie name (case-sensitive).
        name: String,
    },
    /// Reads and joins every value of the named request header.
    Header {
        /// Header name (case-insensitive).
        name: String,
    },
    /// Returns a constant, ignoring the request.
    Literal {
        /// The constant value.
        value: String,
    },
}

impl DerivationStrategy {
    /// Creates a cookie strategy.
    pub fn cookie(name: impl Into<String>) -> Self {
        Self::Cookie { name: name.into() }
    }

    /// Creates a header strategy.
    pub fn header(name: impl Into<String>) -> Self {
        Self::Header { name: name.into() }
    }

    /// Creates a literal strategy.
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
        }
    }

    /// Returns a short label for this kind of strategy, used in logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Cookie { .. } => "cookie",
            Self::Header { .. } => "header",
            Self::Literal { .. } => "literal",
        }
    }

    /// Derives the output value for `request`.
    ///
    /// - `Cookie`: the cookie value as stored, or `""` if absent or malformed
    /// - `Header`: all values in stored order joined with `,`, or `""` if the
    ///   header is absent. Non-UTF-8 values are decoded lossily.
    /// - `Literal`: the constant
    #[must_use]
    pub fn derive<B>(&self, request: &http::Request<B>) -> String {
        match self {
            Self::Cookie { name } => find_cookie(request.headers(), name).unwrap_or_default(),
            Self::Header { name } => request
                .headers()
                .get_all(name.as_str())
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()))
                .collect::<Vec<_>>()
                .join(HEADER_VALUE_SEPARATOR),
            Self::Literal { value } => value.clone(),
        }
    }

    /// Derives the output value for `request` as raw header bytes.
    ///
    /// Same as [`derive`](Self::derive), except that header values are copied
    /// byte for byte, so values that are not valid UTF-8 are forwarded as sent.
    #[must_use]
    pub fn derive_bytes<B>(&self, request: &http::Request<B>) -> Vec<u8> {
        match self {
            Self::Header { name } => {
                let mut joined = Vec::new();
                for (i, value) in request.headers().get_all(name.as_str()).iter().enumerate() {
                    if i > 0 {
                        joined.extend_from_slice(HEADER_VALUE_SEPARATOR.as_bytes());
                    }
                    joined.extend_from_slice(value.as_bytes());
                }
                joined
            }
            Self::Cookie { .. } | Self::Literal { .. } => self.derive(request).into_bytes(),
        }
    }
}

impl fmt::Display for DerivationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cookie { name } => write!(f, "{}{name}", crate::expression::COOKIE_PREFIX),
            Self::Header { name } => write!(f, "{}{name}", crate::expression::HEADER_PREFIX),
            Self::Literal { value } => f.write_str(value),
        }
    }
}

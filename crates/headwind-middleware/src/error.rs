//! Middleware construction errors.

use thiserror::Error;

/// Errors raised while wiring a header transform into a chain.
///
/// Expression compilation never fails; the only rejected input is an output
/// header name that cannot be represented as an HTTP header.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The configured output header name is not a valid HTTP header name.
    #[error("invalid output header name {header:?} in chain {chain:?}")]
    InvalidHeaderName {
        /// Chain the transform was being built for.
        chain: String,
        /// The offending header name.
        header: String,
        /// Underlying parse error.
        #[source]
        source: http::header::InvalidHeaderName,
    },
}

impl BuildError {
    /// Create a new invalid header name error.
    pub fn invalid_header_name(
        chain: impl Into<String>,
        header: impl Into<String>,
        source: http::header::InvalidHeaderName,
    ) -> Self {
        Self::InvalidHeaderName {
            chain: chain.into(),
            header: header.into(),
            source,
        }
    }
}

//! Header transform middleware.
//!
//! [`HeaderTransformMiddleware`] applies a compiled list of transformers to
//! every request it sees, then forwards the request down the chain.
//!
//! ## Behavior
//!
//! 1. Transformers run strictly in configured order
//! 2. Each derived value overwrites the output header (never appends)
//! 3. An empty derived value is written as an empty header
//! 4. When two transformers target the same header, the later one wins
//! 5. No other request state is modified
//!
//! The compiled list is immutable after construction, so one instance can
//! serve any number of concurrent requests.
//!
//! # Example
//!
//! ```
//! use headwind_config::TransformSpec;
//! use headwind_middleware::HeaderTransformMiddleware;
//!
//! let middleware = HeaderTransformMiddleware::new(
//!     "rewriteHeader",
//!     &[TransformSpec::new("X-Forwarded-Host", "@Header:Host")],
//! )
//! .unwrap();
//!
//! let mut request = http::Request::builder()
//!     .header("host", "test:1000")
//!     .body(())
//!     .unwrap();
//!
//! middleware.apply(&mut request);
//! assert_eq!(request.headers()["x-forwarded-host"], "test:1000");
//! assert_eq!(request.headers()["host"], "test:1000");
//! ```

use crate::context::MiddlewareContext;
use crate::error::BuildError;
use crate::expression::{compile, CompiledTransformer};
use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response};
use headwind_config::TransformSpec;
use http::{HeaderName, HeaderValue};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// The header names written by a header transform, in write order.
///
/// Stored in the [`MiddlewareContext`] so downstream stages and handlers can
/// see which headers were derived rather than sent by the client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppliedHeaders(Vec<HeaderName>);

impl AppliedHeaders {
    /// Returns the written header names in write order.
    ///
    /// A header targeted by several transformers appears once per write.
    #[must_use]
    pub fn names(&self) -> &[HeaderName] {
        &self.0
    }

    /// Returns the number of header writes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no header was written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if `name` was written (case-insensitive).
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|h| h.as_str().eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone)]
struct BoundTransformer {
    header: HeaderName,
    compiled: CompiledTransformer,
}

/// Middleware that derives request headers from cookies, headers or literals.
#[derive(Debug, Clone)]
pub struct HeaderTransformMiddleware {
    chain: String,
    transformers: Vec<BoundTransformer>,
}

impl HeaderTransformMiddleware {
    /// Compiles `specs` and binds them for use in the chain called `chain`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidHeaderName`] if an output header name is
    /// not a valid HTTP header name. Value expressions are never rejected.
    pub fn new(chain: impl Into<String>, specs: &[TransformSpec]) -> Result<Self, BuildError> {
        Self::from_compiled(chain, compile(specs))
    }

    /// Binds already compiled transformers.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidHeaderName`] if an output header name is
    /// not a valid HTTP header name.
    pub fn from_compiled(
        chain: impl Into<String>,
        compiled: Vec<CompiledTransformer>,
    ) -> Result<Self, BuildError> {
        let chain = chain.into();
        let mut seen = HashSet::new();

        let transformers = compiled
            .into_iter()
            .map(|compiled| {
                let header = HeaderName::from_bytes(compiled.output_header.as_bytes()).map_err(
                    |e| BuildError::invalid_header_name(&chain, &compiled.output_header, e),
                )?;

                if !seen.insert(header.clone()) {
                    debug!(
                        chain = %chain,
                        header = %header,
                        "output header targeted more than once, last transformer wins"
                    );
                }

                Ok(BoundTransformer { header, compiled })
            })
            .collect::<Result<Vec<_>, BuildError>>()?;

        info!(
            chain = %chain,
            transformers = transformers.len(),
            "header transform ready"
        );

        Ok(Self {
            chain,
            transformers,
        })
    }

    /// Returns the name of the chain this instance was built for.
    #[must_use]
    pub fn chain_name(&self) -> &str {
        &self.chain
    }

    /// Returns the compiled transformers in application order.
    pub fn transformers(&self) -> impl Iterator<Item = &CompiledTransformer> {
        self.transformers.iter().map(|t| &t.compiled)
    }

    /// Returns the number of transformers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.transformers.len()
    }

    /// Returns true if there are no transformers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
    }

    /// Applies every transformer to `request`, in order.
    ///
    /// Each transformer derives its value from the request as left by the
    /// previous ones, then replaces any existing values of its output header.
    pub fn apply<B>(&self, request: &mut http::Request<B>) -> AppliedHeaders {
        let mut applied = Vec::with_capacity(self.transformers.len());

        for bound in &self.transformers {
            let strategy = &bound.compiled.strategy;
            let derived = strategy.derive_bytes(request);
            let value = self.to_header_value(&bound.header, &derived);

            debug!(
                chain = %self.chain,
                header = %bound.header,
                strategy = strategy.kind(),
                "request header set"
            );

            request.headers_mut().insert(bound.header.clone(), value);
            applied.push(bound.header.clone());
        }

        AppliedHeaders(applied)
    }

    // Control characters (only reachable through literals) become spaces.
    fn to_header_value(&self, header: &HeaderName, derived: &[u8]) -> HeaderValue {
        if let Ok(value) = HeaderValue::from_bytes(derived) {
            return value;
        }

        warn!(
            chain = %self.chain,
            header = %header,
            "derived value contains control characters, replacing them with spaces"
        );

        let sanitized: Vec<u8> = derived
            .iter()
            .map(|&b| if b.is_ascii_control() && b != b'\t' { b' ' } else { b })
            .collect();

        HeaderValue::from_bytes(&sanitized).unwrap_or_else(|_| HeaderValue::from_static(""))
    }
}

impl Middleware for HeaderTransformMiddleware {
    fn name(&self) -> &'static str {
        "header_transform"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut MiddlewareContext,
        mut request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            let applied = self.apply(&mut request);
            ctx.set_extension(applied);
            next.run(ctx, request).await
        })
    }
}

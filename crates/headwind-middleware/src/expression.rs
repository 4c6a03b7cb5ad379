//! Value expression compiler.
//!
//! Translates the configured `value` expressions into [`DerivationStrategy`]
//! values. Dispatch is an ordered prefix check where the first match wins:
//!
//! | Expression      | Strategy                              |
//! |-----------------|---------------------------------------|
//! | `@Cookie:NAME`  | [`DerivationStrategy::Cookie`] `NAME` |
//! | `@Header:NAME`  | [`DerivationStrategy::Header`] `NAME` |
//! | anything else   | [`DerivationStrategy::Literal`]       |
//!
//! Compilation never fails. Prefixes are matched case-sensitively and only at
//! the start of the expression; anything unrecognised is a literal.

use crate::strategy::DerivationStrategy;
use headwind_config::TransformSpec;

/// Prefix selecting the cookie strategy.
pub const COOKIE_PREFIX: &str = "@Cookie:";

/// Prefix selecting the header strategy.
pub const HEADER_PREFIX: &str = "@Header:";

impl DerivationStrategy {
    /// Compiles a value expression into a strategy.
    ///
    /// # Example
    ///
    /// ```
    /// use headwind_middleware::DerivationStrategy;
    ///
    /// assert_eq!(
    ///     DerivationStrategy::parse("@Cookie:Authorization"),
    ///     DerivationStrategy::cookie("Authorization"),
    /// );
    /// assert_eq!(
    ///     DerivationStrategy::parse("prefix @Header:Host"),
    ///     DerivationStrategy::literal("prefix @Header:Host"),
    /// );
    /// ```
    #[must_use]
    pub fn parse(expression: &str) -> Self {
        if let Some(name) = expression.strip_prefix(COOKIE_PREFIX) {
            return Self::cookie(name);
        }

        if let Some(name) = expression.strip_prefix(HEADER_PREFIX) {
            return Self::header(name);
        }

        Self::literal(expression)
    }
}

impl From<&str> for DerivationStrategy {
    fn from(expression: &str) -> Self {
        Self::parse(expression)
    }
}

/// A strategy bound to the header it writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTransformer {
    /// Name of the request header the derived value is written to.
    pub output_header: String,
    /// How the value is derived.
    pub strategy: DerivationStrategy,
}

impl CompiledTransformer {
    /// Compiles a single transform spec.
    #[must_use]
    pub fn compile(spec: &TransformSpec) -> Self {
        Self {
            output_header: spec.header.clone(),
            strategy: DerivationStrategy::parse(&spec.value),
        }
    }
}

/// Compiles transform specs, preserving their order.
///
/// The result always has the same length as `specs`.
#[must_use]
pub fn compile(specs: &[TransformSpec]) -> Vec<CompiledTransformer> {
    specs.iter().map(CompiledTransformer::compile).collect()
}

//! # Headwind
//!
//! **Request header rewriting for HTTP middleware chains**
//!
//! Headwind writes configured headers onto each inbound request before it
//! reaches the next handler. Each header value comes from one of:
//!
//! - `@Cookie:NAME` – the value of cookie `NAME`, or empty when absent
//! - `@Header:NAME` – every value of header `NAME`, joined with `,`
//! - anything else – the expression itself, as a fixed literal
//!
//! Rules run in configured order and overwrite earlier values, so the last
//! rule targeting a header wins.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use headwind::prelude::*;
//!
//! let config = ConfigLoader::new()
//!     .with_file("headwind.toml")?
//!     .with_env_prefix("HEADWIND")
//!     .load()?;
//!
//! headwind::init_logging(&config, "edge-proxy")?;
//! let pipeline = headwind::new(&config, "rewriteHeader")?;
//!
//! let response = pipeline
//!     .process(MiddlewareContext::new(), request, upstream)
//!     .await;
//! ```
//!
//! ## Architecture
//!
//! ```text
//! HeadwindConfig → headwind::new → Pipeline[header_transform] → next handler
//! ```

#![doc(html_root_url = "https://docs.rs/headwind/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use headwind_config::HeadwindConfig;
use headwind_middleware::{BuildError, HeaderTransformMiddleware, Pipeline};
use headwind_telemetry::TelemetryResult;

// Re-export configuration types
pub use headwind_config as config;

// Re-export middleware types
pub use headwind_middleware as middleware;

// Re-export logging setup
pub use headwind_telemetry as telemetry;

/// Builds the request pipeline for one configured chain.
///
/// The returned pipeline has a single `header_transform` stage. It is cheap
/// to clone and can be shared across tasks.
///
/// # Errors
///
/// Returns [`BuildError::InvalidHeaderName`] when a rewrite targets a header
/// name that HTTP cannot carry. Value expressions are never rejected.
pub fn new(config: &HeadwindConfig, name: &str) -> Result<Pipeline, BuildError> {
    let transform = HeaderTransformMiddleware::new(name, &config.rewrites)?;
    Ok(Pipeline::builder().add_stage(transform).build())
}

/// Installs the global log subscriber described by `config.logging`.
///
/// `service_name` is attached to the startup event.
pub fn init_logging(config: &HeadwindConfig, service_name: &str) -> TelemetryResult<()> {
    headwind_telemetry::init_logging(&config.logging.to_log_config(service_name))
}

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust,ignore
/// use headwind::prelude::*;
/// ```
pub mod prelude {
    pub use headwind_config::{
        ConfigError, ConfigLoader, HeadwindConfig, LogFormat, LoggingConfig, TransformSpec,
    };

    pub use headwind_middleware::{
        AppliedHeaders, BoxFuture, BuildError, DerivationStrategy, HeaderTransformMiddleware,
        Middleware, MiddlewareContext, Next, Pipeline, PipelineBuilder, Request, Response,
    };

    pub use headwind_telemetry::{LogConfig, TelemetryError, TelemetryResult};
}

//! Structured logging for Headwind.
//!
//! Headwind emits `tracing` events when a header transform middleware is
//! built and while it rewrites requests. This crate installs the subscriber
//! that turns those events into JSON or pretty log lines.
//!
//! # Example
//!
//! ```rust,ignore
//! use headwind_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig {
//!     service_name: "edge-proxy".to_string(),
//!     ..LogConfig::default()
//! })?;
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

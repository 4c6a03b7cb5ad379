//! Configuration schema types.
//!
//! This module defines the structure of all configuration sections.

use headwind_telemetry::LogConfig;
use serde::{Deserialize, Serialize};

/// A single header rewrite rule.
///
/// `value` is an expression: `@Cookie:NAME`, `@Header:NAME`, or a literal.
/// Both fields default to the empty string when omitted.
///
/// # Example
///
/// ```
/// use headwind_config::TransformSpec;
///
/// let spec: TransformSpec =
///     serde_json::from_str(r#"{"header": "X-Auth", "value": "@Cookie:Authorization"}"#).unwrap();
/// assert_eq!(spec, TransformSpec::new("X-Auth", "@Cookie:Authorization"));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(deny_unknown_fields)]
pub struct TransformSpec {
    /// Output header written on the request.
    #[serde(default)]
    pub header: String,

    /// Value expression.
    #[serde(default)]
    pub value: String,
}

impl TransformSpec {
    /// Creates a rewrite rule.
    pub fn new(header: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            value: value.into(),
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level or filter directive (e.g. `info`, `headwind=debug`).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Converts this section into a logging setup for `service_name`.
    #[must_use]
    pub fn to_log_config(&self, service_name: &str) -> LogConfig {
        LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            json_format: self.format == LogFormat::Json,
            file_line_info: self.include_location,
            service_name: service_name.to_string(),
            ..LogConfig::default()
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

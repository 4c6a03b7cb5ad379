//! Main configuration types.
//!
//! This module provides the top-level [`HeadwindConfig`] struct and its builder.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, LogFormat, LoggingConfig, TransformSpec};

/// Complete Headwind configuration.
///
/// The rewrite list is ordered: rules are applied to each request in this
/// order, so a later rule targeting the same header overwrites an earlier one.
/// The default configuration has no rewrites.
///
/// # Example
///
/// ```
/// use headwind_config::HeadwindConfig;
///
/// let config = HeadwindConfig::default();
/// assert!(config.rewrites.is_empty());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct HeadwindConfig {
    /// Ordered header rewrite rules.
    #[serde(default)]
    pub rewrites: Vec<TransformSpec>,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HeadwindConfig {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```
    /// use headwind_config::HeadwindConfig;
    ///
    /// let config = HeadwindConfig::builder()
    ///     .rewrite("X-Auth", "@Cookie:Authorization")
    ///     .rewrite("X-Tag", "static-tag")
    ///     .build();
    ///
    /// assert_eq!(config.rewrites.len(), 2);
    /// assert_eq!(config.rewrites[1].value, "static-tag");
    /// ```
    #[must_use]
    pub fn builder() -> HeadwindConfigBuilder {
        HeadwindConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// Rewrite rules are never rejected: any value expression is usable, and
    /// unknown prefixes are treated as literals.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if `logging.level` is empty or is
    /// not a filter the log subscriber accepts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.logging.level.trim();
        if level.is_empty() {
            return Err(ConfigError::invalid_value("logging.level", "must not be empty"));
        }

        headwind_telemetry::create_env_filter(level)
            .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;

        Ok(())
    }

    /// Create a development configuration preset with pretty debug logs.
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.include_location = true;
        config
    }

    /// Create a production configuration preset with JSON info logs.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config
    }
}

/// Builder for [`HeadwindConfig`].
#[derive(Debug, Default)]
pub struct HeadwindConfigBuilder {
    rewrites: Vec<TransformSpec>,
    logging: Option<LoggingConfig>,
}

impl HeadwindConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rewrite rule.
    #[must_use]
    pub fn rewrite(mut self, header: impl Into<String>, value: impl Into<String>) -> Self {
        self.rewrites.push(TransformSpec::new(header, value));
        self
    }

    /// Append several rewrite rules, keeping their order.
    #[must_use]
    pub fn rewrites(mut self, rewrites: impl IntoIterator<Item = TransformSpec>) -> Self {
        self.rewrites.extend(rewrites);
        self
    }

    /// Set the logging configuration.
    #[must_use]
    pub fn logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = Some(logging);
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> HeadwindConfig {
        HeadwindConfig {
            rewrites: self.rewrites,
            logging: self.logging.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<HeadwindConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}

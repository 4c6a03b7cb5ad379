//! Typed configuration for Headwind.
//!
//! This crate provides the configuration model for Headwind header
//! transforms with support for:
//! - TOML and JSON configuration files
//! - Environment variable overrides for the logging section
//! - Strict parsing (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Example
//!
//! ```no_run
//! use headwind_config::ConfigLoader;
//!
//! # fn main() -> Result<(), headwind_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_file("headwind.toml")?
//!     .with_env_prefix("HEADWIND")
//!     .load()?;
//!
//! for rule in &config.rewrites {
//!     println!("{} <- {}", rule.header, rule.value);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [[rewrites]]
//! header = "X-Auth"
//! value = "@Cookie:Authorization"
//!
//! [[rewrites]]
//! header = "X-Forwarded-Host"
//! value = "@Header:Host"
//!
//! [[rewrites]]
//! header = "X-Tag"
//! value = "static-tag"
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```
//!
//! The same document in JSON uses a `rewrites` array of
//! `{"header": ..., "value": ...}` objects.
//!
//! # Environment Variable Overrides
//!
//! - `HEADWIND__LOGGING__ENABLED=false`
//! - `HEADWIND__LOGGING__LEVEL=debug`
//! - `HEADWIND__LOGGING__FORMAT=pretty`
//! - `HEADWIND__LOGGING__INCLUDE_LOCATION=true`

#![warn(missing_docs)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::*;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;

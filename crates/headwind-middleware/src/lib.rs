//! # Headwind Middleware
//!
//! Request header transformation for HTTP middleware chains.
//!
//! For each configured output header, Headwind derives a value from a cookie,
//! another header, or a fixed literal and writes it onto the inbound request
//! before forwarding it to the next handler.
//!
//! ## Value Expressions
//!
//! | Expression      | Meaning                                          |
//! |-----------------|--------------------------------------------------|
//! | `@Cookie:NAME`  | value of cookie `NAME`, or empty                 |
//! | `@Header:NAME`  | all values of header `NAME` joined with `,`      |
//! | anything else   | the expression itself, as a literal              |
//!
//! ## Flow
//!
//! ```text
//! config → compile once → [HeaderTransformMiddleware] → next handler
//!                              ↑ per request: derive + set, in order
//! ```
//!
//! ## Example
//!
//! ```
//! use headwind_config::TransformSpec;
//! use headwind_middleware::{HeaderTransformMiddleware, Pipeline};
//!
//! let transform = HeaderTransformMiddleware::new(
//!     "rewriteHeader",
//!     &[TransformSpec::new("X-Auth", "@Cookie:Authorization")],
//! )
//! .unwrap();
//!
//! let pipeline = Pipeline::builder().add_stage(transform).build();
//! assert_eq!(pipeline.stage_names(), vec!["header_transform"]);
//! ```

#![doc(html_root_url = "https://docs.rs/headwind-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod context;
pub mod cookie;
pub mod error;
pub mod expression;
pub mod middleware;
pub mod pipeline;
pub mod strategy;
pub mod transform;
pub mod types;

// Re-export main types at crate root
pub use context::MiddlewareContext;
pub use error::BuildError;
pub use expression::{compile, CompiledTransformer, COOKIE_PREFIX, HEADER_PREFIX};
pub use middleware::{BoxFuture, Middleware, Next};
pub use pipeline::{BoxedMiddleware, Pipeline, PipelineBuilder};
pub use strategy::DerivationStrategy;
pub use transform::{AppliedHeaders, HeaderTransformMiddleware};
pub use types::{Request, Response};

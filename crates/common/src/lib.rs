//! Reusable runtime pieces shared by the RON SDK crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: error classification, response size limits
//! - `runtime`: async infrastructure (backoff, retry, token providers)
//! - `observability`: tracing events (implied by `runtime`)

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod error;
#[cfg(feature = "foundation")]
pub mod limits;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod auth;
#[cfg(feature = "runtime")]
pub mod resilience;

// Re-export commonly used types and traits for convenience
// ------------------------
#[cfg(feature = "runtime")]
pub use auth::{
    IssuedToken, RefreshingTokenProvider, StaticTokenProvider, TokenError, TokenProvider,
    TokenSource,
};
#[cfg(feature = "foundation")]
pub use error::{ErrorClassification, ErrorSeverity};
#[cfg(feature = "foundation")]
pub use limits::ResponseSizeLimiter;
#[cfg(feature = "runtime")]
pub use resilience::{AttemptError, BackoffStrategy, RetryPolicy};

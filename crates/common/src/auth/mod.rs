//! Token collaborators for the `Authorization` header
//!
//! The client asks a [`TokenProvider`] for a bearer token once per call.
//! Two implementations are provided:
//! - [`StaticTokenProvider`]: a fixed token
//! - [`RefreshingTokenProvider`]: caches a token issued by a
//!   [`TokenSource`] and refreshes it shortly before expiry, with a single
//!   refresh in flight however many callers race for it
//!
//! Token values never appear in `Debug` output, error messages or logs.

pub mod provider;
pub mod refreshing;

pub use provider::{StaticTokenProvider, TokenError, TokenProvider};
pub use refreshing::{IssuedToken, RefreshingTokenProvider, TokenSource};

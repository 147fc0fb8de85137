//! SDK constants
//!
//! Centralized location for header names, protocol identifiers and
//! configuration defaults used throughout the SDK.

use std::time::Duration;

// Client identity
pub const SDK_NAME: &str = "ron-app-sdk-rust";
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Gateway app-plane protocol version sent on every request.
pub const PROTOCOL_VERSION: &str = "1";

/// Fixed root prefix of every app-plane endpoint.
pub const APP_PATH_PREFIX: &str = "/app";

// Header names
pub const HEADER_USER_AGENT: &str = "User-Agent";
pub const HEADER_PROTOCOL_VERSION: &str = "X-Ron-Protocol-Version";
pub const HEADER_REQUEST_ID: &str = "X-Request-Id";
pub const HEADER_CORRELATION_ID: &str = "X-Correlation-Id";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HEADER_ACCEPT: &str = "Accept";
pub const HEADER_IDEMPOTENCY_KEY: &str = "Idempotency-Key";

pub const CONTENT_TYPE_JSON: &str = "application/json";

// Configuration defaults
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_OVERALL_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_MAX_RETRIES: u32 = 0;
pub const DEFAULT_MAX_RESPONSE_BYTES: i64 = 5 * 1024 * 1024;

/// `User-Agent` value, e.g. `ron-app-sdk-rust/0.1.0`.
#[must_use]
pub fn user_agent() -> String {
    format!("{SDK_NAME}/{SDK_VERSION}")
}

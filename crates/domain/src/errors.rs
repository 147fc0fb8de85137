//! Error types used throughout the SDK
//!
//! Every failure the request pipeline surfaces is an [`SdkError`]: a
//! classified error carrying a kind, a stable machine-readable code, a human
//! message, an optional correlation id, a retryable flag and a details map.
//!
//! Messages must never contain credential or token material. Constructors
//! take the message verbatim, so call sites are responsible for keeping
//! secrets out of it; the pipeline itself only ever uses fixed strings.

use std::collections::BTreeMap;
use std::error::Error as StdError;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::impl_wire_name_conversions;

/// Boxed error used as the wrapped cause of an [`SdkError`].
pub type BoxedError = Box<dyn StdError + Send + Sync + 'static>;

/// Result type alias for SDK operations
pub type SdkResult<T> = std::result::Result<T, SdkError>;

/// Stable error codes surfaced by the pipeline.
pub mod codes {
    /// No base URL was configured.
    pub const CONFIG_MISSING_BASE_URL: &str = "CONFIG_MISSING_BASE_URL";
    /// The base URL could not be parsed.
    pub const CONFIG_INVALID_URL: &str = "CONFIG_INVALID_URL";
    /// Plain HTTP was requested without explicitly allowing it.
    pub const CONFIG_INSECURE_HTTP_DISABLED: &str = "CONFIG_INSECURE_HTTP_DISABLED";
    /// The transport reported an I/O failure.
    pub const TRANSPORT_IO_ERROR: &str = "TRANSPORT_IO_ERROR";
    /// An unclassified failure occurred while talking to the transport.
    pub const TRANSPORT_ERROR: &str = "TRANSPORT_ERROR";
    /// The transport client itself failed (bad request construction etc).
    pub const HTTP_CLIENT_ERROR: &str = "HTTP_CLIENT_ERROR";
    /// The response body exceeded the configured limit.
    pub const RESPONSE_TOO_LARGE: &str = "RESPONSE_TOO_LARGE";
    /// A backoff wait was cancelled.
    pub const RETRY_INTERRUPTED: &str = "RETRY_INTERRUPTED";
    /// Something outside the classified taxonomy failed.
    pub const UNEXPECTED_RUNTIME_ERROR: &str = "UNEXPECTED_RUNTIME_ERROR";
    /// Serialization or deserialization failed.
    pub const DECODE_ERROR: &str = "DECODE_ERROR";
}

/// Category of an [`SdkError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad or missing configuration. Fatal, never retried.
    Config,
    /// Network, size-limit or unexpected failures.
    Transport,
    /// Malformed body or serialization failure. Never retried.
    Decode,
}

impl_wire_name_conversions!(ErrorKind {
    Config => "config",
    Transport => "transport",
    Decode => "decode",
});

/// Classified SDK error
#[derive(Debug, Error)]
#[error("{message} ({kind}/{code})")]
pub struct SdkError {
    kind: ErrorKind,
    code: String,
    message: String,
    correlation_id: Option<String>,
    retryable: bool,
    details: BTreeMap<String, Value>,
    #[source]
    source: Option<BoxedError>,
}

impl SdkError {
    /// Create an error with every classification field supplied.
    pub fn new(
        kind: ErrorKind,
        code: impl Into<String>,
        message: impl Into<String>,
        retryable: bool,
    ) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            correlation_id: None,
            retryable,
            details: BTreeMap::new(),
            source: None,
        }
    }

    /// Configuration error (never retryable).
    pub fn config(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Config, code, message, false)
    }

    /// Transport error.
    pub fn transport(code: impl Into<String>, message: impl Into<String>, retryable: bool) -> Self {
        Self::new(ErrorKind::Transport, code, message, retryable)
    }

    /// Decode error (`DECODE_ERROR`, never retryable).
    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode, codes::DECODE_ERROR, message, false)
    }

    /// Attach the underlying cause.
    #[must_use]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    /// Attach an already boxed cause.
    #[must_use]
    pub fn with_boxed_source(mut self, source: BoxedError) -> Self {
        self.source = Some(source);
        self
    }

    /// Attach a correlation id for cross-system tracing.
    #[must_use]
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    /// Add a single entry to the details map.
    #[must_use]
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn correlation_id(&self) -> Option<&str> {
        self.correlation_id.as_deref()
    }

    pub fn is_retryable(&self) -> bool {
        self.retryable
    }

    pub fn details(&self) -> &BTreeMap<String, Value> {
        &self.details
    }

    /// True when this error carries the given code.
    pub fn has_code(&self, code: &str) -> bool {
        self.code == code
    }

    pub fn is_config(&self) -> bool {
        self.kind == ErrorKind::Config
    }

    pub fn is_transport(&self) -> bool {
        self.kind == ErrorKind::Transport
    }

    pub fn is_decode(&self) -> bool {
        self.kind == ErrorKind::Decode
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;

    #[test]
    fn test_config_error_is_never_retryable() {
        let err = SdkError::config(codes::CONFIG_MISSING_BASE_URL, "baseUrl is required");
        assert_eq!(err.kind(), ErrorKind::Config);
        assert_eq!(err.code(), "CONFIG_MISSING_BASE_URL");
        assert!(!err.is_retryable());
        assert!(err.is_config());
        assert!(err.source().is_none());
    }

    #[test]
    fn test_decode_error_uses_decode_code() {
        let err = SdkError::decode("Failed to decode response body");
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.has_code(codes::DECODE_ERROR));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_transport_error_keeps_cause() {
        let cause = io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer");
        let err = SdkError::transport(codes::TRANSPORT_IO_ERROR, "I/O error during HTTP call", true)
            .with_source(cause);

        assert!(err.is_transport());
        assert!(err.is_retryable());
        let source = err.source().expect("source attached");
        assert!(source.to_string().contains("reset by peer"));
    }

    #[test]
    fn test_display_contains_kind_and_code() {
        let err = SdkError::transport(codes::RESPONSE_TOO_LARGE, "Response too large", false);
        let text = err.to_string();
        assert!(text.contains("Response too large"));
        assert!(text.contains("transport/RESPONSE_TOO_LARGE"));
    }

    #[test]
    fn test_details_and_correlation_id() {
        let err = SdkError::transport(codes::RESPONSE_TOO_LARGE, "Response too large", false)
            .with_detail("limit", 10)
            .with_detail("actual", 11)
            .with_correlation_id("corr-1");

        assert_eq!(err.details().get("limit"), Some(&Value::from(10)));
        assert_eq!(err.details().get("actual"), Some(&Value::from(11)));
        assert_eq!(err.correlation_id(), Some("corr-1"));
    }

    #[test]
    fn test_error_kind_wire_names() {
        assert_eq!(ErrorKind::Config.to_string(), "config");
        assert_eq!("TRANSPORT".parse::<ErrorKind>().unwrap(), ErrorKind::Transport);
        assert_eq!(serde_json::to_string(&ErrorKind::Decode).unwrap(), "\"decode\"");
    }

    #[test]
    fn test_sdk_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync + 'static>() {}
        assert_send_sync::<SdkError>();
    }
}

//! Error classification shared across the SDK
//!
//! [`SdkError`] and the token errors implement [`ErrorClassification`] so
//! that retry decisions and log levels are derived in one place.
//!
//! | Severity | Raised for |
//! |----------|------------|
//! | **Info** | cancelled retry wait |
//! | **Warning** | retryable transport failures |
//! | **Error** | config, decode, oversized body, non-retryable transport |
//! | **Critical** | `UNEXPECTED_RUNTIME_ERROR` |
//!
//! ## Example
//!
//! ```rust,ignore
//! use ron_sdk_common::error::{ErrorClassification, ErrorSeverity};
//! use ron_sdk_domain::{codes, SdkError};
//!
//! let err = SdkError::transport(codes::TRANSPORT_IO_ERROR, "I/O error during HTTP call", true);
//! assert!(ErrorClassification::is_retryable(&err));
//! assert_eq!(err.severity(), ErrorSeverity::Warning);
//! ```

use std::fmt;
use std::time::Duration;

use ron_sdk_domain::{codes, ErrorKind, SdkError};

/// Classification shared by every SDK error type
pub trait ErrorClassification {
    /// Whether another attempt might succeed.
    fn is_retryable(&self) -> bool;

    /// How loudly the failure should be reported.
    fn severity(&self) -> ErrorSeverity;

    /// Shorthand for `severity() == Critical`.
    fn is_critical(&self) -> bool {
        self.severity() == ErrorSeverity::Critical
    }

    /// Delay the server asked callers to wait before retrying, if any.
    fn retry_after(&self) -> Option<Duration>;
}

/// Reporting level of a classified error, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Expected outcome (cancelled wait)
    Info,
    /// Transient, usually retried
    Warning,
    /// Call failed and will not succeed unchanged
    Error,
    /// Failure outside the classified taxonomy
    Critical,
}

impl ErrorSeverity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARN",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detail key a caller may set (in milliseconds) to suggest a retry delay.
pub const RETRY_AFTER_MS_DETAIL: &str = "retry_after_ms";

impl ErrorClassification for SdkError {
    fn is_retryable(&self) -> bool {
        SdkError::is_retryable(self)
    }

    fn severity(&self) -> ErrorSeverity {
        match self.kind() {
            ErrorKind::Config | ErrorKind::Decode => ErrorSeverity::Error,
            ErrorKind::Transport => match self.code() {
                codes::UNEXPECTED_RUNTIME_ERROR => ErrorSeverity::Critical,
                codes::RETRY_INTERRUPTED => ErrorSeverity::Info,
                _ if SdkError::is_retryable(self) => ErrorSeverity::Warning,
                _ => ErrorSeverity::Error,
            },
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        if !SdkError::is_retryable(self) {
            return None;
        }
        self.details()
            .get(RETRY_AFTER_MS_DETAIL)
            .and_then(serde_json::Value::as_u64)
            .map(Duration::from_millis)
    }
}

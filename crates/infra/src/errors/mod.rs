//! Infrastructure-side error types and conversions into the SDK taxonomy.

mod conversions;

use ron_sdk_domain::BoxedError;
use thiserror::Error;

/// Failure reported by an [`HttpTransport`](crate::http::HttpTransport).
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network-level failure: connect, timeout, reset, body stream
    #[error("I/O error during HTTP call")]
    Io(#[source] BoxedError),

    /// Anything else the transport could not complete
    #[error("HTTP client failure")]
    Client(#[source] BoxedError),
}

impl TransportError {
    pub fn io<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Io(Box::new(error))
    }

    pub fn client<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Client(Box::new(error))
    }

    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

//! Token provider trait and the fixed-token implementation

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use ron_sdk_domain::BoxedError;
use thiserror::Error;

use crate::error::{ErrorClassification, ErrorSeverity};

/// Errors from token retrieval
///
/// Display text never contains token material.
#[derive(Debug, Error)]
pub enum TokenError {
    /// No token could be produced (not authenticated, misconfigured source)
    #[error("Access token unavailable: {0}")]
    Unavailable(String),

    /// The token source failed while refreshing
    #[error("Access token refresh failed")]
    RefreshFailed(#[source] BoxedError),
}

impl TokenError {
    pub fn refresh_failed<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::RefreshFailed(Box::new(error))
    }
}

impl ErrorClassification for TokenError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::RefreshFailed(_))
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Unavailable(_) => ErrorSeverity::Error,
            Self::RefreshFailed(_) => ErrorSeverity::Warning,
        }
    }

    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

/// Supplies bearer tokens for outbound requests
///
/// Returning `Ok(None)` (or a blank token) sends the request without an
/// `Authorization` header.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Current access token, if any
    ///
    /// # Errors
    /// Returns error if a token should exist but could not be obtained
    async fn access_token(&self) -> Result<Option<String>, TokenError>;
}

/// Always returns the same token
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

impl fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenProvider").field("token", &"[REDACTED]").finish()
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<Option<String>, TokenError> {
        Ok(Some(self.token.clone()))
    }
}

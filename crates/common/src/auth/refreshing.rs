//! Cached token provider with refresh-before-expiry
//!
//! The current token is held as an immutable snapshot in an
//! [`ArcSwapOption`]. Readers load it without locking. On a miss, or when the
//! snapshot is within `refresh_skew` of expiry, the caller takes the refresh
//! mutex, re-checks the snapshot (another caller may have refreshed it while
//! this one waited) and only then asks the [`TokenSource`] for a new token.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use super::provider::{TokenError, TokenProvider};

/// Default margin before expiry at which a token is refreshed.
pub const DEFAULT_REFRESH_SKEW: Duration = Duration::from_secs(30);

/// A token together with its expiry
#[derive(Clone)]
pub struct IssuedToken {
    value: String,
    expires_at: Option<Instant>,
}

impl IssuedToken {
    /// Token valid for `ttl` from now.
    pub fn new(value: impl Into<String>, ttl: Duration) -> Self {
        Self { value: value.into(), expires_at: Some(Instant::now() + ttl) }
    }

    pub fn non_expiring(value: impl Into<String>) -> Self {
        Self { value: value.into(), expires_at: None }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> Option<Instant> {
        self.expires_at
    }

    /// Still usable with at least `skew` to spare.
    pub fn is_fresh(&self, skew: Duration) -> bool {
        self.expires_at.map_or(true, |at| Instant::now() + skew < at)
    }
}

impl fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedToken")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Where fresh tokens come from (an identity provider, a sidecar, a file)
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Obtain a new token
    ///
    /// # Errors
    /// Returns error if no token could be issued
    async fn fetch_token(&self) -> Result<IssuedToken, TokenError>;
}

/// [`TokenProvider`] that caches tokens from a [`TokenSource`]
pub struct RefreshingTokenProvider<S: TokenSource> {
    source: S,
    snapshot: ArcSwapOption<IssuedToken>,
    refresh_lock: Mutex<()>,
    refresh_skew: Duration,
}

impl<S: TokenSource> RefreshingTokenProvider<S> {
    pub fn new(source: S) -> Self {
        Self::with_refresh_skew(source, DEFAULT_REFRESH_SKEW)
    }

    pub fn with_refresh_skew(source: S, refresh_skew: Duration) -> Self {
        Self {
            source,
            snapshot: ArcSwapOption::empty(),
            refresh_lock: Mutex::new(()),
            refresh_skew,
        }
    }

    pub fn refresh_skew(&self) -> Duration {
        self.refresh_skew
    }

    /// Drop the cached token; the next call fetches a new one.
    pub fn invalidate(&self) {
        self.snapshot.store(None);
    }

    fn fresh_snapshot(&self) -> Option<Arc<IssuedToken>> {
        self.snapshot.load_full().filter(|token| token.is_fresh(self.refresh_skew))
    }
}

impl<S: TokenSource> fmt::Debug for RefreshingTokenProvider<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshingTokenProvider")
            .field("cached", &self.snapshot.load().is_some())
            .field("refresh_skew", &self.refresh_skew)
            .finish()
    }
}

#[async_trait]
impl<S: TokenSource> TokenProvider for RefreshingTokenProvider<S> {
    async fn access_token(&self) -> Result<Option<String>, TokenError> {
        if let Some(token) = self.fresh_snapshot() {
            return Ok(Some(token.value().to_string()));
        }

        let _guard = self.refresh_lock.lock().await;
        if let Some(token) = self.fresh_snapshot() {
            return Ok(Some(token.value().to_string()));
        }

        debug!("Refreshing access token");
        let issued = Arc::new(self.source.fetch_token().await?);
        self.snapshot.store(Some(Arc::clone(&issued)));
        Ok(Some(issued.value().to_string()))
    }
}

//! Bounded retry loop for transport attempts
//!
//! [`RetryPolicy::execute`] drives a single logical call. The operation is
//! invoked once per attempt and reports either a classified [`SdkError`] or
//! an unclassified failure. Classified errors are retried only when the
//! method is idempotent, the error is marked retryable and the budget is not
//! exhausted. Unclassified failures are treated as a 503 for eligibility
//! purposes and wrapped as `TRANSPORT_ERROR` once retrying stops.
//!
//! Waits between attempts suspend the task with `tokio::time::sleep`. An
//! optional [`CancellationToken`] interrupts the wait, which surfaces as a
//! terminal `RETRY_INTERRUPTED` error.

use std::error::Error as StdError;
use std::future::Future;
use std::time::Duration;

use ron_sdk_domain::{codes, BoxedError, HttpMethod, SdkError, SdkResult};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

use super::backoff::BackoffStrategy;

/// Status assumed for failures the transport could not classify.
const UNCLASSIFIED_FAILURE_STATUS: u16 = 503;

const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(200);
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(5);
const DEFAULT_JITTER: f64 = 0.2;

/// Failure reported by one attempt
#[derive(Debug, Error)]
pub enum AttemptError {
    /// Already classified; retried or returned verbatim
    #[error(transparent)]
    Classified(#[from] SdkError),

    /// Anything else; approximated as a 503
    #[error("unclassified attempt failure: {0}")]
    Unclassified(#[source] BoxedError),
}

impl AttemptError {
    pub fn unclassified<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::Unclassified(Box::new(error))
    }
}

/// Retry budget, backoff schedule and optional cancellation
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    max_retries: u32,
    backoff: BackoffStrategy,
    cancellation: Option<CancellationToken>,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff: BackoffStrategy) -> Self {
        Self { max_retries, backoff, cancellation: None }
    }

    /// No retries, no backoff.
    pub fn default_policy() -> Self {
        Self::new(0, BackoffStrategy::none())
    }

    pub fn exponential_backoff(
        max_retries: u32,
        base_delay: Duration,
        max_delay: Duration,
        jitter: f64,
    ) -> Self {
        Self::new(max_retries, BackoffStrategy::exponential(base_delay, max_delay, jitter))
    }

    /// Policy used when a client is built without an explicit one: no
    /// retries for a zero budget, otherwise exponential 200ms..5s with 20%
    /// jitter.
    pub fn for_max_retries(max_retries: u32) -> Self {
        if max_retries == 0 {
            Self::default_policy()
        } else {
            Self::exponential_backoff(
                max_retries,
                DEFAULT_BASE_DELAY,
                DEFAULT_MAX_DELAY,
                DEFAULT_JITTER,
            )
        }
    }

    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn backoff(&self) -> &BackoffStrategy {
        &self.backoff
    }

    pub fn cancellation(&self) -> Option<&CancellationToken> {
        self.cancellation.as_ref()
    }

    /// Whether attempt number `attempt` (1-based, already failed with
    /// `status`) may be followed by another.
    pub fn should_retry(&self, attempt: u32, status: u16, idempotent: bool) -> bool {
        if !idempotent || attempt > self.max_retries {
            return false;
        }
        status == 408 || status == 429 || (500..600).contains(&status)
    }

    /// Run `operation` until it succeeds or retrying stops.
    ///
    /// # Errors
    ///
    /// - a classified error from the last attempt, unchanged
    /// - `TRANSPORT_ERROR` wrapping the last unclassified failure
    /// - `RETRY_INTERRUPTED` when the wait was cancelled
    #[instrument(skip(self, operation), fields(max_retries = self.max_retries))]
    pub async fn execute<F, Fut, T>(&self, method: HttpMethod, mut operation: F) -> SdkResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AttemptError>>,
    {
        let idempotent = method.is_idempotent();
        let mut attempt: u32 = 0;

        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        debug!(retries = attempt, "Operation succeeded after retries");
                    }
                    return Ok(value);
                }
                Err(AttemptError::Classified(error)) => {
                    attempt = attempt.saturating_add(1);
                    if !idempotent || !error.is_retryable() || attempt > self.max_retries {
                        return Err(error);
                    }
                    let delay = self.backoff.next_delay(attempt);
                    warn!(attempt, ?delay, code = error.code(), "Attempt failed, retrying");
                    self.pause(delay).await?;
                }
                Err(AttemptError::Unclassified(cause)) => {
                    attempt = attempt.saturating_add(1);
                    if !self.should_retry(attempt, UNCLASSIFIED_FAILURE_STATUS, idempotent) {
                        return Err(SdkError::transport(
                            codes::TRANSPORT_ERROR,
                            "Transport failure",
                            idempotent,
                        )
                        .with_boxed_source(cause));
                    }
                    let delay = self.backoff.next_delay(attempt);
                    warn!(attempt, ?delay, "Attempt failed with unclassified error, retrying");
                    self.pause(delay).await?;
                }
            }
        }
    }

    async fn pause(&self, delay: Duration) -> SdkResult<()> {
        let Some(token) = &self.cancellation else {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            return Ok(());
        };

        if token.is_cancelled() {
            return Err(interrupted());
        }
        if delay.is_zero() {
            return Ok(());
        }
        tokio::select! {
            () = token.cancelled() => Err(interrupted()),
            () = tokio::time::sleep(delay) => Ok(()),
        }
    }
}

fn interrupted() -> SdkError {
    warn!("Retry wait cancelled");
    SdkError::transport(codes::RETRY_INTERRUPTED, "Retry interrupted", false)
}

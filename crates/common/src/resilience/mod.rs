//! Resilience patterns for the request pipeline
//!
//! - **Backoff**: pure attempt-number to delay schedules
//! - **Retry**: the bounded retry loop that drives a transport attempt,
//!   honoring idempotency and cancellation
//!
//! Only read-only verbs are ever retried. Writes get exactly one attempt,
//! whatever the failure, so that side effects are never duplicated.

pub mod backoff;
pub mod retry;

pub use backoff::BackoffStrategy;
pub use retry::{AttemptError, RetryPolicy};

//! Guard against oversized response bodies.

use ron_sdk_domain::{codes, SdkError, SdkResult};

/// Rejects response bodies larger than a configured maximum.
///
/// A maximum `<= 0` disables the check entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseSizeLimiter {
    max_bytes: i64,
}

impl ResponseSizeLimiter {
    pub const fn new(max_bytes: i64) -> Self {
        Self { max_bytes }
    }

    pub const fn unlimited() -> Self {
        Self { max_bytes: 0 }
    }

    pub const fn max_bytes(&self) -> i64 {
        self.max_bytes
    }

    pub const fn is_unlimited(&self) -> bool {
        self.max_bytes <= 0
    }

    /// Check a measured body size against the limit.
    ///
    /// # Errors
    ///
    /// Returns a non-retryable transport error with code
    /// `RESPONSE_TOO_LARGE` and `limit`/`actual` details when the size
    /// exceeds the maximum.
    pub fn ensure_within_limit(&self, actual: usize) -> SdkResult<()> {
        if self.is_unlimited() {
            return Ok(());
        }
        // Saturates on 32-bit targets.
        let limit = usize::try_from(self.max_bytes).unwrap_or(usize::MAX);
        if actual <= limit {
            return Ok(());
        }
        Err(SdkError::transport(
            codes::RESPONSE_TOO_LARGE,
            "Response body exceeds the configured size limit",
            false,
        )
        .with_detail("limit", self.max_bytes)
        .with_detail("actual", actual as u64))
    }
}

impl Default for ResponseSizeLimiter {
    fn default() -> Self {
        Self::new(ron_sdk_domain::constants::DEFAULT_MAX_RESPONSE_BYTES)
    }
}

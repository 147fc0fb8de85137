//! Validated client configuration
//!
//! [`SdkConfigBuilder`] is a plain value type: every overridable field stays
//! "unset" until a caller (or a layered source such as the environment)
//! sets it, and `has_*` queries expose that state so layered defaults can
//! use "only set if unset" merging. [`SdkConfigBuilder::build`] validates
//! and freezes the result into an immutable [`SdkConfig`].

use std::time::Duration;

use url::Url;

use crate::constants::{
    DEFAULT_CONNECT_TIMEOUT, DEFAULT_MAX_RESPONSE_BYTES, DEFAULT_MAX_RETRIES,
    DEFAULT_OVERALL_TIMEOUT, DEFAULT_READ_TIMEOUT, DEFAULT_WRITE_TIMEOUT,
};
use crate::errors::{codes, SdkError, SdkResult};

/// Immutable connection parameters owned by a client.
///
/// Carries no secrets, so its `Debug` output is safe to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdkConfig {
    base_url: String,
    parsed_base_url: Url,
    connect_timeout: Duration,
    read_timeout: Duration,
    write_timeout: Duration,
    overall_timeout: Duration,
    max_retries: u32,
    max_response_bytes: i64,
    allow_insecure_http: bool,
}

impl SdkConfig {
    pub fn builder() -> SdkConfigBuilder {
        SdkConfigBuilder::new()
    }

    /// Base address as configured (trimmed).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn parsed_base_url(&self) -> &Url {
        &self.parsed_base_url
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    pub fn write_timeout(&self) -> Duration {
        self.write_timeout
    }

    pub fn overall_timeout(&self) -> Duration {
        self.overall_timeout
    }

    pub fn connect_timeout_ms(&self) -> u128 {
        self.connect_timeout.as_millis()
    }

    pub fn read_timeout_ms(&self) -> u128 {
        self.read_timeout.as_millis()
    }

    pub fn write_timeout_ms(&self) -> u128 {
        self.write_timeout.as_millis()
    }

    pub fn overall_timeout_ms(&self) -> u128 {
        self.overall_timeout.as_millis()
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Maximum accepted response body size; `<= 0` means unlimited.
    pub fn max_response_bytes(&self) -> i64 {
        self.max_response_bytes
    }

    pub fn allow_insecure_http(&self) -> bool {
        self.allow_insecure_http
    }
}

/// Builder for [`SdkConfig`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SdkConfigBuilder {
    base_url: Option<String>,
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
    overall_timeout: Option<Duration>,
    max_retries: Option<u32>,
    max_response_bytes: Option<i64>,
    allow_insecure_http: Option<bool>,
}

/// Positive millisecond value as a duration; anything else is "no override".
fn positive_millis(ms: i64) -> Option<Duration> {
    u64::try_from(ms).ok().filter(|ms| *ms > 0).map(Duration::from_millis)
}

impl SdkConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.set_base_url(base_url);
        self
    }

    /// Ignored when `timeout` is zero.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.connect_timeout = Some(timeout);
        }
        self
    }

    /// Ignored when `timeout` is zero.
    #[must_use]
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.read_timeout = Some(timeout);
        }
        self
    }

    /// Ignored when `timeout` is zero.
    #[must_use]
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.write_timeout = Some(timeout);
        }
        self
    }

    /// Ignored when `timeout` is zero.
    #[must_use]
    pub fn overall_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.overall_timeout = Some(timeout);
        }
        self
    }

    /// Ignored when `ms <= 0`.
    #[must_use]
    pub fn connect_timeout_ms(mut self, ms: i64) -> Self {
        self.set_connect_timeout_ms(ms);
        self
    }

    /// Ignored when `ms <= 0`.
    #[must_use]
    pub fn read_timeout_ms(mut self, ms: i64) -> Self {
        self.set_read_timeout_ms(ms);
        self
    }

    /// Ignored when `ms <= 0`.
    #[must_use]
    pub fn write_timeout_ms(mut self, ms: i64) -> Self {
        self.set_write_timeout_ms(ms);
        self
    }

    /// Ignored when `ms <= 0`.
    #[must_use]
    pub fn overall_timeout_ms(mut self, ms: i64) -> Self {
        self.set_overall_timeout_ms(ms);
        self
    }

    #[must_use]
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    #[must_use]
    pub fn max_response_bytes(mut self, max_bytes: i64) -> Self {
        self.max_response_bytes = Some(max_bytes);
        self
    }

    #[must_use]
    pub fn allow_insecure_http(mut self, allow: bool) -> Self {
        self.allow_insecure_http = Some(allow);
        self
    }

    // In-place setters, used by layered sources that hold `&mut Self`.

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = Some(base_url.into());
    }

    pub fn set_connect_timeout_ms(&mut self, ms: i64) {
        if let Some(timeout) = positive_millis(ms) {
            self.connect_timeout = Some(timeout);
        }
    }

    pub fn set_read_timeout_ms(&mut self, ms: i64) {
        if let Some(timeout) = positive_millis(ms) {
            self.read_timeout = Some(timeout);
        }
    }

    pub fn set_write_timeout_ms(&mut self, ms: i64) {
        if let Some(timeout) = positive_millis(ms) {
            self.write_timeout = Some(timeout);
        }
    }

    pub fn set_overall_timeout_ms(&mut self, ms: i64) {
        if let Some(timeout) = positive_millis(ms) {
            self.overall_timeout = Some(timeout);
        }
    }

    pub fn set_max_retries(&mut self, max_retries: u32) {
        self.max_retries = Some(max_retries);
    }

    pub fn set_max_response_bytes(&mut self, max_bytes: i64) {
        self.max_response_bytes = Some(max_bytes);
    }

    pub fn set_allow_insecure_http(&mut self, allow: bool) {
        self.allow_insecure_http = Some(allow);
    }

    /// Copy every field set on `other` that is still unset here.
    pub fn fill_unset_from(&mut self, other: &Self) {
        fn fill<T: Clone>(slot: &mut Option<T>, source: &Option<T>) {
            if slot.is_none() {
                slot.clone_from(source);
            }
        }
        fill(&mut self.base_url, &other.base_url);
        fill(&mut self.connect_timeout, &other.connect_timeout);
        fill(&mut self.read_timeout, &other.read_timeout);
        fill(&mut self.write_timeout, &other.write_timeout);
        fill(&mut self.overall_timeout, &other.overall_timeout);
        fill(&mut self.max_retries, &other.max_retries);
        fill(&mut self.max_response_bytes, &other.max_response_bytes);
        fill(&mut self.allow_insecure_http, &other.allow_insecure_http);
    }

    pub fn has_base_url(&self) -> bool {
        self.base_url.is_some()
    }

    pub fn has_connect_timeout(&self) -> bool {
        self.connect_timeout.is_some()
    }

    pub fn has_read_timeout(&self) -> bool {
        self.read_timeout.is_some()
    }

    pub fn has_write_timeout(&self) -> bool {
        self.write_timeout.is_some()
    }

    pub fn has_overall_timeout(&self) -> bool {
        self.overall_timeout.is_some()
    }

    pub fn has_max_retries(&self) -> bool {
        self.max_retries.is_some()
    }

    pub fn has_max_response_bytes(&self) -> bool {
        self.max_response_bytes.is_some()
    }

    pub fn has_allow_insecure_http(&self) -> bool {
        self.allow_insecure_http.is_some()
    }

    /// Validate and freeze the configuration.
    ///
    /// # Errors
    ///
    /// Returns a config-kind [`SdkError`] with code:
    /// - `CONFIG_MISSING_BASE_URL` when no non-blank base address was set
    /// - `CONFIG_INVALID_URL` when it is not an absolute URL
    /// - `CONFIG_INSECURE_HTTP_DISABLED` when the scheme is not `https` and
    ///   insecure HTTP was not allowed
    pub fn build(&self) -> SdkResult<SdkConfig> {
        let base_url = self
            .base_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                SdkError::config(codes::CONFIG_MISSING_BASE_URL, "Base URL is required")
            })?;

        let parsed = Url::parse(base_url).map_err(|e| {
            SdkError::config(codes::CONFIG_INVALID_URL, "Base URL is not a valid absolute URL")
                .with_source(e)
        })?;
        if parsed.cannot_be_a_base() || !parsed.has_host() {
            return Err(SdkError::config(
                codes::CONFIG_INVALID_URL,
                "Base URL must be a hierarchical URL with a host",
            ));
        }

        let allow_insecure_http = self.allow_insecure_http.unwrap_or(false);
        if !parsed.scheme().eq_ignore_ascii_case("https") && !allow_insecure_http {
            return Err(SdkError::config(
                codes::CONFIG_INSECURE_HTTP_DISABLED,
                "Insecure HTTP is disabled; use https or explicitly allow insecure HTTP",
            )
            .with_detail("scheme", parsed.scheme()));
        }

        Ok(SdkConfig {
            base_url: base_url.to_string(),
            parsed_base_url: parsed,
            connect_timeout: self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
            read_timeout: self.read_timeout.unwrap_or(DEFAULT_READ_TIMEOUT),
            write_timeout: self.write_timeout.unwrap_or(DEFAULT_WRITE_TIMEOUT),
            overall_timeout: self.overall_timeout.unwrap_or(DEFAULT_OVERALL_TIMEOUT),
            max_retries: self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            max_response_bytes: self.max_response_bytes.unwrap_or(DEFAULT_MAX_RESPONSE_BYTES),
            allow_insecure_http,
        })
    }
}

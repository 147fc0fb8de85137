//! Request executor for the gateway `/app/*` API
//!
//! [`RonClient`] turns a method, a relative path and an optional body into
//! a typed [`AppResponse`]. Every call goes through the same pipeline:
//! URL normalization, header construction, body serialization, the retry
//! loop (transport call plus response size check per attempt) and envelope
//! decoding.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use ron_sdk_common::auth::TokenProvider;
use ron_sdk_common::limits::ResponseSizeLimiter;
use ron_sdk_common::resilience::{AttemptError, RetryPolicy};
use ron_sdk_domain::constants::{
    user_agent, APP_PATH_PREFIX, CONTENT_TYPE_JSON, HEADER_ACCEPT, HEADER_AUTHORIZATION,
    HEADER_CONTENT_TYPE, HEADER_IDEMPOTENCY_KEY, HEADER_PROTOCOL_VERSION, HEADER_REQUEST_ID,
    HEADER_USER_AGENT, PROTOCOL_VERSION,
};
use ron_sdk_domain::{
    codes, AppResponse, HttpMethod, RequestDescription, SdkConfig, SdkConfigBuilder, SdkError,
    SdkResult, TransportResponse,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, field, instrument, warn, Span};
use uuid::Uuid;

use super::decoder::EnvelopeDecoder;
use crate::config::loader::{apply_env, apply_process_env};
use crate::http::{HttpTransport, ReqwestTransport};

/// Client for the gateway app plane.
///
/// Cheap to clone; clones share the transport, token provider and policy.
#[derive(Clone)]
pub struct RonClient {
    config: Arc<SdkConfig>,
    transport: Arc<dyn HttpTransport>,
    token_provider: Option<Arc<dyn TokenProvider>>,
    retry_policy: Arc<RetryPolicy>,
    limiter: ResponseSizeLimiter,
    idempotency_keys: bool,
}

impl RonClient {
    /// Create a builder for fluent configuration
    pub fn builder() -> RonClientBuilder {
        RonClientBuilder::new()
    }

    pub fn config(&self) -> &SdkConfig {
        &self.config
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Execute a GET request
    ///
    /// # Errors
    ///
    /// Returns a classified [`SdkError`]; gateway problems arrive as
    /// `Ok(AppResponse)` with `problem` set
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> SdkResult<AppResponse<T>> {
        self.execute::<T, ()>(HttpMethod::Get, path, None).await
    }

    /// GET without a typed payload shape.
    ///
    /// # Errors
    ///
    /// See [`RonClient::get`]
    pub async fn get_raw(&self, path: &str) -> SdkResult<AppResponse<Value>> {
        self.execute::<Value, ()>(HttpMethod::Get, path, None).await
    }

    /// Execute a POST request
    ///
    /// # Errors
    ///
    /// See [`RonClient::get`]; POST is never retried
    pub async fn post<T, B>(&self, path: &str, body: Option<&B>) -> SdkResult<AppResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(HttpMethod::Post, path, body).await
    }

    /// Execute a PUT request
    ///
    /// # Errors
    ///
    /// See [`RonClient::get`]; PUT is never retried
    pub async fn put<T, B>(&self, path: &str, body: Option<&B>) -> SdkResult<AppResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(HttpMethod::Put, path, body).await
    }

    /// Execute a PATCH request
    ///
    /// # Errors
    ///
    /// See [`RonClient::get`]; PATCH is never retried
    pub async fn patch<T, B>(&self, path: &str, body: Option<&B>) -> SdkResult<AppResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(HttpMethod::Patch, path, body).await
    }

    /// Execute a DELETE request
    ///
    /// # Errors
    ///
    /// See [`RonClient::get`]; DELETE is never retried
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> SdkResult<AppResponse<T>> {
        self.execute::<T, ()>(HttpMethod::Delete, path, None).await
    }

    /// Run one call through the full pipeline.
    ///
    /// # Errors
    ///
    /// - `DECODE_ERROR` if the body cannot be serialized or the response
    ///   cannot be decoded
    /// - transport errors from the retry loop (`TRANSPORT_IO_ERROR`,
    ///   `TRANSPORT_ERROR`, `RESPONSE_TOO_LARGE`, `RETRY_INTERRUPTED`)
    /// - `UNEXPECTED_RUNTIME_ERROR` if the token provider fails
    #[instrument(
        skip(self, body),
        fields(method = %method, path = %path, request_id = field::Empty)
    )]
    pub async fn execute<T, B>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
    ) -> SdkResult<AppResponse<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request_id = Uuid::new_v4().to_string();
        Span::current().record("request_id", request_id.as_str());

        let url = join_url(self.config.base_url(), &normalize_path(path));
        let body = body
            .map(|payload| {
                serde_json::to_string(payload).map_err(|err| {
                    SdkError::decode("Failed to serialize request body").with_source(err)
                })
            })
            .transpose()?;

        let headers = self.build_headers(method, &request_id, body.is_some()).await?;
        let request = RequestDescription::new(method, url, headers, body);

        let response = self
            .retry_policy
            .execute(method, || self.attempt(&request))
            .await
            .inspect_err(|err| warn!(code = err.code(), "Request failed"))?;

        debug!(status = response.status, bytes = response.body_len(), "Response received");
        EnvelopeDecoder::decode_response(&response)
    }

    async fn attempt(
        &self,
        request: &RequestDescription,
    ) -> Result<TransportResponse, AttemptError> {
        let response = self.transport.execute(request).await.map_err(AttemptError::from)?;
        self.limiter.ensure_within_limit(response.body_len())?;
        Ok(response)
    }

    async fn build_headers(
        &self,
        method: HttpMethod,
        request_id: &str,
        has_body: bool,
    ) -> SdkResult<HashMap<String, String>> {
        let mut headers = HashMap::new();
        headers.insert(HEADER_USER_AGENT.to_string(), user_agent());
        headers.insert(HEADER_PROTOCOL_VERSION.to_string(), PROTOCOL_VERSION.to_string());
        headers.insert(HEADER_REQUEST_ID.to_string(), request_id.to_string());
        headers.insert(HEADER_ACCEPT.to_string(), CONTENT_TYPE_JSON.to_string());

        if has_body {
            headers.insert(HEADER_CONTENT_TYPE.to_string(), CONTENT_TYPE_JSON.to_string());
        }

        if let Some(provider) = &self.token_provider {
            let token = provider.access_token().await.map_err(|err| {
                SdkError::transport(
                    codes::UNEXPECTED_RUNTIME_ERROR,
                    "Failed to obtain access token",
                    false,
                )
                .with_source(err)
            })?;
            if let Some(token) = token.filter(|t| !t.trim().is_empty()) {
                let value = format!("Bearer {}", token.trim());
                headers.insert(HEADER_AUTHORIZATION.to_string(), value);
            }
        }

        if self.idempotency_keys && method.accepts_idempotency_key() {
            headers.insert(HEADER_IDEMPOTENCY_KEY.to_string(), Uuid::new_v4().to_string());
        }

        Ok(headers)
    }
}

impl fmt::Debug for RonClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RonClient")
            .field("config", &self.config)
            .field("has_token_provider", &self.token_provider.is_some())
            .field("retry_policy", &self.retry_policy)
            .field("limiter", &self.limiter)
            .field("idempotency_keys", &self.idempotency_keys)
            .finish_non_exhaustive()
    }
}

/// Builder for [`RonClient`]
///
/// An explicit [`SdkConfig`] passed to [`RonClientBuilder::config`] is used
/// as-is. Otherwise the builder's own settings are kept and, when the
/// environment is enabled, `RON_SDK_*` variables fill whatever is unset.
#[derive(Default)]
pub struct RonClientBuilder {
    config: Option<SdkConfig>,
    config_builder: SdkConfigBuilder,
    use_env: bool,
    env_vars: Option<HashMap<String, String>>,
    token_provider: Option<Arc<dyn TokenProvider>>,
    transport: Option<Arc<dyn HttpTransport>>,
    retry_policy: Option<RetryPolicy>,
    idempotency_keys: bool,
    cancellation: Option<CancellationToken>,
}

impl RonClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder that reads `RON_SDK_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self { use_env: true, ..Self::default() }
    }

    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(base_url);
        self
    }

    /// Use a fully built configuration, bypassing the environment.
    #[must_use]
    pub fn config(mut self, config: SdkConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Layer a partial configuration (timeouts, limits, flags).
    ///
    /// Fields set on `config_builder` override earlier builder calls; fields
    /// it leaves unset keep whatever was already set, such as a prior
    /// [`RonClientBuilder::base_url`].
    #[must_use]
    pub fn config_builder(mut self, mut config_builder: SdkConfigBuilder) -> Self {
        config_builder.fill_unset_from(&self.config_builder);
        self.config_builder = config_builder;
        self
    }

    /// Read `RON_SDK_*` values from `vars` instead of the process environment.
    #[must_use]
    pub fn env_vars(mut self, vars: HashMap<String, String>) -> Self {
        self.use_env = true;
        self.env_vars = Some(vars);
        self
    }

    #[must_use]
    pub fn token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.token_provider = Some(provider);
        self
    }

    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    #[must_use]
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Send an `Idempotency-Key` header on POST, PUT and PATCH.
    #[must_use]
    pub fn idempotency_keys(mut self, enabled: bool) -> Self {
        self.idempotency_keys = enabled;
        self
    }

    /// Cancel backoff waits when `token` fires.
    #[must_use]
    pub fn cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Validate the configuration and assemble the client.
    ///
    /// # Errors
    ///
    /// - config errors from [`SdkConfigBuilder::build`]
    /// - `HTTP_CLIENT_ERROR` if the default transport cannot be built
    pub fn build(self) -> SdkResult<RonClient> {
        let config = match self.config {
            Some(config) => config,
            None => {
                let mut builder = self.config_builder;
                if self.use_env {
                    match &self.env_vars {
                        Some(vars) => apply_env(&mut builder, vars),
                        None => apply_process_env(&mut builder),
                    }
                }
                builder.build()?
            }
        };

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::from_config(&config)?),
        };

        let mut retry_policy = self
            .retry_policy
            .unwrap_or_else(|| RetryPolicy::for_max_retries(config.max_retries()));
        if let Some(token) = self.cancellation {
            retry_policy = retry_policy.with_cancellation(token);
        }

        debug!(
            base_url = config.base_url(),
            max_retries = retry_policy.max_retries(),
            authenticated = self.token_provider.is_some(),
            "Built RON client"
        );

        Ok(RonClient {
            limiter: ResponseSizeLimiter::new(config.max_response_bytes()),
            config: Arc::new(config),
            transport,
            token_provider: self.token_provider,
            retry_policy: Arc::new(retry_policy),
            idempotency_keys: self.idempotency_keys,
        })
    }
}

/// Place `path` under the `/app` prefix.
fn normalize_path(path: &str) -> String {
    if path == APP_PATH_PREFIX || path.starts_with("/app/") {
        path.to_string()
    } else if path.starts_with('/') {
        format!("{APP_PATH_PREFIX}{path}")
    } else {
        format!("{APP_PATH_PREFIX}/{path}")
    }
}

fn join_url(base_url: &str, normalized_path: &str) -> String {
    let base = base_url.strip_suffix('/').unwrap_or(base_url);
    format!("{base}{normalized_path}")
}

#[cfg(test)]
mod tests {
    use ron_sdk_common::auth::StaticTokenProvider;

    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("hello"), "/app/hello");
        assert_eq!(normalize_path("/hello"), "/app/hello");
        assert_eq!(normalize_path("/app/hello"), "/app/hello");
        assert_eq!(normalize_path("/app"), "/app");
        assert_eq!(normalize_path("/application"), "/app/application");
        assert_eq!(normalize_path(""), "/app/");
    }

    #[test]
    fn test_join_url_handles_trailing_slash() {
        assert_eq!(join_url("https://gw.example.com", "/app/x"), "https://gw.example.com/app/x");
        assert_eq!(join_url("https://gw.example.com/", "/app/x"), "https://gw.example.com/app/x");
        assert_eq!(
            join_url("https://gw.example.com/base/", "/app/x"),
            "https://gw.example.com/base/app/x"
        );
    }

    fn client_with(provider: Option<Arc<dyn TokenProvider>>, idempotency: bool) -> RonClient {
        let mut builder =
            RonClient::builder().base_url("https://gw.example.com").idempotency_keys(idempotency);
        if let Some(provider) = provider {
            builder = builder.token_provider(provider);
        }
        builder.build().expect("client should build")
    }

    #[tokio::test]
    async fn test_headers_without_token_provider() {
        let client = client_with(None, false);
        let headers = client.build_headers(HttpMethod::Get, "req-1", false).await.unwrap();

        assert_eq!(headers.get(HEADER_USER_AGENT), Some(&user_agent()));
        assert_eq!(headers.get(HEADER_PROTOCOL_VERSION).map(String::as_str), Some("1"));
        assert_eq!(headers.get(HEADER_REQUEST_ID).map(String::as_str), Some("req-1"));
        assert!(!headers.contains_key(HEADER_AUTHORIZATION));
        assert!(!headers.contains_key(HEADER_CONTENT_TYPE));
    }

    #[tokio::test]
    async fn test_blank_token_is_not_sent() {
        let client = client_with(Some(Arc::new(StaticTokenProvider::new("   "))), false);
        let headers = client.build_headers(HttpMethod::Post, "req-2", true).await.unwrap();

        assert!(!headers.contains_key(HEADER_AUTHORIZATION));
        assert_eq!(headers.get(HEADER_CONTENT_TYPE).map(String::as_str), Some(CONTENT_TYPE_JSON));
    }

    #[tokio::test]
    async fn test_bearer_token_and_idempotency_key() {
        let client = client_with(Some(Arc::new(StaticTokenProvider::new("tok"))), true);

        let post = client.build_headers(HttpMethod::Post, "req-3", true).await.unwrap();
        assert_eq!(post.get(HEADER_AUTHORIZATION).map(String::as_str), Some("Bearer tok"));
        assert!(post.contains_key(HEADER_IDEMPOTENCY_KEY));

        let get = client.build_headers(HttpMethod::Get, "req-4", false).await.unwrap();
        assert!(!get.contains_key(HEADER_IDEMPOTENCY_KEY));
    }

    #[test]
    fn test_default_retry_policy_follows_config() {
        let config = SdkConfigBuilder::new().base_url("https://gw.example.com").max_retries(3);
        let client = RonClient::builder().config_builder(config).build().unwrap();
        assert_eq!(client.retry_policy().max_retries(), 3);
        assert!(!client.retry_policy().backoff().is_none());

        let client = client_with(None, false);
        assert_eq!(client.retry_policy().max_retries(), 0);
        assert!(client.retry_policy().backoff().is_none());
    }

    #[test]
    fn test_debug_hides_token_provider() {
        let client = client_with(Some(Arc::new(StaticTokenProvider::new("secret-token"))), false);
        let debug = format!("{client:?}");
        assert!(debug.contains("has_token_provider: true"));
        assert!(!debug.contains("secret-token"));
    }
}

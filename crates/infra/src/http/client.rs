use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client as ReqwestClient, Method};
use ron_sdk_domain::{
    codes, HttpMethod, RequestDescription, SdkConfig, SdkError, SdkResult, TransportResponse,
};
use tracing::debug;

use crate::errors::TransportError;

/// Executes one request description and reports what came back.
///
/// Implementations must not retry; the client's retry policy owns that.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform the request
    ///
    /// # Errors
    /// Returns [`TransportError::Io`] for network-level failures and
    /// [`TransportError::Client`] for anything else
    async fn execute(
        &self,
        request: &RequestDescription,
    ) -> Result<TransportResponse, TransportError>;
}

/// Default transport backed by `reqwest`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: ReqwestClient,
}

impl ReqwestTransport {
    /// Build a transport honoring the configured timeouts.
    ///
    /// reqwest has no write timeout; writes are bounded by the overall
    /// timeout. Plain-HTTP redirects are refused unless insecure HTTP is
    /// allowed.
    ///
    /// # Errors
    /// Returns `HTTP_CLIENT_ERROR` if the underlying client cannot be built
    pub fn from_config(config: &SdkConfig) -> SdkResult<Self> {
        let client = ReqwestClient::builder()
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .timeout(config.overall_timeout())
            .https_only(!config.allow_insecure_http())
            .no_proxy()
            .build()
            .map_err(|err| {
                SdkError::transport(codes::HTTP_CLIENT_ERROR, "Failed to build HTTP client", false)
                    .with_source(err)
            })?;

        Ok(Self { client })
    }

    /// Wrap an already configured reqwest client.
    pub fn with_client(client: ReqwestClient) -> Self {
        Self { client }
    }
}

impl fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReqwestTransport").finish_non_exhaustive()
    }
}

fn to_reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Head => Method::HEAD,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

fn collect_headers(headers: &HeaderMap) -> HashMap<String, Vec<String>> {
    let mut collected: HashMap<String, Vec<String>> = HashMap::new();
    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            collected.entry(name.as_str().to_string()).or_default().push(value.to_string());
        }
    }
    collected
}

fn to_header_map(headers: &HashMap<String, String>) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(TransportError::client)?;
        let value = HeaderValue::from_str(value).map_err(TransportError::client)?;
        map.insert(name, value);
    }
    Ok(map)
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(
        &self,
        request: &RequestDescription,
    ) -> Result<TransportResponse, TransportError> {
        let method = request.method();
        let mut builder = self
            .client
            .request(to_reqwest_method(method), request.url())
            .headers(to_header_map(request.headers())?);

        builder = match method {
            HttpMethod::Get | HttpMethod::Head | HttpMethod::Delete => builder,
            HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch => {
                builder.body(request.body().unwrap_or_default().to_string())
            }
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        let bytes = response.bytes().await?;
        debug!(status, body_len = bytes.len(), "received HTTP response");

        Ok(TransportResponse {
            status,
            body: (!bytes.is_empty()).then(|| bytes.to_vec()),
            headers,
        })
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn insecure_config(base: &str) -> SdkConfig {
        SdkConfig::builder().base_url(base).allow_insecure_http(true).build().unwrap()
    }

    fn request(
        method: HttpMethod,
        url: String,
        headers: &[(&str, &str)],
        body: Option<&str>,
    ) -> RequestDescription {
        let headers =
            headers.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        RequestDescription::new(method, url, headers, body.map(str::to_string))
    }

    #[tokio::test]
    async fn test_get_forwards_headers_and_collects_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/app/ping"))
            .and(header("X-Ron-Protocol-Version", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("X-Correlation-Id", "corr-9")
                    .set_body_string(r#"{"data":"pong"}"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let transport = ReqwestTransport::from_config(&insecure_config(&server.uri())).unwrap();
        let response = transport
            .execute(&request(
                HttpMethod::Get,
                format!("{}/app/ping", server.uri()),
                &[("X-Ron-Protocol-Version", "1")],
                None,
            ))
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body_bytes(), Some(br#"{"data":"pong"}"#.as_slice()));
        assert_eq!(response.header("x-correlation-id"), Some("corr-9"));
    }

    #[tokio::test]
    async fn test_body_is_kept_as_raw_bytes() {
        let server = MockServer::start().await;
        let raw = vec![b'{', b'"', 0xE9, b'"', b'}'];
        Mock::given(method("GET"))
            .and(path("/app/latin1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(raw.clone(), "text/plain; charset=iso-8859-1"),
            )
            .mount(&server)
            .await;

        let transport = ReqwestTransport::from_config(&insecure_config(&server.uri())).unwrap();
        let response = transport
            .execute(&request(HttpMethod::Get, format!("{}/app/latin1", server.uri()), &[], None))
            .await
            .unwrap();

        assert_eq!(response.body_bytes(), Some(raw.as_slice()));
        assert_eq!(response.body_len(), 5);
    }

    #[tokio::test]
    async fn test_post_sends_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/app/items"))
            .and(body_string(r#"{"name":"x"}"#))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let transport = ReqwestTransport::from_config(&insecure_config(&server.uri())).unwrap();
        let response = transport
            .execute(&request(
                HttpMethod::Post,
                format!("{}/app/items", server.uri()),
                &[("Content-Type", "application/json")],
                Some(r#"{"name":"x"}"#),
            ))
            .await
            .unwrap();

        assert_eq!(response.status, 201);
        assert!(response.body.is_none());
    }

    #[tokio::test]
    async fn test_plain_http_refused_when_insecure_not_allowed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let config = SdkConfig::builder().base_url("https://gateway.example.com").build().unwrap();
        let transport = ReqwestTransport::from_config(&config).unwrap();
        let result = transport
            .execute(&request(HttpMethod::Get, format!("{}/app/ping", server.uri()), &[], None))
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_invalid_header_is_client_error() {
        let transport =
            ReqwestTransport::from_config(&insecure_config("http://localhost:1")).unwrap();
        let result = transport
            .execute(&request(
                HttpMethod::Get,
                "http://localhost:1/app/x".into(),
                &[("Bad Header", "v")],
                None,
            ))
            .await;

        assert!(matches!(result, Err(TransportError::Client(_))));
    }
}

//! Shared helpers for infra integration tests.

use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ron_sdk_common::resilience::{BackoffStrategy, RetryPolicy};
use ron_sdk_domain::{RequestDescription, SdkConfigBuilder, TransportResponse};
use ron_sdk_infra::{HttpTransport, RonClient, RonClientBuilder, TransportError};

/// One scripted transport outcome.
#[derive(Debug, Clone)]
pub enum Step {
    /// Network-level failure (connection reset)
    Io,
    /// Non-I/O client failure
    Client,
    /// HTTP response with the given status and body
    Respond(u16, &'static str),
}

/// Transport that replays a fixed script and records every request.
///
/// Once the script is exhausted the last step repeats.
pub struct ScriptedTransport {
    steps: Mutex<VecDeque<Step>>,
    last: Mutex<Option<Step>>,
    requests: Mutex<Vec<RequestDescription>>,
    calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Arc<Self> {
        Arc::new(Self {
            steps: Mutex::new(steps.into_iter().collect()),
            last: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<RequestDescription> {
        self.requests.lock().expect("requests mutex poisoned").clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(
        &self,
        request: &RequestDescription,
    ) -> Result<TransportResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().expect("requests mutex poisoned").push(request.clone());

        let step = {
            let mut steps = self.steps.lock().expect("steps mutex poisoned");
            let mut last = self.last.lock().expect("last mutex poisoned");
            match steps.pop_front() {
                Some(step) => {
                    *last = Some(step.clone());
                    step
                }
                None => last.clone().expect("script must not be empty"),
            }
        };

        match step {
            Step::Io => Err(TransportError::io(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "connection reset by peer",
            ))),
            Step::Client => Err(TransportError::client(io::Error::new(
                io::ErrorKind::InvalidInput,
                "malformed header value",
            ))),
            Step::Respond(status, body) => {
                let body = (!body.is_empty()).then(|| body.as_bytes().to_vec());
                Ok(TransportResponse::new(status, body))
            }
        }
    }
}

/// Retry policy with no backoff, so retry tests run instantly.
pub fn immediate_retries(max_retries: u32) -> RetryPolicy {
    RetryPolicy::new(max_retries, BackoffStrategy::none())
}

/// Builder aimed at a fake gateway, with the given transport installed.
pub fn scripted_builder(transport: Arc<ScriptedTransport>) -> RonClientBuilder {
    RonClient::builder().base_url("https://gateway.test").transport(transport)
}

/// Config builder for a plain-HTTP mock server.
pub fn mock_server_config(uri: &str) -> SdkConfigBuilder {
    SdkConfigBuilder::new().base_url(uri).allow_insecure_http(true)
}

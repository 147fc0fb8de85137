//! # RON SDK Infrastructure
//!
//! Impure half of the RON app-plane SDK: everything that touches the
//! network, the process environment or the global tracing subscriber.
//!
//! This crate contains:
//! - The request executor ([`RonClient`]) and its builder
//! - Envelope decoding ([`EnvelopeDecoder`])
//! - The transport seam ([`HttpTransport`]) with a `reqwest` implementation
//! - `RON_SDK_*` environment loading
//! - Tracing subscriber helpers
//!
//! ## Architecture
//! - Pure types live in `ron-sdk-domain`
//! - Retry, size limits and token providers live in `ron-sdk-common`
//!
//! ## Example
//!
//! ```rust,no_run
//! use ron_sdk_infra::RonClient;
//! use serde_json::Value;
//!
//! # async fn run() -> Result<(), ron_sdk_domain::SdkError> {
//! let client = RonClient::builder().base_url("https://gateway.example.com").build()?;
//! let response = client.get::<Value>("/hello").await?;
//! if let Some(problem) = response.problem() {
//!     eprintln!("gateway problem: {:?}", problem.code());
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use api::{EnvelopeDecoder, RonClient, RonClientBuilder};
pub use errors::TransportError;
pub use http::{HttpTransport, ReqwestTransport};
pub use observability::{init_tracing, try_init_tracing, LogFormat};

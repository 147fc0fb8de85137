//! Domain types and models
//!
//! Wire envelope types decoded from gateway responses, plus the
//! transport-neutral request/response descriptions the executor hands to
//! (and receives from) a transport.

pub mod envelope;
pub mod http;
pub mod problem;

pub use envelope::AppResponse;
pub use http::{HttpMethod, RequestDescription, TransportResponse};
pub use problem::Problem;

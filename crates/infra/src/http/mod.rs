//! Transport seam between the client and the network.

pub mod client;

pub use client::{HttpTransport, ReqwestTransport};

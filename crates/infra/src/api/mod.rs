//! Gateway app-plane client
//!
//! - [`client`]: request executor (`RonClient`) and its builder
//! - [`decoder`]: canonical envelope decoding

pub mod client;
pub mod decoder;

pub use client::{RonClient, RonClientBuilder};
pub use decoder::EnvelopeDecoder;
